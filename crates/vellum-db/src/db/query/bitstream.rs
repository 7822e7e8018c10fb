//! Queries resolving bitstreams together with their bundle and item.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{bitstream, bundle, item};
use crate::error::DbResult;
use crate::model::bitstream::{Bitstream, BitstreamRecord};
use crate::model::item::Item;

/// Lookup key for a single bitstream.
#[derive(Debug, Clone, Copy)]
pub enum BitstreamKey<'a> {
    Id(uuid::Uuid),
    LegacyId(i32),
    Sequence { item_id: uuid::Uuid, sequence_id: i32 },
    Name { item_id: uuid::Uuid, name: &'a str },
}

/// ## Summary
/// Loads one non-deleted bitstream with its bundle name and item.
///
/// ## Errors
/// Returns database errors if the query fails.
pub async fn load_record(
    conn: &mut DbConnection<'_>,
    key: BitstreamKey<'_>,
) -> DbResult<Option<BitstreamRecord>> {
    let mut query = bitstream::table
        .inner_join(bundle::table)
        .inner_join(item::table.on(item::id.eq(bundle::item_id)))
        .filter(bitstream::deleted.eq(false))
        .select((Bitstream::as_select(), bundle::name, Item::as_select()))
        .into_boxed();

    query = match key {
        BitstreamKey::Id(id) => query.filter(bitstream::id.eq(id)),
        BitstreamKey::LegacyId(legacy_id) => query.filter(bitstream::legacy_id.eq(legacy_id)),
        BitstreamKey::Sequence {
            item_id,
            sequence_id,
        } => query
            .filter(bundle::item_id.eq(item_id))
            .filter(bitstream::sequence_id.eq(sequence_id)),
        BitstreamKey::Name { item_id, name } => query
            .filter(bundle::item_id.eq(item_id))
            .filter(bitstream::name.eq(name.to_string())),
    };

    let row = query
        .order(bitstream::sequence_id.asc())
        .first::<(Bitstream, String, Item)>(conn)
        .await
        .optional()?;

    Ok(row.map(|(bitstream, bundle_name, item)| BitstreamRecord {
        bitstream,
        bundle_name,
        item,
    }))
}

/// ## Summary
/// Loads every non-deleted bitstream of an item, ordered by sequence.
///
/// ## Errors
/// Returns database errors if the query fails.
pub async fn load_item_records(
    conn: &mut DbConnection<'_>,
    item_id: uuid::Uuid,
) -> DbResult<Vec<BitstreamRecord>> {
    let rows = bitstream::table
        .inner_join(bundle::table)
        .inner_join(item::table.on(item::id.eq(bundle::item_id)))
        .filter(bitstream::deleted.eq(false))
        .filter(bundle::item_id.eq(item_id))
        .order(bitstream::sequence_id.asc())
        .select((Bitstream::as_select(), bundle::name, Item::as_select()))
        .load::<(Bitstream, String, Item)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(bitstream, bundle_name, item)| BitstreamRecord {
            bitstream,
            bundle_name,
            item,
        })
        .collect())
}
