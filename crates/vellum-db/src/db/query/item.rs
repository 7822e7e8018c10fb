//! Queries over items and their metadata.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{item, metadata_value};
use crate::error::DbResult;
use crate::model::item::{Item, ItemRecord, MetadataValue};

/// ## Summary
/// Returns a query to select all items.
#[must_use]
pub fn all() -> item::BoxedQuery<'static, diesel::pg::Pg> {
    item::table.into_boxed()
}

/// ## Summary
/// Returns a query to find an item by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> item::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(item::id.eq(id))
}

/// ## Summary
/// Returns a query to find an item by handle.
#[must_use]
pub fn by_handle(handle: &str) -> item::BoxedQuery<'_, diesel::pg::Pg> {
    all().filter(item::handle.eq(handle))
}

/// ## Summary
/// Returns a query for archived, non-withdrawn items.
#[must_use]
pub fn discoverable() -> item::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(item::in_archive.eq(true))
        .filter(item::withdrawn.eq(false))
}

/// ## Summary
/// Loads one item's metadata ordered by field then place.
///
/// ## Errors
/// Returns database errors if the query fails.
pub async fn load_metadata(
    conn: &mut DbConnection<'_>,
    item_id: uuid::Uuid,
) -> DbResult<Vec<MetadataValue>> {
    Ok(metadata_value::table
        .filter(metadata_value::item_id.eq(item_id))
        .order((metadata_value::field.asc(), metadata_value::place.asc()))
        .select(MetadataValue::as_select())
        .load::<MetadataValue>(conn)
        .await?)
}

/// ## Summary
/// Loads discoverable items, optionally restricted to owning collections,
/// together with their metadata.
///
/// ## Errors
/// Returns database errors if either query fails.
pub async fn load_discoverable_records(
    conn: &mut DbConnection<'_>,
    collection_ids: Option<&[uuid::Uuid]>,
) -> DbResult<Vec<ItemRecord>> {
    let mut query = discoverable().order(item::id.asc());
    if let Some(ids) = collection_ids {
        query = query.filter(item::owning_collection_id.eq_any(ids.to_vec()));
    }

    let items = query.select(Item::as_select()).load::<Item>(conn).await?;

    let metadata = MetadataValue::belonging_to(&items)
        .order((
            metadata_value::item_id.asc(),
            metadata_value::field.asc(),
            metadata_value::place.asc(),
        ))
        .select(MetadataValue::as_select())
        .load::<MetadataValue>(conn)
        .await?;

    Ok(metadata
        .grouped_by(&items)
        .into_iter()
        .zip(items)
        .map(|(metadata, item)| ItemRecord { item, metadata })
        .collect())
}
