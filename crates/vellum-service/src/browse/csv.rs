//! Metadata CSV rendering.
//!
//! Columns are `id`, `collection`, then every metadata field present in the
//! result set in sorted order. Multiple values of a field share one cell,
//! joined by `||`.

use std::collections::{BTreeSet, HashMap};

use vellum_core::constants::CSV_VALUE_SEPARATOR;
use vellum_db::model::item::ItemRecord;

/// Appends `value` as one RFC 4180 field.
fn push_field(out: &mut String, value: &str) {
    if value.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

fn push_row<'v>(out: &mut String, cells: impl IntoIterator<Item = &'v str>) {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, cell);
    }
    out.push_str("\r\n");
}

/// ## Summary
/// Renders items as CSV. `collection_handles` maps owning collection ids to
/// handles; unknown ids are written as the raw id.
#[must_use]
pub fn render(records: &[ItemRecord], collection_handles: &HashMap<uuid::Uuid, String>) -> String {
    let fields: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.metadata.iter().map(|m| m.field.as_str()))
        .collect();

    let mut out = String::new();
    push_row(&mut out, ["id", "collection"].into_iter().chain(fields.iter().copied()));

    for record in records {
        let id = record.item.id.to_string();
        let collection = collection_handles
            .get(&record.item.owning_collection_id)
            .cloned()
            .unwrap_or_else(|| record.item.owning_collection_id.to_string());
        let values: Vec<String> = fields
            .iter()
            .map(|field| {
                record
                    .values(field)
                    .collect::<Vec<_>>()
                    .join(CSV_VALUE_SEPARATOR)
            })
            .collect();

        push_row(
            &mut out,
            [id.as_str(), collection.as_str()]
                .into_iter()
                .chain(values.iter().map(String::as_str)),
        );
    }

    out
}
