use diesel::{pg::Pg, prelude::*};

use vellum_core::constants::LICENSE_BUNDLE_NAME;

use crate::db::schema;
use crate::model::item::Item;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::bundle)]
#[diesel(check_for_backend(Pg))]
pub struct Bundle {
    pub id: uuid::Uuid,
    pub item_id: uuid::Uuid,
    pub name: String,
}

/// Stored file belonging to a bundle; the bytes live in the asset store
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::bitstream)]
#[diesel(check_for_backend(Pg))]
pub struct Bitstream {
    pub id: uuid::Uuid,
    pub legacy_id: i32,
    pub bundle_id: uuid::Uuid,
    pub sequence_id: i32,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub internal_id: String,
    pub last_modified: chrono::DateTime<chrono::Utc>,
    pub deleted: bool,
}

/// A bitstream with the bundle name and item it was resolved through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitstreamRecord {
    pub bitstream: Bitstream,
    pub bundle_name: String,
    pub item: Item,
}

impl BitstreamRecord {
    /// Deposit-license bitstreams live in the `LICENSE` bundle.
    #[must_use]
    pub fn is_license(&self) -> bool {
        self.bundle_name == LICENSE_BUNDLE_NAME
    }
}
