use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::item)]
#[diesel(check_for_backend(Pg))]
pub struct Item {
    pub id: uuid::Uuid,
    pub handle: Option<String>,
    pub owning_collection_id: uuid::Uuid,
    pub in_archive: bool,
    pub withdrawn: bool,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl Item {
    /// Archived and not withdrawn.
    #[must_use]
    pub const fn is_discoverable(&self) -> bool {
        self.in_archive && !self.withdrawn
    }
}

/// A single qualified metadata value, e.g. `dc.title`
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = schema::metadata_value)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(Item, foreign_key = item_id))]
pub struct MetadataValue {
    pub id: uuid::Uuid,
    pub item_id: uuid::Uuid,
    pub field: String,
    pub value: String,
    pub place: i32,
}

/// An item together with its metadata, ordered by field then place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub item: Item,
    pub metadata: Vec<MetadataValue>,
}

impl ItemRecord {
    /// All values of `field`, in place order.
    pub fn values<'a, 'f>(&'a self, field: &'f str) -> impl Iterator<Item = &'a str> + use<'a, 'f> {
        self.metadata
            .iter()
            .filter(move |m| m.field == field)
            .map(|m| m.value.as_str())
    }

    /// First value of `field`.
    #[must_use]
    pub fn first_value<'a>(&'a self, field: &str) -> Option<&'a str> {
        self.values(field).next()
    }
}
