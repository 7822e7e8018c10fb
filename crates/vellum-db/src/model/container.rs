use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Top-level or nested grouping of collections
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::community)]
#[diesel(check_for_backend(Pg))]
pub struct Community {
    pub id: uuid::Uuid,
    pub handle: String,
    pub name: String,
    pub short_description: Option<String>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Grouping of items; always a leaf of the container hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::collection)]
#[diesel(check_for_backend(Pg))]
pub struct Collection {
    pub id: uuid::Uuid,
    pub handle: String,
    pub name: String,
    pub short_description: Option<String>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Direct children of a community, each list in backing-store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerChildren {
    pub sub_communities: Vec<Community>,
    pub collections: Vec<Collection>,
}
