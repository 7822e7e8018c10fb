use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// A registered person who may authenticate
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::eperson)]
#[diesel(check_for_backend(Pg))]
pub struct EPerson {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub can_log_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::epersongroup)]
#[diesel(check_for_backend(Pg))]
pub struct EPersonGroup {
    pub id: uuid::Uuid,
    pub name: String,
}
