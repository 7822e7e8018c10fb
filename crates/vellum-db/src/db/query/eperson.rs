//! Queries over e-people and their group memberships.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{eperson, epersongroup, epersongroup2eperson};
use crate::error::DbResult;
use crate::model::eperson::EPersonGroup;

/// ## Summary
/// Returns a query to find a person by e-mail, case-insensitively.
#[must_use]
pub fn by_email(email: &str) -> eperson::BoxedQuery<'static, diesel::pg::Pg> {
    eperson::table
        .filter(eperson::email.eq(email.to_lowercase()))
        .into_boxed()
}

/// ## Summary
/// Loads the groups a person is a direct member of.
///
/// ## Errors
/// Returns database errors if the query fails.
pub async fn load_groups(
    conn: &mut DbConnection<'_>,
    eperson_id: uuid::Uuid,
) -> DbResult<Vec<EPersonGroup>> {
    Ok(epersongroup2eperson::table
        .inner_join(epersongroup::table)
        .filter(epersongroup2eperson::eperson_id.eq(eperson_id))
        .order(epersongroup::name.asc())
        .select(EPersonGroup::as_select())
        .load::<EPersonGroup>(conn)
        .await?)
}
