//! Queries over communities, collections and the links between them.

use diesel::dsl::{exists, not};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{collection, community, community2collection, community2community};
use crate::error::DbResult;
use crate::model::container::{Collection, Community, ContainerChildren};

/// ## Summary
/// Returns a query to select all communities.
#[must_use]
pub fn communities() -> community::BoxedQuery<'static, diesel::pg::Pg> {
    community::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a community by ID.
#[must_use]
pub fn community_by_id(id: uuid::Uuid) -> community::BoxedQuery<'static, diesel::pg::Pg> {
    communities().filter(community::id.eq(id))
}

/// ## Summary
/// Returns a query to find a community by handle.
#[must_use]
pub fn community_by_handle(handle: &str) -> community::BoxedQuery<'_, diesel::pg::Pg> {
    communities().filter(community::handle.eq(handle))
}

/// ## Summary
/// Returns a query for communities that are nobody's child, ordered by name.
#[must_use]
pub fn top_communities() -> community::BoxedQuery<'static, diesel::pg::Pg> {
    communities()
        .filter(not(exists(
            community2community::table.filter(community2community::child_id.eq(community::id)),
        )))
        .order(community::name.asc())
}

/// ## Summary
/// Returns a query to select all collections.
#[must_use]
pub fn collections() -> collection::BoxedQuery<'static, diesel::pg::Pg> {
    collection::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a collection by ID.
#[must_use]
pub fn collection_by_id(id: uuid::Uuid) -> collection::BoxedQuery<'static, diesel::pg::Pg> {
    collections().filter(collection::id.eq(id))
}

/// ## Summary
/// Returns a query to find a collection by handle.
#[must_use]
pub fn collection_by_handle(handle: &str) -> collection::BoxedQuery<'_, diesel::pg::Pg> {
    collections().filter(collection::handle.eq(handle))
}

/// ## Summary
/// Loads the direct sub-communities and collections of a community,
/// each in link `place` order.
///
/// ## Errors
/// Returns database errors if either query fails.
pub async fn load_children(
    conn: &mut DbConnection<'_>,
    community_id: uuid::Uuid,
) -> DbResult<ContainerChildren> {
    let sub_communities = community2community::table
        .inner_join(community::table.on(community::id.eq(community2community::child_id)))
        .filter(community2community::parent_id.eq(community_id))
        .order((community2community::place.asc(), community::name.asc()))
        .select(Community::as_select())
        .load::<Community>(conn)
        .await?;

    let collections = community2collection::table
        .inner_join(collection::table)
        .filter(community2collection::community_id.eq(community_id))
        .order((community2collection::place.asc(), collection::name.asc()))
        .select(Collection::as_select())
        .load::<Collection>(conn)
        .await?;

    Ok(ContainerChildren {
        sub_communities,
        collections,
    })
}
