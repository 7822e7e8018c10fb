//! Read-only view of the repository's object graph.
//!
//! Delivery code depends on [`RepositoryStore`] rather than the pool so the
//! same handlers run against Postgres in production and an in-memory graph in
//! tests.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::model::bitstream::BitstreamRecord;
use crate::model::container::{Collection, Community, ContainerChildren};
use crate::model::eperson::{EPerson, EPersonGroup};
use crate::model::item::{Item, ItemRecord, MetadataValue};

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod pg;

/// The object a handle resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleTarget {
    Community(Community),
    Collection(Collection),
    Item(Item),
}

#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Communities with no parent, ordered by name.
    async fn top_communities(&self) -> DbResult<Vec<Community>>;

    async fn community(&self, id: uuid::Uuid) -> DbResult<Option<Community>>;

    async fn collection(&self, id: uuid::Uuid) -> DbResult<Option<Collection>>;

    /// Direct sub-communities and collections of a community.
    async fn community_children(&self, id: uuid::Uuid) -> DbResult<ContainerChildren>;

    async fn resolve_handle(&self, handle: &str) -> DbResult<Option<HandleTarget>>;

    async fn item(&self, id: uuid::Uuid) -> DbResult<Option<Item>>;

    /// Metadata of one item regardless of its archive state, by field then place.
    async fn item_metadata(&self, item_id: uuid::Uuid) -> DbResult<Vec<MetadataValue>>;

    async fn bitstream(&self, id: uuid::Uuid) -> DbResult<Option<BitstreamRecord>>;

    async fn bitstream_by_legacy_id(&self, legacy_id: i32) -> DbResult<Option<BitstreamRecord>>;

    async fn bitstream_by_sequence(
        &self,
        item_id: uuid::Uuid,
        sequence_id: i32,
    ) -> DbResult<Option<BitstreamRecord>>;

    /// First bitstream of the item whose name matches exactly, by sequence order.
    async fn bitstream_by_name(
        &self,
        item_id: uuid::Uuid,
        name: &str,
    ) -> DbResult<Option<BitstreamRecord>>;

    async fn item_bitstreams(&self, item_id: uuid::Uuid) -> DbResult<Vec<BitstreamRecord>>;

    /// Discoverable items with metadata, restricted to the given owning
    /// collections when `collection_ids` is set. Ordered by item id.
    async fn archived_items(
        &self,
        collection_ids: Option<&[uuid::Uuid]>,
    ) -> DbResult<Vec<ItemRecord>>;

    async fn eperson_by_email(&self, email: &str) -> DbResult<Option<EPerson>>;

    async fn eperson_groups(&self, eperson_id: uuid::Uuid) -> DbResult<Vec<EPersonGroup>>;
}
