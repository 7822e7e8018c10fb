use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::query::bitstream::{self as bitstream_query, BitstreamKey};
use crate::db::query::{container, eperson as eperson_query, item as item_query};
use crate::error::DbResult;
use crate::model::bitstream::BitstreamRecord;
use crate::model::container::{Collection, Community, ContainerChildren};
use crate::model::eperson::{EPerson, EPersonGroup};
use crate::model::item::{Item, ItemRecord, MetadataValue};
use crate::store::{HandleTarget, RepositoryStore};

/// [`RepositoryStore`] backed by the Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn bitstream_record(&self, key: BitstreamKey<'_>) -> DbResult<Option<BitstreamRecord>> {
        let mut conn = self.pool.get_connection().await?;
        bitstream_query::load_record(&mut conn, key).await
    }
}

#[async_trait]
impl RepositoryStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn top_communities(&self) -> DbResult<Vec<Community>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(container::top_communities()
            .select(Community::as_select())
            .load(&mut conn)
            .await?)
    }

    #[tracing::instrument(skip(self))]
    async fn community(&self, id: uuid::Uuid) -> DbResult<Option<Community>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(container::community_by_id(id)
            .select(Community::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    #[tracing::instrument(skip(self))]
    async fn collection(&self, id: uuid::Uuid) -> DbResult<Option<Collection>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(container::collection_by_id(id)
            .select(Collection::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    #[tracing::instrument(skip(self))]
    async fn community_children(&self, id: uuid::Uuid) -> DbResult<ContainerChildren> {
        let mut conn = self.pool.get_connection().await?;
        container::load_children(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_handle(&self, handle: &str) -> DbResult<Option<HandleTarget>> {
        let mut conn = self.pool.get_connection().await?;

        if let Some(community) = container::community_by_handle(handle)
            .select(Community::as_select())
            .first(&mut conn)
            .await
            .optional()?
        {
            return Ok(Some(HandleTarget::Community(community)));
        }

        if let Some(collection) = container::collection_by_handle(handle)
            .select(Collection::as_select())
            .first(&mut conn)
            .await
            .optional()?
        {
            return Ok(Some(HandleTarget::Collection(collection)));
        }

        Ok(item_query::by_handle(handle)
            .select(Item::as_select())
            .first(&mut conn)
            .await
            .optional()?
            .map(HandleTarget::Item))
    }

    #[tracing::instrument(skip(self))]
    async fn item(&self, id: uuid::Uuid) -> DbResult<Option<Item>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(item_query::by_id(id)
            .select(Item::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    #[tracing::instrument(skip(self))]
    async fn item_metadata(&self, item_id: uuid::Uuid) -> DbResult<Vec<MetadataValue>> {
        let mut conn = self.pool.get_connection().await?;
        item_query::load_metadata(&mut conn, item_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn bitstream(&self, id: uuid::Uuid) -> DbResult<Option<BitstreamRecord>> {
        self.bitstream_record(BitstreamKey::Id(id)).await
    }

    #[tracing::instrument(skip(self))]
    async fn bitstream_by_legacy_id(&self, legacy_id: i32) -> DbResult<Option<BitstreamRecord>> {
        self.bitstream_record(BitstreamKey::LegacyId(legacy_id))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn bitstream_by_sequence(
        &self,
        item_id: uuid::Uuid,
        sequence_id: i32,
    ) -> DbResult<Option<BitstreamRecord>> {
        self.bitstream_record(BitstreamKey::Sequence {
            item_id,
            sequence_id,
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn bitstream_by_name(
        &self,
        item_id: uuid::Uuid,
        name: &str,
    ) -> DbResult<Option<BitstreamRecord>> {
        self.bitstream_record(BitstreamKey::Name { item_id, name })
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn item_bitstreams(&self, item_id: uuid::Uuid) -> DbResult<Vec<BitstreamRecord>> {
        let mut conn = self.pool.get_connection().await?;
        bitstream_query::load_item_records(&mut conn, item_id).await
    }

    #[tracing::instrument(skip(self, collection_ids), fields(scoped = collection_ids.is_some()))]
    async fn archived_items(
        &self,
        collection_ids: Option<&[uuid::Uuid]>,
    ) -> DbResult<Vec<ItemRecord>> {
        let mut conn = self.pool.get_connection().await?;
        item_query::load_discoverable_records(&mut conn, collection_ids).await
    }

    #[tracing::instrument(skip(self))]
    async fn eperson_by_email(&self, email: &str) -> DbResult<Option<EPerson>> {
        let mut conn = self.pool.get_connection().await?;
        Ok(eperson_query::by_email(email)
            .select(EPerson::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    #[tracing::instrument(skip(self))]
    async fn eperson_groups(&self, eperson_id: uuid::Uuid) -> DbResult<Vec<EPersonGroup>> {
        let mut conn = self.pool.get_connection().await?;
        eperson_query::load_groups(&mut conn, eperson_id).await
    }
}
