//! In-memory [`RepositoryStore`] for tests.
//!
//! The graph is assembled with `&mut self` builder calls before the store is
//! shared. Link methods do not validate the shape, so tests can build cyclic
//! community graphs on purpose.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::result::DatabaseErrorKind;
use diesel_async::pooled_connection::bb8::RunError;

use crate::error::{DbError, DbResult};
use crate::model::bitstream::{Bitstream, BitstreamRecord, Bundle};
use crate::model::container::{Collection, Community, ContainerChildren};
use crate::model::eperson::{EPerson, EPersonGroup};
use crate::model::item::{Item, ItemRecord, MetadataValue};
use crate::store::{HandleTarget, RepositoryStore};

/// Failure every store call reports while set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    /// Behaves like a pool checkout timing out.
    Timeout,
    /// Behaves like a closed database connection.
    Unavailable,
}

/// Fixed timestamp given to every entity unless a test overrides it.
#[must_use]
pub fn default_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

#[derive(Default)]
pub struct MemoryStore {
    communities: Vec<Community>,
    collections: Vec<Collection>,
    community_links: Vec<(uuid::Uuid, uuid::Uuid)>,
    collection_links: Vec<(uuid::Uuid, uuid::Uuid)>,
    items: Vec<Item>,
    metadata: Vec<MetadataValue>,
    bundles: Vec<Bundle>,
    bitstreams: Vec<Bitstream>,
    epeople: Vec<EPerson>,
    groups: Vec<EPersonGroup>,
    memberships: Vec<(uuid::Uuid, uuid::Uuid)>,
    fault: Mutex<Option<MemoryFault>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_community(&mut self, handle: &str, name: &str) -> Community {
        let community = Community {
            id: uuid::Uuid::new_v4(),
            handle: handle.to_string(),
            name: name.to_string(),
            short_description: None,
            last_modified: default_timestamp(),
        };
        self.communities.push(community.clone());
        community
    }

    pub fn add_sub_community(&mut self, parent_id: uuid::Uuid, handle: &str, name: &str) -> Community {
        let community = self.add_community(handle, name);
        self.link_community(parent_id, community.id);
        community
    }

    /// Adds a parent/child edge without any shape checks.
    pub fn link_community(&mut self, parent_id: uuid::Uuid, child_id: uuid::Uuid) {
        self.community_links.push((parent_id, child_id));
    }

    pub fn add_collection(&mut self, community_id: uuid::Uuid, handle: &str, name: &str) -> Collection {
        let collection = Collection {
            id: uuid::Uuid::new_v4(),
            handle: handle.to_string(),
            name: name.to_string(),
            short_description: None,
            last_modified: default_timestamp(),
        };
        self.collections.push(collection.clone());
        self.link_collection(community_id, collection.id);
        collection
    }

    pub fn link_collection(&mut self, community_id: uuid::Uuid, collection_id: uuid::Uuid) {
        self.collection_links.push((community_id, collection_id));
    }

    /// Adds an archived item owned by `collection_id`.
    pub fn add_item(
        &mut self,
        collection_id: uuid::Uuid,
        handle: Option<&str>,
        metadata: &[(&str, &str)],
    ) -> Item {
        let item = Item {
            id: uuid::Uuid::new_v4(),
            handle: handle.map(ToString::to_string),
            owning_collection_id: collection_id,
            in_archive: true,
            withdrawn: false,
            last_modified: default_timestamp(),
        };

        for (field, value) in metadata {
            let place = self
                .metadata
                .iter()
                .filter(|m| m.item_id == item.id && m.field == *field)
                .count();
            self.metadata.push(MetadataValue {
                id: uuid::Uuid::new_v4(),
                item_id: item.id,
                field: (*field).to_string(),
                value: (*value).to_string(),
                place: i32::try_from(place).unwrap_or(i32::MAX),
            });
        }

        self.items.push(item.clone());
        item
    }

    pub fn set_item_state(&mut self, item_id: uuid::Uuid, in_archive: bool, withdrawn: bool) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.in_archive = in_archive;
            item.withdrawn = withdrawn;
        }
    }

    /// Adds a bitstream to the named bundle of an item, creating the bundle on
    /// first use. Legacy and sequence ids are assigned in insertion order and
    /// the asset store key is the bitstream id.
    pub fn add_bitstream(
        &mut self,
        item_id: uuid::Uuid,
        bundle_name: &str,
        name: &str,
        mime_type: &str,
        size_bytes: i64,
    ) -> Bitstream {
        let bundle_id = if let Some(bundle) = self
            .bundles
            .iter()
            .find(|b| b.item_id == item_id && b.name == bundle_name)
        {
            bundle.id
        } else {
            let bundle = Bundle {
                id: uuid::Uuid::new_v4(),
                item_id,
                name: bundle_name.to_string(),
            };
            let id = bundle.id;
            self.bundles.push(bundle);
            id
        };

        let item_bundles: Vec<uuid::Uuid> = self
            .bundles
            .iter()
            .filter(|b| b.item_id == item_id)
            .map(|b| b.id)
            .collect();
        let next_sequence = self
            .bitstreams
            .iter()
            .filter(|b| item_bundles.contains(&b.bundle_id))
            .map(|b| b.sequence_id)
            .max()
            .unwrap_or(0)
            + 1;
        let next_legacy = self
            .bitstreams
            .iter()
            .map(|b| b.legacy_id)
            .max()
            .unwrap_or(0)
            + 1;

        let id = uuid::Uuid::new_v4();
        let bitstream = Bitstream {
            id,
            legacy_id: next_legacy,
            bundle_id,
            sequence_id: next_sequence,
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
            internal_id: id.to_string(),
            last_modified: default_timestamp(),
            deleted: false,
        };
        self.bitstreams.push(bitstream.clone());
        bitstream
    }

    pub fn set_bitstream_legacy_id(&mut self, id: uuid::Uuid, legacy_id: i32) {
        if let Some(bitstream) = self.bitstreams.iter_mut().find(|b| b.id == id) {
            bitstream.legacy_id = legacy_id;
        }
    }

    pub fn set_bitstream_last_modified(&mut self, id: uuid::Uuid, last_modified: DateTime<Utc>) {
        if let Some(bitstream) = self.bitstreams.iter_mut().find(|b| b.id == id) {
            bitstream.last_modified = last_modified;
        }
    }

    pub fn mark_bitstream_deleted(&mut self, id: uuid::Uuid) {
        if let Some(bitstream) = self.bitstreams.iter_mut().find(|b| b.id == id) {
            bitstream.deleted = true;
        }
    }

    pub fn add_eperson(&mut self, email: &str, name: &str, password_hash: Option<&str>) -> EPerson {
        let eperson = EPerson {
            id: uuid::Uuid::new_v4(),
            email: email.to_lowercase(),
            name: name.to_string(),
            password_hash: password_hash.map(ToString::to_string),
            can_log_in: true,
        };
        self.epeople.push(eperson.clone());
        eperson
    }

    /// Adds a group with a caller-chosen id, e.g. the seeded administrator group.
    pub fn add_group_with_id(&mut self, id: uuid::Uuid, name: &str) -> EPersonGroup {
        let group = EPersonGroup {
            id,
            name: name.to_string(),
        };
        self.groups.push(group.clone());
        group
    }

    pub fn add_group(&mut self, name: &str) -> EPersonGroup {
        self.add_group_with_id(uuid::Uuid::new_v4(), name)
    }

    pub fn add_member(&mut self, group_id: uuid::Uuid, eperson_id: uuid::Uuid) {
        self.memberships.push((group_id, eperson_id));
    }

    /// Makes every subsequent call fail until cleared with `None`.
    pub fn set_fault(&self, fault: Option<MemoryFault>) {
        *self.fault.lock().unwrap_or_else(PoisonError::into_inner) = fault;
    }

    fn check_fault(&self) -> DbResult<()> {
        match *self.fault.lock().unwrap_or_else(PoisonError::into_inner) {
            None => Ok(()),
            Some(MemoryFault::Timeout) => Err(DbError::PoolError(RunError::TimedOut)),
            Some(MemoryFault::Unavailable) => Err(DbError::DatabaseError(
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ClosedConnection,
                    Box::new("memory store offline".to_string()),
                ),
            )),
        }
    }

    fn metadata_of(&self, item_id: uuid::Uuid) -> Vec<MetadataValue> {
        let mut metadata: Vec<MetadataValue> = self
            .metadata
            .iter()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect();
        metadata.sort_by(|a, b| a.field.cmp(&b.field).then(a.place.cmp(&b.place)));
        metadata
    }

    fn record_for(&self, bitstream: &Bitstream) -> Option<BitstreamRecord> {
        let bundle = self.bundles.iter().find(|b| b.id == bitstream.bundle_id)?;
        let item = self.items.iter().find(|i| i.id == bundle.item_id)?;
        Some(BitstreamRecord {
            bitstream: bitstream.clone(),
            bundle_name: bundle.name.clone(),
            item: item.clone(),
        })
    }

    fn item_records(&self, item_id: uuid::Uuid) -> Vec<BitstreamRecord> {
        let mut records: Vec<BitstreamRecord> = self
            .bitstreams
            .iter()
            .filter(|b| !b.deleted)
            .filter_map(|b| self.record_for(b))
            .filter(|r| r.item.id == item_id)
            .collect();
        records.sort_by_key(|r| r.bitstream.sequence_id);
        records
    }
}

#[async_trait]
impl RepositoryStore for MemoryStore {
    async fn top_communities(&self) -> DbResult<Vec<Community>> {
        self.check_fault()?;
        let mut top: Vec<Community> = self
            .communities
            .iter()
            .filter(|c| !self.community_links.iter().any(|(_, child)| *child == c.id))
            .cloned()
            .collect();
        top.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(top)
    }

    async fn community(&self, id: uuid::Uuid) -> DbResult<Option<Community>> {
        self.check_fault()?;
        Ok(self.communities.iter().find(|c| c.id == id).cloned())
    }

    async fn collection(&self, id: uuid::Uuid) -> DbResult<Option<Collection>> {
        self.check_fault()?;
        Ok(self.collections.iter().find(|c| c.id == id).cloned())
    }

    async fn community_children(&self, id: uuid::Uuid) -> DbResult<ContainerChildren> {
        self.check_fault()?;
        let sub_communities = self
            .community_links
            .iter()
            .filter(|(parent, _)| *parent == id)
            .filter_map(|(_, child)| self.communities.iter().find(|c| c.id == *child))
            .cloned()
            .collect();
        let collections = self
            .collection_links
            .iter()
            .filter(|(community, _)| *community == id)
            .filter_map(|(_, child)| self.collections.iter().find(|c| c.id == *child))
            .cloned()
            .collect();
        Ok(ContainerChildren {
            sub_communities,
            collections,
        })
    }

    async fn resolve_handle(&self, handle: &str) -> DbResult<Option<HandleTarget>> {
        self.check_fault()?;
        if let Some(community) = self.communities.iter().find(|c| c.handle == handle) {
            return Ok(Some(HandleTarget::Community(community.clone())));
        }
        if let Some(collection) = self.collections.iter().find(|c| c.handle == handle) {
            return Ok(Some(HandleTarget::Collection(collection.clone())));
        }
        Ok(self
            .items
            .iter()
            .find(|i| i.handle.as_deref() == Some(handle))
            .cloned()
            .map(HandleTarget::Item))
    }

    async fn item(&self, id: uuid::Uuid) -> DbResult<Option<Item>> {
        self.check_fault()?;
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    async fn item_metadata(&self, item_id: uuid::Uuid) -> DbResult<Vec<MetadataValue>> {
        self.check_fault()?;
        Ok(self.metadata_of(item_id))
    }

    async fn bitstream(&self, id: uuid::Uuid) -> DbResult<Option<BitstreamRecord>> {
        self.check_fault()?;
        Ok(self
            .bitstreams
            .iter()
            .find(|b| b.id == id && !b.deleted)
            .and_then(|b| self.record_for(b)))
    }

    async fn bitstream_by_legacy_id(&self, legacy_id: i32) -> DbResult<Option<BitstreamRecord>> {
        self.check_fault()?;
        Ok(self
            .bitstreams
            .iter()
            .find(|b| b.legacy_id == legacy_id && !b.deleted)
            .and_then(|b| self.record_for(b)))
    }

    async fn bitstream_by_sequence(
        &self,
        item_id: uuid::Uuid,
        sequence_id: i32,
    ) -> DbResult<Option<BitstreamRecord>> {
        self.check_fault()?;
        Ok(self
            .item_records(item_id)
            .into_iter()
            .find(|r| r.bitstream.sequence_id == sequence_id))
    }

    async fn bitstream_by_name(
        &self,
        item_id: uuid::Uuid,
        name: &str,
    ) -> DbResult<Option<BitstreamRecord>> {
        self.check_fault()?;
        Ok(self
            .item_records(item_id)
            .into_iter()
            .find(|r| r.bitstream.name == name))
    }

    async fn item_bitstreams(&self, item_id: uuid::Uuid) -> DbResult<Vec<BitstreamRecord>> {
        self.check_fault()?;
        Ok(self.item_records(item_id))
    }

    async fn archived_items(
        &self,
        collection_ids: Option<&[uuid::Uuid]>,
    ) -> DbResult<Vec<ItemRecord>> {
        self.check_fault()?;
        let mut records: Vec<ItemRecord> = self
            .items
            .iter()
            .filter(|i| i.is_discoverable())
            .filter(|i| collection_ids.is_none_or(|ids| ids.contains(&i.owning_collection_id)))
            .map(|item| ItemRecord {
                item: item.clone(),
                metadata: self.metadata_of(item.id),
            })
            .collect();
        records.sort_by_key(|r| r.item.id);
        Ok(records)
    }

    async fn eperson_by_email(&self, email: &str) -> DbResult<Option<EPerson>> {
        self.check_fault()?;
        let email = email.to_lowercase();
        Ok(self.epeople.iter().find(|e| e.email == email).cloned())
    }

    async fn eperson_groups(&self, eperson_id: uuid::Uuid) -> DbResult<Vec<EPersonGroup>> {
        self.check_fault()?;
        let mut groups: Vec<EPersonGroup> = self
            .memberships
            .iter()
            .filter(|(_, member)| *member == eperson_id)
            .filter_map(|(group, _)| self.groups.iter().find(|g| g.id == *group))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }
}
