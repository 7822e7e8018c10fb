//! JSON shapes for structure, browse and search responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vellum_core::constants::BITSTREAM_ROUTE_PREFIX;
use vellum_db::model::bitstream::BitstreamRecord;
use vellum_db::model::container::{Collection, Community};
use vellum_db::model::item::ItemRecord;
use vellum_service::hierarchy::HierarchyIndex;

#[derive(Debug, Serialize)]
pub(crate) struct CollectionSummary {
    pub id: uuid::Uuid,
    pub handle: String,
    pub name: String,
    pub short_description: Option<String>,
    pub last_modified: DateTime<Utc>,
}

impl From<&Collection> for CollectionSummary {
    fn from(c: &Collection) -> Self {
        Self {
            id: c.id,
            handle: c.handle.clone(),
            name: c.name.clone(),
            short_description: c.short_description.clone(),
            last_modified: c.last_modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CommunityNode {
    pub id: uuid::Uuid,
    pub handle: String,
    pub name: String,
    pub short_description: Option<String>,
    pub collections: Vec<CollectionSummary>,
    pub sub_communities: Vec<CommunityNode>,
}

impl CommunityNode {
    /// Renders `community` and its descendants from an index built over them.
    pub fn from_index(index: &HierarchyIndex, community: &Community) -> Self {
        let collections = index
            .collections_of(community.id)
            .iter()
            .filter_map(|id| index.collection(*id))
            .map(CollectionSummary::from)
            .collect();
        let sub_communities = index
            .children_of(community.id)
            .iter()
            .filter_map(|id| index.community(*id))
            .map(|child| Self::from_index(index, child))
            .collect();

        Self {
            id: community.id,
            handle: community.handle.clone(),
            name: community.name.clone(),
            short_description: community.short_description.clone(),
            collections,
            sub_communities,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemSummary {
    pub id: uuid::Uuid,
    pub handle: Option<String>,
    pub collection_id: uuid::Uuid,
    pub title: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub metadata: BTreeMap<String, Vec<String>>,
}

impl From<&ItemRecord> for ItemSummary {
    fn from(record: &ItemRecord) -> Self {
        let mut metadata: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for value in &record.metadata {
            metadata
                .entry(value.field.clone())
                .or_default()
                .push(value.value.clone());
        }

        Self {
            id: record.item.id,
            handle: record.item.handle.clone(),
            collection_id: record.item.owning_collection_id,
            title: record.first_value("dc.title").map(ToString::to_string),
            last_modified: record.item.last_modified,
            metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BitstreamSummary {
    pub id: uuid::Uuid,
    pub legacy_id: i32,
    pub sequence_id: i32,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub bundle: String,
    pub url: Option<String>,
}

impl From<&BitstreamRecord> for BitstreamSummary {
    fn from(record: &BitstreamRecord) -> Self {
        let b = &record.bitstream;
        Self {
            id: b.id,
            legacy_id: b.legacy_id,
            sequence_id: b.sequence_id,
            name: b.name.clone(),
            mime_type: b.mime_type.clone(),
            size_bytes: b.size_bytes,
            bundle: record.bundle_name.clone(),
            url: record.item.handle.as_ref().map(|handle| {
                format!(
                    "{BITSTREAM_ROUTE_PREFIX}/{handle}/{}/{}",
                    b.sequence_id,
                    urlencoding::encode(&b.name)
                )
            }),
        }
    }
}
