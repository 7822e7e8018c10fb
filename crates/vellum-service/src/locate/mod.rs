//! Turns request identifiers into repository objects or files.
//!
//! Malformed identifiers fail with `InvalidIdentifier`; well-formed ones that
//! match nothing fail with `NotFound`.

pub mod path;
pub mod sitemap;

use vellum_db::model::bitstream::BitstreamRecord;
use vellum_db::store::{HandleTarget, RepositoryStore};

use crate::error::{ServiceError, ServiceResult};

pub use path::{BitstreamPath, BitstreamSelector, HandlePath, parse_legacy_id, parse_retrieve_path};

/// Bitstream reference as accepted by the explore route: a UUID or a legacy numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitstreamRef {
    Id(uuid::Uuid),
    LegacyId(i32),
}

impl BitstreamRef {
    /// ## Errors
    /// Returns `InvalidIdentifier` if the value is neither a UUID nor a non-negative integer.
    pub fn parse(value: &str) -> ServiceResult<Self> {
        let value = value.trim();
        if let Ok(id) = uuid::Uuid::parse_str(value) {
            return Ok(Self::Id(id));
        }
        parse_legacy_id(value).map(Self::LegacyId)
    }
}

pub struct ResourceLocator<'a> {
    store: &'a dyn RepositoryStore,
}

impl<'a> ResourceLocator<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn RepositoryStore) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Resolves `/retrieve/{id}[/{filename}]`, ignoring everything after the id.
    ///
    /// ## Errors
    /// `InvalidIdentifier` for a malformed id, `NotFound` if no bitstream has it,
    /// or a collaborator error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn locate_retrieve(&self, rest: &str) -> ServiceResult<BitstreamRecord> {
        let legacy_id = parse_retrieve_path(rest)?;
        self.store
            .bitstream_by_legacy_id(legacy_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("bitstream {legacy_id}")))
    }

    /// ## Summary
    /// Resolves `/bitstream/{prefix}/{suffix}/{sequence}/{filename}`.
    ///
    /// The sequence id wins when present; otherwise the trailing path is
    /// looked up as a bitstream name within the item.
    ///
    /// ## Errors
    /// `InvalidIdentifier` for a malformed path, `NotFound` if the handle is not
    /// an item or the item has no matching bitstream.
    #[tracing::instrument(skip(self))]
    pub async fn locate_bitstream_path(&self, rest: &str) -> ServiceResult<BitstreamRecord> {
        let path = BitstreamPath::parse(rest)?;

        let item = match self.locate_handle(&path.handle).await? {
            HandleTarget::Item(item) => item,
            HandleTarget::Community(_) | HandleTarget::Collection(_) => {
                return Err(ServiceError::NotFound(format!(
                    "handle {} is not an item",
                    path.handle
                )));
            }
        };

        let found = match &path.selector {
            BitstreamSelector::Sequence(sequence_id) => {
                self.store.bitstream_by_sequence(item.id, *sequence_id).await?
            }
            BitstreamSelector::Name(name) => self.store.bitstream_by_name(item.id, name).await?,
        };

        found.ok_or_else(|| ServiceError::NotFound(format!("bitstream {rest}")))
    }

    /// ## Errors
    /// `NotFound` if nothing is registered under the handle.
    #[tracing::instrument(skip(self))]
    pub async fn locate_handle(&self, handle: &str) -> ServiceResult<HandleTarget> {
        self.store
            .resolve_handle(handle)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("handle {handle}")))
    }

    /// ## Errors
    /// `NotFound` if no bitstream matches the reference.
    #[tracing::instrument(skip(self))]
    pub async fn locate_bitstream_ref(&self, reference: BitstreamRef) -> ServiceResult<BitstreamRecord> {
        let found = match reference {
            BitstreamRef::Id(id) => self.store.bitstream(id).await?,
            BitstreamRef::LegacyId(legacy_id) => self.store.bitstream_by_legacy_id(legacy_id).await?,
        };
        found.ok_or_else(|| ServiceError::NotFound(format!("bitstream {reference:?}")))
    }
}
