//! "Export all" for browse listings.
//!
//! The scope is widened to the whole result set and rendered to CSV in
//! memory before anything is sent, so a failing browse never produces a
//! truncated download.

use std::collections::HashMap;

use vellum_core::util::slug::generate_slug;
use vellum_db::assetstore::ByteSource;
use vellum_db::store::RepositoryStore;

use crate::auth::ItemVisibility;
use crate::delivery::DeliveryHeaders;
use crate::delivery::disposition::Disposition;
use crate::error::ServiceResult;

use super::csv;
use super::engine::BrowseEngine;
use super::scope::BrowserScope;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=UTF-8";

/// A complete CSV export, ready to stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub filename: String,
    pub body: Vec<u8>,
}

impl CsvDocument {
    #[must_use]
    pub fn headers(&self) -> DeliveryHeaders {
        DeliveryHeaders::plan(
            CSV_CONTENT_TYPE,
            self.body.len() as u64,
            &self.filename,
            vellum_core::config::DispositionThreshold::Disabled,
        )
        .with_disposition(Disposition::Attachment, &self.filename)
    }

    #[must_use]
    pub fn into_source(self) -> ByteSource {
        ByteSource {
            length: self.body.len() as u64,
            last_modified: None,
            reader: Box::new(std::io::Cursor::new(self.body)),
        }
    }
}

pub struct BrowseExportCoordinator<'a> {
    store: &'a dyn RepositoryStore,
    engine: BrowseEngine<'a>,
}

impl<'a> BrowseExportCoordinator<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn RepositoryStore, engine: BrowseEngine<'a>) -> Self {
        Self { store, engine }
    }

    /// ## Summary
    /// Runs `scope` with offset 0 and no page limit and renders every item
    /// `visibility` admits.
    ///
    /// ## Errors
    /// `BrowseFailure`, `StructuralCycle` or collaborator errors from the browse.
    #[tracing::instrument(skip(self, scope, visibility), fields(index = %scope.index))]
    pub async fn export_all(
        &self,
        scope: BrowserScope,
        visibility: &dyn ItemVisibility,
    ) -> ServiceResult<CsvDocument> {
        let scope = scope.for_export();
        let page = self.engine.browse(&scope, visibility).await?;

        let mut collection_handles: HashMap<uuid::Uuid, String> = HashMap::new();
        for record in &page.items {
            let id = record.item.owning_collection_id;
            if collection_handles.contains_key(&id) {
                continue;
            }
            if let Some(collection) = self.store.collection(id).await? {
                collection_handles.insert(id, collection.handle);
            }
        }

        let body = csv::render(&page.items, &collection_handles).into_bytes();
        let stem = scope
            .container
            .as_ref()
            .map_or_else(|| "browse".to_string(), |c| generate_slug(c.handle()));

        tracing::info!(rows = page.items.len(), bytes = body.len(), "Browse export rendered");

        Ok(CsvDocument {
            filename: format!("{stem}.csv"),
            body,
        })
    }
}
