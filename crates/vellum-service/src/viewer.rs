//! Viewer providers for `/explore`.
//!
//! A provider decides how an already authorized bitstream is presented: as a
//! forced download, inline, or as a JSON description without the bytes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vellum_core::constants::{DEFAULT_VIEWER_PROVIDER, RETRIEVE_ROUTE_PREFIX};
use vellum_db::model::bitstream::BitstreamRecord;

use crate::delivery::DeliveryHeaders;
use crate::delivery::disposition::Disposition;

/// What `/explore` sends back for a bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerOutput {
    /// Stream the bytes with these headers.
    Content(DeliveryHeaders),
    /// Describe the bitstream without its bytes.
    Info(BitstreamInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitstreamInfo {
    pub id: uuid::Uuid,
    pub legacy_id: i32,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub bundle: String,
    pub item_id: uuid::Uuid,
    pub item_handle: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub retrieve_url: String,
}

impl From<&BitstreamRecord> for BitstreamInfo {
    fn from(record: &BitstreamRecord) -> Self {
        let bitstream = &record.bitstream;
        Self {
            id: bitstream.id,
            legacy_id: bitstream.legacy_id,
            name: bitstream.name.clone(),
            mime_type: bitstream.mime_type.clone(),
            size_bytes: bitstream.size_bytes,
            bundle: record.bundle_name.clone(),
            item_id: record.item.id,
            item_handle: record.item.handle.clone(),
            last_modified: bitstream.last_modified,
            retrieve_url: format!("{RETRIEVE_ROUTE_PREFIX}/{}", bitstream.legacy_id),
        }
    }
}

fn content_headers(record: &BitstreamRecord, disposition: Disposition) -> DeliveryHeaders {
    let bitstream = &record.bitstream;
    DeliveryHeaders {
        content_type: bitstream.mime_type.clone(),
        content_length: u64::try_from(bitstream.size_bytes).unwrap_or_default(),
        last_modified: Some(bitstream.last_modified),
        content_encoding: None,
        content_disposition: None,
    }
    .with_disposition(disposition, &bitstream.name)
}

pub trait ViewerProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn present(&self, record: &BitstreamRecord) -> ViewerOutput;
}

/// Always an attachment, regardless of size.
pub struct DownloadViewer;

impl ViewerProvider for DownloadViewer {
    fn name(&self) -> &'static str {
        "download"
    }

    fn present(&self, record: &BitstreamRecord) -> ViewerOutput {
        ViewerOutput::Content(content_headers(record, Disposition::Attachment))
    }
}

pub struct InlineViewer;

impl ViewerProvider for InlineViewer {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn present(&self, record: &BitstreamRecord) -> ViewerOutput {
        ViewerOutput::Content(content_headers(record, Disposition::Inline))
    }
}

pub struct InfoViewer;

impl ViewerProvider for InfoViewer {
    fn name(&self) -> &'static str {
        "info"
    }

    fn present(&self, record: &BitstreamRecord) -> ViewerOutput {
        ViewerOutput::Info(BitstreamInfo::from(record))
    }
}

pub struct ViewerRegistry {
    providers: HashMap<&'static str, Arc<dyn ViewerProvider>>,
}

impl Default for ViewerRegistry {
    fn default() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register(Arc::new(DownloadViewer));
        registry.register(Arc::new(InlineViewer));
        registry.register(Arc::new(InfoViewer));
        registry
    }
}

impl ViewerRegistry {
    pub fn register(&mut self, provider: Arc<dyn ViewerProvider>) {
        self.providers.insert(provider.name(), provider);
    }

    /// ## Summary
    /// Returns the provider for `key`, or `download` when the key is absent or unknown.
    #[must_use]
    pub fn get(&self, key: Option<&str>) -> Option<Arc<dyn ViewerProvider>> {
        key.and_then(|k| self.providers.get(k))
            .or_else(|| {
                if let Some(k) = key {
                    tracing::debug!(provider = %k, "Unknown viewer provider, using default");
                }
                self.providers.get(DEFAULT_VIEWER_PROVIDER)
            })
            .cloned()
    }
}
