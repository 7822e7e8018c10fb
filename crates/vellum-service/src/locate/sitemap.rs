//! Pre-generated sitemap files.

use std::path::{Path, PathBuf};

use vellum_db::assetstore::{ByteSource, open_file};

use crate::error::{ServiceError, ServiceResult};

use super::path::parse_legacy_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// Gzip-compressed XML sitemaps.
    Xml,
    /// Plain HTML site maps.
    Html,
}

impl SitemapKind {
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Xml => "text/xml",
            Self::Html => "text/html",
        }
    }

    /// Encoding of the stored bytes, sent as-is.
    #[must_use]
    pub const fn content_encoding(self) -> Option<&'static str> {
        match self {
            Self::Xml => Some("gzip"),
            Self::Html => None,
        }
    }

    fn file_name(self, map: Option<i32>) -> String {
        let stem = map.map_or_else(|| "sitemap_index".to_string(), |n| format!("sitemap{n}"));
        match self {
            Self::Xml => format!("{stem}.xml.gz"),
            Self::Html => format!("{stem}.html"),
        }
    }
}

/// ## Summary
/// Maps the `map` query parameter to a file under `dir`.
///
/// ## Errors
/// Returns `InvalidIdentifier` unless `map` is absent or a non-negative integer.
pub fn sitemap_path(dir: &Path, kind: SitemapKind, map: Option<&str>) -> ServiceResult<PathBuf> {
    let map = map.map(parse_legacy_id).transpose()?;
    Ok(dir.join(kind.file_name(map)))
}

/// ## Summary
/// Opens a sitemap file for streaming.
///
/// ## Errors
/// `InvalidIdentifier` for a bad `map`, `NotFound` if the file does not exist,
/// or a collaborator error for other I/O failures.
#[tracing::instrument(skip(dir))]
pub async fn open_sitemap(dir: &Path, kind: SitemapKind, map: Option<&str>) -> ServiceResult<ByteSource> {
    let path = sitemap_path(dir, kind, map)?;
    open_file(&path).await.map_err(|err| {
        tracing::debug!(path = %path.display(), error = %err, "Sitemap file unavailable");
        ServiceError::from_storage_io(&err, "sitemap")
    })
}
