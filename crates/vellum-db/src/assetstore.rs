//! Byte storage for bitstream content, addressed by the bitstream's internal id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

/// An opened stream of content together with what is known about it up front.
pub struct ByteSource {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub length: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteSource")
            .field("length", &self.length)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// ## Summary
    /// Opens the content stored under `internal_id`.
    ///
    /// ## Errors
    /// Returns `NotFound` if nothing is stored under the id, or any I/O error
    /// raised while opening.
    async fn open(&self, internal_id: &str) -> std::io::Result<ByteSource>;
}

/// ## Summary
/// Opens a file for streaming, taking length and modification time from its metadata.
///
/// ## Errors
/// Returns I/O errors from opening or inspecting the file. Directories are
/// reported as `NotFound`.
pub async fn open_file(path: &Path) -> std::io::Result<ByteSource> {
    let file = tokio::fs::File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(std::io::Error::from(std::io::ErrorKind::NotFound));
    }

    Ok(ByteSource {
        length: metadata.len(),
        last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        reader: Box::new(file),
    })
}

/// Asset store rooted at a directory, one file per internal id.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Internal ids are single path components; anything else is treated as absent.
    fn path_for(&self, internal_id: &str) -> Option<PathBuf> {
        let invalid = internal_id.is_empty()
            || internal_id == "."
            || internal_id == ".."
            || internal_id.contains(['/', '\\', '\0']);
        (!invalid).then(|| self.root.join(internal_id))
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    #[tracing::instrument(skip(self))]
    async fn open(&self, internal_id: &str) -> std::io::Result<ByteSource> {
        let Some(path) = self.path_for(internal_id) else {
            tracing::warn!("Rejected asset id that is not a single path component");
            return Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        };
        open_file(&path).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryAssetStore;

#[cfg(any(test, feature = "test-support"))]
mod memory {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::{AssetStore, ByteSource};

    /// Asset store holding content in memory, for tests.
    #[derive(Debug, Default, Clone)]
    pub struct MemoryAssetStore {
        assets: HashMap<String, Vec<u8>>,
    }

    impl MemoryAssetStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, internal_id: impl Into<String>, content: impl Into<Vec<u8>>) {
            self.assets.insert(internal_id.into(), content.into());
        }
    }

    #[async_trait]
    impl AssetStore for MemoryAssetStore {
        async fn open(&self, internal_id: &str) -> std::io::Result<ByteSource> {
            let content = self
                .assets
                .get(internal_id)
                .cloned()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))?;
            Ok(ByteSource {
                length: content.len() as u64,
                last_modified: None,
                reader: Box::new(std::io::Cursor::new(content)),
            })
        }
    }
}
