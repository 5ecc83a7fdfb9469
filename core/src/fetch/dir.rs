//! Local directory fetcher

use std::path::{Path, PathBuf};

use gbhost_shared::fs::MAX_ROM_BYTES;
use gbhost_shared::is_safe_resource_name;

use super::{FetchError, Fetcher};
use crate::payload::Payload;

/// Fetches resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
    max_bytes: u64,
}

impl DirFetcher {
    /// Create a fetcher rooted at `root` with the default size cap
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_limit(root, MAX_ROM_BYTES)
    }

    /// Create a fetcher rooted at `root` with a size cap
    pub fn with_limit(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Directory resources are read from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for DirFetcher {
    async fn fetch(&self, name: &str) -> Result<Payload, FetchError> {
        if !is_safe_resource_name(name) {
            return Err(FetchError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        tracing::debug!("Reading {}", path.display());

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", path.display(), e)))?;
        if metadata.len() > self.max_bytes {
            return Err(FetchError::TooLarge {
                resource: name.to_string(),
                len: metadata.len(),
                max: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Payload::new(bytes))
    }
}
