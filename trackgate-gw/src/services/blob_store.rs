//! Local audio blob storage
//!
//! Blobs live at `{root}/{track_id}.mp3`. Downloads are staged in a temp
//! file inside `root` and renamed into place once complete, so the final
//! path never holds a partial download.

use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const BLOB_EXTENSION: &str = "mp3";

#[derive(Debug, Error)]
pub enum BlobError {
    /// Identifier would resolve outside the blob root
    #[error("Refusing blob path for track identifier {0:?}")]
    InvalidKey(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlobError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A download in progress, not yet visible at its final path
#[derive(Debug)]
pub struct StagedBlob {
    file: NamedTempFile,
}

impl StagedBlob {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final location for a track's audio
    pub fn path_for(&self, track_id: &str) -> Result<PathBuf, BlobError> {
        if !is_safe_key(track_id) {
            return Err(BlobError::InvalidKey(track_id.to_string()));
        }
        Ok(self.root.join(format!("{}.{}", track_id, BLOB_EXTENSION)))
    }

    /// Create the root directory and an empty staging file inside it
    pub async fn stage(&self) -> Result<StagedBlob, BlobError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BlobError::io(&self.root, e))?;
        let file = NamedTempFile::new_in(&self.root).map_err(|e| BlobError::io(&self.root, e))?;
        Ok(StagedBlob { file })
    }

    /// Move a completed download onto its final path, replacing any old copy
    pub async fn commit(&self, staged: StagedBlob, dest: &Path) -> Result<(), BlobError> {
        let target = dest.to_path_buf();
        tokio::task::spawn_blocking(move || staged.file.persist(&target).map(|_| ()))
            .await
            .map_err(|e| BlobError::io(dest, std::io::Error::new(std::io::ErrorKind::Other, e)))?
            .map_err(|e| BlobError::io(dest, e.error))
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, BlobError> {
        tokio::fs::read(path).await.map_err(|e| BlobError::io(path, e))
    }
}

fn is_safe_key(track_id: &str) -> bool {
    !track_id.is_empty()
        && track_id != "."
        && track_id != ".."
        && !track_id.contains(&['/', '\\', '\0'][..])
}
