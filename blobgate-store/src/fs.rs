use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::chunk::{copy_stream, CHUNK_SIZE};
use crate::{Blob, BlobError, BlobId, BlobResult, BlobStore, ByteStream};

/// Filesystem-backed blob store: one file per blob under a root directory.
///
/// `put` streams the body straight to disk; `find` opens the file lazily and
/// streams it back in [`CHUNK_SIZE`] chunks.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Ids assigned by this store never contain path separators, so anything
    /// that would escape the root cannot name a stored blob and misses.
    fn blob_path(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(id))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn find(&self, id: &str) -> BlobResult<Option<Blob>> {
        let Some(path) = self.blob_path(id) else {
            return Ok(None);
        };
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let size = file.metadata().await?.len();
        let content: ByteStream = Box::pin(ReaderStream::with_capacity(file, CHUNK_SIZE));
        Ok(Some(Blob::new(
            BlobId::from_string(id.to_string()),
            size,
            content,
        )))
    }

    async fn put(&self, content: ByteStream) -> BlobResult<Blob> {
        let id = BlobId::new();
        let path = self.root.join(id.as_str());

        let mut file = File::create(&path).await?;
        match copy_stream(content, &mut file).await {
            Ok(_) => {}
            Err(err) => {
                // don't leave a truncated object behind
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(err.into());
            }
        }

        self.find(id.as_str())
            .await?
            .ok_or_else(|| BlobError::not_found(id.as_str()))
    }
}
