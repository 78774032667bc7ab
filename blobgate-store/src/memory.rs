use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::chunk::CHUNK_SIZE;
use crate::{Blob, BlobId, BlobResult, BlobStore, ByteStream};

/// In-memory blob store.
///
/// Holds each blob as a list of bounded chunks so reads stay incremental
/// even though the backend itself is fully resident. Mainly for tests and
/// single-process deployments.
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

struct StoredBlob {
    size: u64,
    chunks: Vec<Bytes>,
}

impl StoredBlob {
    fn content(&self) -> ByteStream {
        // Bytes clones are refcounted, not copies
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            self.chunks.iter().cloned().map(Ok).collect();
        Box::pin(stream::iter(chunks))
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently held.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn find(&self, id: &str) -> BlobResult<Option<Blob>> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(id).map(|stored| {
            Blob::new(
                BlobId::from_string(id.to_string()),
                stored.size,
                stored.content(),
            )
        }))
    }

    async fn put(&self, mut content: ByteStream) -> BlobResult<Blob> {
        let mut chunks = Vec::new();
        let mut size: u64 = 0;
        while let Some(chunk) = content.next().await {
            let mut chunk = chunk?;
            size += chunk.len() as u64;
            while chunk.len() > CHUNK_SIZE {
                chunks.push(chunk.split_to(CHUNK_SIZE));
            }
            if !chunk.is_empty() {
                chunks.push(chunk);
            }
        }

        let id = BlobId::new();
        let stored = StoredBlob { size, chunks };
        let blob = Blob::new(id.clone(), size, stored.content());
        self.blobs
            .write()
            .await
            .insert(id.as_str().to_string(), stored);
        Ok(blob)
    }
}
