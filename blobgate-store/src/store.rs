use async_trait::async_trait;

use crate::{Blob, BlobResult, ByteStream};

/// Core blob storage operations - must be implemented by all storage backends
///
/// Implementations are shared behind an `Arc` and must tolerate concurrent
/// use; the gateway imposes no serialization of its own.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Look up a blob by id.
    ///
    /// Unknown ids resolve to `Ok(None)`, as do ids the backend could never
    /// have assigned; callers cannot tell the two apart. Errors are reserved
    /// for backend failures.
    async fn find(&self, id: &str) -> BlobResult<Option<Blob>>;

    /// Store a new blob from a stream.
    ///
    /// Consumes the entire source, assigns a fresh id, and returns a handle
    /// whose `content` re-reads the stored bytes. Every call creates a new
    /// blob; an existing id is never overwritten.
    async fn put(&self, content: ByteStream) -> BlobResult<Blob>;
}
