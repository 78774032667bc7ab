use bytes::Bytes;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use uuid::Uuid;

/// Stream of bytes for blob content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Unique identifier for a blob
///
/// Assigned by the store on `put` and stable thereafter; doubles as the
/// HTTP `ETag` since blobs are immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(pub String);

impl BlobId {
    /// Generate a new random blob ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from existing string
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored blob: identity, total size, and a read-once byte source.
///
/// `size` is known before transfer begins and equals the total number of
/// bytes `content` will produce. The stream is sequential and not seekable;
/// callers that need a sub-range slice it as it flows.
pub struct Blob {
    pub id: BlobId,
    pub size: u64,
    pub content: ByteStream,
}

impl Blob {
    pub fn new(id: BlobId, size: u64, content: ByteStream) -> Self {
        Self { id, size, content }
    }

    /// The metadata a caller needs to retrieve this blob later.
    pub fn reference(&self) -> BlobRef {
        BlobRef {
            id: self.id.clone(),
            size: self.size,
        }
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("id", &self.id)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Receipt returned to a caller after storing a blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub id: BlobId,
    pub size: u64,
}

/// Byte range for partial content requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>, // inclusive; None means "to end of blob"
}

impl ByteRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Resolve against a blob's total size.
    ///
    /// Returns `None` when the range is unsatisfiable (`start` at or past
    /// the end). An `end` past the last byte is clamped, per RFC 7233.
    pub fn resolve(&self, total_size: u64) -> Option<ResolvedRange> {
        if self.start >= total_size {
            return None;
        }
        let last = total_size - 1;
        let end = self.end.map_or(last, |end| end.min(last));
        Some(ResolvedRange {
            start: self.start,
            end,
            total_size,
        })
    }
}

/// Range information for partial content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u64,
    pub end: u64, // inclusive
    pub total_size: u64,
}

impl ResolvedRange {
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_full_content(&self) -> bool {
        self.start == 0 && self.end == self.total_size - 1
    }
}
