//! # blobgate-store: streaming blob storage for the blobgate gateway
//!
//! `blobgate-store` provides the storage contract the HTTP gateway is built
//! against: immutable, opaquely-identified blobs moved as bounded-chunk byte
//! streams. Whole objects are never held in gateway memory; a blob's content
//! is a read-once stream in both directions.
//!
//! ## Quick Start
//!
//! ```rust
//! use blobgate_store::{BlobStore, ByteStream, MemoryBlobStore};
//! use bytes::Bytes;
//! use futures_util::stream;
//!
//! # #[tokio::main]
//! # async fn main() -> blobgate_store::BlobResult<()> {
//! let store = MemoryBlobStore::new();
//!
//! let body: ByteStream = Box::pin(stream::iter([Ok(Bytes::from_static(b"hello"))]));
//! let blob = store.put(body).await?;
//! assert_eq!(blob.size, 5);
//!
//! let found = store.find(blob.id.as_str()).await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  blobgate-http   │  ← HTTP semantics (status codes, ranges, headers)
//! ├──────────────────┤
//! │    BlobStore     │  ← find/put over streaming blobs
//! ├──────────────────┤
//! │ memory / fs / …  │  ← pluggable backends
//! └──────────────────┘
//! ```
//!
//! The gateway treats every backend the same way: `find` may miss, `put`
//! always creates a new blob, and content only ever moves one chunk at a
//! time.

pub mod chunk;
mod error;
mod fs;
mod memory;
pub mod store;
mod types;

pub use chunk::{copy_stream, slice_stream, CHUNK_SIZE};
pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use store::BlobStore;
pub use types::{Blob, BlobId, BlobRef, ByteRange, ByteStream, ResolvedRange};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Blob, BlobError, BlobId, BlobRef, BlobResult, BlobStore, ByteStream};
}
