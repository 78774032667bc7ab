//! blobgate-http: axum gateway for a pluggable blob store.
//!
//! Translates HTTP GET/PUT into [`blobgate_store::BlobStore`] calls: content
//! streams in bounded chunks in both directions, ranged GETs answer with
//! partial content, and the store is an explicit dependency injected at
//! construction.

pub mod gateway;
pub mod logs;
pub mod range;
pub mod state;
mod error;

pub use error::GatewayError;
pub use gateway::BlobGateway;
pub use logs::{FanoutLogger, LogLevel, LogSink, TracingSink};
pub use state::GatewayState;
