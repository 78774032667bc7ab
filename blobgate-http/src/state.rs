use std::sync::Arc;

use blobgate_store::BlobStore;

use crate::logs::FanoutLogger;

/// Per-gateway shared state handed to every request handler.
///
/// The store reference is bound once at construction and read-only from the
/// gateway's perspective; nothing else is shared across requests.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn BlobStore>,
    pub logs: Arc<FanoutLogger>,
}
