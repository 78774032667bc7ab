use std::sync::Arc;

use anyhow::{bail, Context, Result};
use blobgate_http::BlobGateway;
use blobgate_store::{BlobStore, FsBlobStore, MemoryBlobStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("BLOBGATE_ADDR").unwrap_or_else(|_| "127.0.0.1:3030".to_string());

    // The backend is resolved before binding the listener: a gateway without
    // a store cannot serve any request, so misconfiguration is fatal here
    // rather than deferred to the first request.
    let store = resolve_store().await?;

    tracing::info!(%addr, "starting blob gateway");
    BlobGateway::new(store).listen(addr).await
}

async fn resolve_store() -> Result<Arc<dyn BlobStore>> {
    match std::env::var("BLOBGATE_STORE").as_deref() {
        Ok("memory") => Ok(Arc::new(MemoryBlobStore::new())),
        Ok("fs") => {
            let root = std::env::var("BLOBGATE_FS_ROOT")
                .context("BLOBGATE_STORE=fs requires BLOBGATE_FS_ROOT")?;
            Ok(Arc::new(FsBlobStore::open(root).await?))
        }
        Ok(other) => bail!("unknown blob store backend: {other:?}"),
        Err(_) => bail!("no blob store bound; set BLOBGATE_STORE to \"memory\" or \"fs\""),
    }
}
