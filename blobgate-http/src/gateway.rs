//! The HTTP blob gateway: GET streams a blob out, PUT streams one in.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use futures::TryStreamExt;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use blobgate_store::{slice_stream, BlobError, BlobStore, ByteStream, ResolvedRange};

use crate::logs::FanoutLogger;
use crate::range::{self, parse_range, RangeOutcome};
use crate::state::GatewayState;
use crate::GatewayError;

const OCTET_STREAM: &str = "application/octet-stream";

/// HTTP front for a single [`BlobStore`].
///
/// The store is an explicit constructor dependency, bound once for the
/// gateway's lifetime; there is no ambient lookup and no way to run without
/// a backend.
pub struct BlobGateway {
    state: GatewayState,
}

impl BlobGateway {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            state: GatewayState {
                store,
                logs: Arc::new(FanoutLogger::default()),
            },
        }
    }

    /// Replace the default (tracing-backed) diagnostic logger.
    pub fn with_logger(mut self, logs: FanoutLogger) -> Self {
        self.state.logs = Arc::new(logs);
        self
    }

    /// Build the gateway router.
    ///
    /// GET takes the whole remaining path, verbatim, as the lookup key.
    /// PUT only targets the collection root; the store assigns the id.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", put(ingest_blob))
            .route("/{*id}", get(retrieve_blob))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process is shut down.
    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn retrieve_blob(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let found = state.store.find(&id).await.map_err(|err| {
        state.logs.error(&format!("lookup of blob {id} failed: {err}"));
        GatewayError(err)
    })?;
    let Some(blob) = found else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| parse_range(value, blob.size));

    match range {
        // malformed or absent Range: serve the whole blob
        None => blob_response(&state, StatusCode::OK, &id, blob.size, None, blob.content),
        Some(RangeOutcome::Unsatisfiable) => unsatisfiable_response(blob.size),
        Some(RangeOutcome::Satisfiable(resolved)) => {
            let body = slice_stream(blob.content, resolved.start, resolved.content_length());
            blob_response(
                &state,
                StatusCode::PARTIAL_CONTENT,
                &id,
                resolved.content_length(),
                Some(resolved),
                body,
            )
        }
    }
}

async fn ingest_blob(
    State(state): State<GatewayState>,
    body: Body,
) -> Result<Response, GatewayError> {
    // hand the request body to the store as-is; nothing is buffered here
    let content: ByteStream = Box::pin(
        body.into_data_stream()
            .map_err(std::io::Error::other),
    );

    let blob = state.store.put(content).await.map_err(|err| {
        state.logs.error(&format!("blob ingest failed: {err}"));
        GatewayError(err)
    })?;

    Ok((StatusCode::OK, Json(blob.reference())).into_response())
}

/// Assemble a 200/206 response around a content stream.
///
/// Once the response leaves here the status line is committed; a failure
/// mid-stream can only abort the connection, so the stream is wrapped to
/// log such failures on the way out.
fn blob_response(
    state: &GatewayState,
    status: StatusCode,
    id: &str,
    content_length: u64,
    resolved: Option<ResolvedRange>,
    content: ByteStream,
) -> Result<Response, GatewayError> {
    let logs = Arc::clone(&state.logs);
    let blob_id = id.to_string();
    let watched = content.inspect_err(move |err| {
        logs.error(&format!("aborting transfer of blob {blob_id}: {err}"));
    });

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, OCTET_STREAM)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ETAG, id)
        .header(header::CACHE_CONTROL, "public")
        .header(header::ACCEPT_RANGES, "bytes");
    if let Some(resolved) = &resolved {
        builder = builder.header(header::CONTENT_RANGE, range::content_range(resolved));
    }

    builder
        .body(Body::from_stream(watched))
        .map_err(|err| GatewayError(BlobError::invalid(err.to_string())))
}

fn unsatisfiable_response(size: u64) -> Result<Response, GatewayError> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(
            header::CONTENT_RANGE,
            range::unsatisfied_content_range(size),
        )
        .body(Body::empty())
        .map_err(|err| GatewayError(BlobError::invalid(err.to_string())))
}
