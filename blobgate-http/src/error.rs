use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blobgate_store::BlobError;

/// HTTP-facing wrapper around storage errors.
///
/// Backend and I/O detail never reaches the response body; callers get a
/// bare status and the detail goes to the diagnostic log at the call site.
#[derive(Debug)]
pub struct GatewayError(pub BlobError);

impl From<BlobError> for GatewayError {
    fn from(err: BlobError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self.0 {
            BlobError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
            BlobError::Invalid { message } => (StatusCode::BAD_REQUEST, message).into_response(),
            BlobError::Backend { .. } | BlobError::Io { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage backend error").into_response()
            }
        }
    }
}
