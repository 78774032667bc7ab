use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use blobgate_http::BlobGateway;
use blobgate_store::{Blob, BlobResult, BlobStore, ByteStream, MemoryBlobStore};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

fn gateway_router() -> Router {
    BlobGateway::new(Arc::new(MemoryBlobStore::new())).router()
}

async fn body_bytes(res: axum::response::Response) -> Vec<u8> {
    res.into_body().collect().await.unwrap().to_bytes().to_vec()
}

fn header<'a>(res: &'a axum::response::Response, name: &str) -> Option<&'a str> {
    res.headers().get(name).and_then(|value| value.to_str().ok())
}

async fn put_blob(router: &Router, data: &[u8]) -> (String, u64) {
    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/")
                .body(Body::from(data.to_vec()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = serde_json::from_slice(&body_bytes(res).await).unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    let size = body["size"].as_u64().unwrap();
    (id, size)
}

async fn get_blob(router: &Router, id: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get_blob_ranged(router: &Router, id: &str, range: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .header("range", range)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let router = gateway_router();
    let (id, size) = put_blob(&router, b"hello world").await;
    assert_eq!(size, 11);

    let res = get_blob(&router, &id).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(header(&res, "content-type"), Some("application/octet-stream"));
    assert_eq!(header(&res, "content-length"), Some("11"));
    assert_eq!(header(&res, "etag"), Some(id.as_str()));
    assert_eq!(header(&res, "cache-control"), Some("public"));
    assert_eq!(header(&res, "accept-ranges"), Some("bytes"));
    assert_eq!(body_bytes(res).await, b"hello world");
}

#[tokio::test]
async fn get_unknown_id_returns_404_with_empty_body() {
    let router = gateway_router();
    let res = get_blob(&router, "does-not-exist").await;
    assert_eq!(res.status().as_u16(), 404);
    assert!(header(&res, "content-type").is_none());
    assert!(body_bytes(res).await.is_empty());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let router = gateway_router();
    let res = get_blob(&router, "anything").await;
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn ranged_get_returns_partial_content() {
    let router = gateway_router();
    let (id, _) = put_blob(&router, b"hello world").await;

    let res = get_blob_ranged(&router, &id, "bytes=6-10").await;
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-length"), Some("5"));
    assert_eq!(header(&res, "content-range"), Some("bytes 6-10/11"));
    assert_eq!(body_bytes(res).await, b"world");
}

#[tokio::test]
async fn open_ended_and_suffix_ranges_take_the_tail() {
    let router = gateway_router();
    let (id, _) = put_blob(&router, b"hello world").await;

    let res = get_blob_ranged(&router, &id, "bytes=6-").await;
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-range"), Some("bytes 6-10/11"));
    assert_eq!(body_bytes(res).await, b"world");

    let res = get_blob_ranged(&router, &id, "bytes=-5").await;
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(header(&res, "content-range"), Some("bytes 6-10/11"));
    assert_eq!(body_bytes(res).await, b"world");
}

#[tokio::test]
async fn range_past_the_end_returns_416() {
    let router = gateway_router();
    let (id, _) = put_blob(&router, b"hello world").await;

    let res = get_blob_ranged(&router, &id, "bytes=11-").await;
    assert_eq!(res.status().as_u16(), 416);
    assert_eq!(header(&res, "content-range"), Some("bytes */11"));
    assert!(body_bytes(res).await.is_empty());
}

#[tokio::test]
async fn malformed_range_is_ignored() {
    let router = gateway_router();
    let (id, _) = put_blob(&router, b"hello world").await;

    let res = get_blob_ranged(&router, &id, "bytes=oops").await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(body_bytes(res).await, b"hello world");
}

#[tokio::test]
async fn empty_blob_round_trips() {
    let router = gateway_router();
    let (id, size) = put_blob(&router, b"").await;
    assert_eq!(size, 0);

    let res = get_blob(&router, &id).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(header(&res, "content-length"), Some("0"));
    assert!(body_bytes(res).await.is_empty());

    // no byte of an empty blob is addressable
    let res = get_blob_ranged(&router, &id, "bytes=0-0").await;
    assert_eq!(res.status().as_u16(), 416);
    assert_eq!(header(&res, "content-range"), Some("bytes */0"));
}

#[tokio::test]
async fn identical_puts_yield_independent_blobs() {
    let router = gateway_router();
    let (first, _) = put_blob(&router, b"same bytes").await;
    let (second, _) = put_blob(&router, b"same bytes").await;
    assert_ne!(first, second);

    for id in [&first, &second] {
        let res = get_blob(&router, id).await;
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(body_bytes(res).await, b"same bytes");
    }
}

#[tokio::test]
async fn concurrent_gets_do_not_interfere() {
    let router = gateway_router();
    let data: Vec<u8> = (0..200_000u32).map(|n| (n % 251) as u8).collect();
    let (id, _) = put_blob(&router, &data).await;

    let fetches = (0..8).map(|_| get_blob(&router, &id));
    for res in futures::future::join_all(fetches).await {
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(body_bytes(res).await, data);
    }
}

#[tokio::test]
async fn put_outside_the_collection_root_is_rejected() {
    let router = gateway_router();
    let res = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/some-id")
                .body(Body::from("data"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 405);
}

struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn find(&self, _id: &str) -> BlobResult<Option<Blob>> {
        Err(std::io::Error::other("backend down").into())
    }

    async fn put(&self, _content: ByteStream) -> BlobResult<Blob> {
        Err(std::io::Error::other("backend down").into())
    }
}

#[tokio::test]
async fn backend_failure_maps_to_500_without_detail() {
    let router = BlobGateway::new(Arc::new(FailingStore)).router();

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/")
                .body(Body::from("payload"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 500);
    let body = String::from_utf8(body_bytes(res).await).unwrap();
    assert!(!body.contains("backend down"));

    let res = get_blob(&router, "any").await;
    assert_eq!(res.status().as_u16(), 500);
}
