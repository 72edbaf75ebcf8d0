// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP router configuration.

use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::get;
use axum::Router;
use shardbox_storage::ObjectStore;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{health, object, AppState};
use crate::middleware::metrics_layer;

/// Create the API router.
///
/// # Arguments
///
/// * `store` - Object store every request is routed to
/// * `max_body_size` - Largest accepted upload in bytes
/// * `log_requests` - Enable HTTP request/response logging
pub fn create_router(store: Arc<dyn ObjectStore>, max_body_size: usize, log_requests: bool) -> Router {
    let state = AppState { store, max_body_size };

    let router = Router::new()
        .route("/object/{id}", get(object::get_object).put(object::put_object))
        .route("/ok", get(health::ok))
        .with_state(state)
        .layer(axum_middleware::from_fn(metrics_layer));

    if log_requests {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO));
        router.layer(trace_layer)
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use futures::stream;
    use http_body_util::BodyExt;
    use shardbox_core::{Error, Result};
    use shardbox_storage::{collect_stream, stream_from_bytes, ObjectStream};
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::REQUEST_ID_HEADER;

    const OCTET: &str = "application/octet-stream";

    /// In-memory store with call counters and scripted failures.
    #[derive(Default)]
    struct FakeStore {
        objects: Mutex<HashMap<String, Bytes>>,
        gets: AtomicUsize,
        puts: AtomicUsize,
        fail_puts: bool,
        broken_reads: bool,
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn get(&self, id: &str) -> Result<ObjectStream> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.broken_reads {
                let chunks = vec![
                    Ok(Bytes::from_static(b"bi")),
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by node")),
                ];
                return Ok(Box::pin(stream::iter(chunks)));
            }
            let data = self.objects.lock().unwrap().get(id).cloned();
            data.map(stream_from_bytes).ok_or_else(|| Error::not_found(id, "NoSuchKey"))
        }

        async fn put(&self, id: &str, body: ObjectStream, length: u64) -> Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_puts {
                return Err(Error::backend("fake", "connection refused"));
            }
            let data = collect_stream(body, 0).await?;
            assert_eq!(data.len() as u64, length);
            self.objects.lock().unwrap().insert(id.to_string(), data);
            Ok(())
        }
    }

    fn app(store: Arc<FakeStore>) -> Router {
        create_router(store, 1024, false)
    }

    fn put_request(id: &str, content_type: Option<&str>, body: Body) -> Request<Body> {
        let mut builder = Request::builder().method("PUT").uri(format!("/object/{id}"));
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = Arc::new(FakeStore::default());

        let response =
            app(store.clone()).oneshot(put_request("id-03", Some(OCTET), Body::from("bien"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app(store.clone()).oneshot(get_request("/object/id-03")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], OCTET);
        assert_eq!(&body_bytes(response).await[..], b"bien");
    }

    #[tokio::test]
    async fn test_get_missing_is_404_with_empty_body() {
        let store = Arc::new(FakeStore::default());

        let response = app(store).oneshot(get_request("/object/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_put_without_content_type_is_rejected() {
        let store = Arc::new(FakeStore::default());

        let response =
            app(store.clone()).oneshot(put_request("id-03", None, Body::from("bien"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_content_type_must_match_exactly() {
        let store = Arc::new(FakeStore::default());

        for ct in ["application/octet-stream; charset=binary", "text/plain", "Application/Octet-Stream"] {
            let response =
                app(store.clone()).oneshot(put_request("id-03", Some(ct), Body::from("bien"))).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "content type {ct}");
        }
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_put_failure_is_500() {
        let store = Arc::new(FakeStore { fail_puts: true, ..Default::default() });

        let response =
            app(store.clone()).oneshot(put_request("id-03", Some(OCTET), Body::from("bien"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(store.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreadable_body_is_400() {
        let store = Arc::new(FakeStore::default());
        let chunks: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"bi")),
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "client went away")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let response = app(store.clone()).oneshot(put_request("id-03", Some(OCTET), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_400() {
        let store = Arc::new(FakeStore::default());
        let body = Body::from(vec![0u8; 2048]);

        let response = app(store.clone()).oneshot(put_request("big", Some(OCTET), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_broken_read_stream_is_404() {
        let store = Arc::new(FakeStore { broken_reads: true, ..Default::default() });

        let response = app(store.clone()).oneshot(get_request("/object/id-03")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_object_round_trip() {
        let store = Arc::new(FakeStore::default());

        let response =
            app(store.clone()).oneshot(put_request("empty", Some(OCTET), Body::empty())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app(store).oneshot(get_request("/object/empty")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_liveness() {
        let store = Arc::new(FakeStore::default());

        let response = app(store.clone()).oneshot(get_request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let store = Arc::new(FakeStore::default());

        let response = app(store).oneshot(get_request("/objects")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_logging_layer() {
        let store = Arc::new(FakeStore::default());
        let router = create_router(store, 1024, true);

        let response = router.oneshot(get_request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
