use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use chrono::{TimeZone, Utc};
use futures::future::BoxFuture;
use lineage_comments::server::comments_endpoint;
use lineage_comments::{
    CommentService, FsStore, HandlerError, HandlerEvent, MemoryStore, ObjectStore, ServerConfig,
    StoreError,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn fixed_clock() -> lineage_comments::handler::Clock {
    Arc::new(|| {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("valid time")
    })
}

fn service(store: Arc<dyn ObjectStore>) -> CommentService {
    CommentService::new(store).with_clock(fixed_clock())
}

#[tokio::test]
async fn post_to_missing_object_then_get() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());

    let res = svc
        .handle(HandlerEvent::new("POST", Some(r#"{"text":"hi"}"#.to_string())))
        .await
        .unwrap();
    assert_eq!(res.status_code, 200);
    assert_eq!(res.body, r#"{"success":true}"#);

    let stored = store.get_object("comments", "comments.json").await.unwrap();
    let stored: Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(stored, json!([{"text": "hi", "timestamp": "2024-05-01T12:30:00.000Z"}]));

    let res = svc.handle(HandlerEvent::new("GET", None)).await.unwrap();
    assert_eq!(res.status_code, 200);
    assert_eq!(res.body, r#"[{"text":"hi","timestamp":"2024-05-01T12:30:00.000Z"}]"#);
}

#[tokio::test]
async fn get_on_empty_store_is_an_empty_list() {
    let svc = service(Arc::new(MemoryStore::new()));
    let res = svc.handle(HandlerEvent::new("GET", None)).await.unwrap();
    assert_eq!(res.status_code, 200);
    assert_eq!(res.body, "[]");
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let svc = service(Arc::new(MemoryStore::new()));
    for method in ["PUT", "DELETE", "PATCH"] {
        let res = svc.handle(HandlerEvent::new(method, None)).await.unwrap();
        assert_eq!(res.status_code, 405);
        assert_eq!(res.body, "Method Not Allowed");
    }
}

#[tokio::test]
async fn method_names_are_case_sensitive() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());
    for method in ["post", "get", "Post"] {
        let res = svc
            .handle(HandlerEvent::new(method, Some(r#"{"text":"hi"}"#.to_string())))
            .await
            .unwrap();
        assert_eq!(res.status_code, 405, "{method}");
    }
    let err = store
        .get_object("comments", "comments.json")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn appends_keep_earlier_comments() {
    let dir = tempfile::tempdir().unwrap();
    let svc =
        service(Arc::new(FsStore::new(dir.path()))).with_location("site", "c/comments.json");

    for text in ["first", "second"] {
        svc.append(&json!({ "text": text }).to_string()).await.unwrap();
    }
    let list = svc.list().await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["text"], "first");
    assert_eq!(list[1]["text"], "second");
    assert!(dir.path().join("site").join("c").join("comments.json").is_file());
}

#[tokio::test]
async fn corrupt_object_reads_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store
        .put_object("comments", "comments.json", b"not json".to_vec())
        .await
        .unwrap();
    let svc = service(store);
    assert!(svc.list().await.is_empty());

    svc.append(r#"{"text":"fresh"}"#).await.unwrap();
    assert_eq!(svc.list().await.len(), 1);
}

#[tokio::test]
async fn non_object_body_is_invalid() {
    let svc = service(Arc::new(MemoryStore::new()));
    for body in ["[1,2]", "\"text\"", "{not json"] {
        let err = svc
            .handle(HandlerEvent::new("POST", Some(body.to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidBody { .. }), "{body}");
    }
    assert!(svc.list().await.is_empty());
}

struct ReadOnlyStore;

impl ObjectStore for ReadOnlyStore {
    fn get_object<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Vec<u8>, StoreError>> {
        Box::pin(async move {
            Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        })
    }

    fn put_object<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        _bytes: Vec<u8>,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            Err(StoreError::Io {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        })
    }
}

#[tokio::test]
async fn http_adapter_maps_errors_to_status_codes() {
    let ok = comments_endpoint(
        State(service(Arc::new(MemoryStore::new()))),
        Method::POST,
        r#"{"text":"hi"}"#.to_string(),
    )
    .await
    .into_response();
    assert_eq!(ok.status(), StatusCode::OK);

    let not_allowed = comments_endpoint(
        State(service(Arc::new(MemoryStore::new()))),
        Method::PUT,
        String::new(),
    )
    .await
    .into_response();
    assert_eq!(not_allowed.status(), StatusCode::METHOD_NOT_ALLOWED);

    let bad = comments_endpoint(
        State(service(Arc::new(MemoryStore::new()))),
        Method::POST,
        "[]".to_string(),
    )
    .await
    .into_response();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let failing = comments_endpoint(
        State(service(Arc::new(ReadOnlyStore))),
        Method::POST,
        r#"{"text":"hi"}"#.to_string(),
    )
    .await
    .into_response();
    assert_eq!(failing.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn server_config_defaults_and_overrides() {
    let config = ServerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config.addr.to_string(), "127.0.0.1:8787");
    assert_eq!(config.bucket, "comments");
    assert_eq!(config.key, "comments.json");

    let config = ServerConfig::from_lookup(|name| match name {
        "LINEAGE_COMMENTS_ADDR" => Some("0.0.0.0:9000".to_string()),
        "LINEAGE_COMMENTS_KEY" => Some("tree/comments.json".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.addr.port(), 9000);
    assert_eq!(config.key, "tree/comments.json");

    assert!(ServerConfig::from_lookup(|_| Some("nope".to_string())).is_err());
}
