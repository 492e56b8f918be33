//! HTTP adapter: every method on `/comments` becomes a [`HandlerEvent`].

use crate::handler::{CommentService, HandlerError, HandlerEvent, HandlerResponse};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid listen address {value:?}: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server settings, read from `LINEAGE_COMMENTS_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Directory holding one sub-directory per bucket.
    pub root: PathBuf,
    pub bucket: String,
    pub key: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let addr = get("LINEAGE_COMMENTS_ADDR", DEFAULT_ADDR);
        Ok(Self {
            addr: addr
                .parse()
                .map_err(|source| ConfigError::InvalidAddr {
                    value: addr.clone(),
                    source,
                })?,
            root: PathBuf::from(get("LINEAGE_COMMENTS_ROOT", "comments-data")),
            bucket: get("LINEAGE_COMMENTS_BUCKET", crate::handler::DEFAULT_BUCKET),
            key: get("LINEAGE_COMMENTS_KEY", crate::handler::DEFAULT_KEY),
        })
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        let content_type = if status == StatusCode::METHOD_NOT_ALLOWED {
            "text/plain; charset=utf-8"
        } else {
            "application/json"
        };
        let mut response = (status, self.body).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            HandlerError::Store(err) => {
                tracing::error!(%err, "comment store write failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub async fn comments_endpoint(
    State(service): State<CommentService>,
    method: Method,
    body: String,
) -> Result<HandlerResponse, HandlerError> {
    let body = (!body.is_empty()).then_some(body);
    service
        .handle(HandlerEvent::new(method.as_str(), body))
        .await
}

pub fn router(service: CommentService) -> Router {
    Router::new()
        .route("/comments", any(comments_endpoint))
        .with_state(service)
}
