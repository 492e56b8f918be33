//! The serverless-style entry point: `{ httpMethod, body }` in, `{ statusCode, body }` out.

use crate::store::{ObjectStore, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_BUCKET: &str = "comments";
pub const DEFAULT_KEY: &str = "comments.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl HandlerEvent {
    pub fn new(http_method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: http_method.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn json(body: &Value) -> Self {
        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status_code: 405,
            body: "Method Not Allowed".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("comment body must be a JSON object: {message}")]
    InvalidBody { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Appends comments to, and lists them from, one JSON array stored under `bucket/key`.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    key: String,
    clock: Clock,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CommentService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            bucket: DEFAULT_BUCKET.to_string(),
            key: DEFAULT_KEY.to_string(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_location(mut self, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self.key = key.into();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn handle(&self, event: HandlerEvent) -> Result<HandlerResponse, HandlerError> {
        match event.http_method.as_str() {
            "GET" => Ok(HandlerResponse::json(&Value::Array(self.list().await))),
            "POST" => {
                let body = event.body.as_deref().unwrap_or_default();
                self.append(body).await?;
                Ok(HandlerResponse::json(&serde_json::json!({ "success": true })))
            }
            _ => Ok(HandlerResponse::method_not_allowed()),
        }
    }

    /// The stored comments. A missing or unreadable object reads as no comments.
    pub async fn list(&self) -> Vec<Value> {
        let bytes = match self.store.get_object(&self.bucket, &self.key).await {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound { .. }) => return Vec::new(),
            Err(err) => {
                tracing::warn!(%err, "comment store read failed; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(bucket = %self.bucket, key = %self.key, "stored comments are not a list");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(%err, "stored comments are not valid JSON");
                Vec::new()
            }
        }
    }

    /// Parses `body`, stamps it with the current UTC time, appends it, and writes the list back.
    /// Concurrent appends are not coordinated: the last writer wins.
    pub async fn append(&self, body: &str) -> Result<Value, HandlerError> {
        let mut comment = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(HandlerError::InvalidBody {
                    message: format!("expected an object, got {}", json_kind(&other)),
                });
            }
            Err(err) => {
                return Err(HandlerError::InvalidBody {
                    message: err.to_string(),
                });
            }
        };
        let timestamp = (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true);
        comment.insert("timestamp".to_string(), Value::String(timestamp));
        let comment = Value::Object(comment);

        let mut comments = self.list().await;
        comments.push(comment.clone());
        let bytes = Value::Array(comments).to_string().into_bytes();
        self.store.put_object(&self.bucket, &self.key, bytes).await?;
        tracing::debug!(bucket = %self.bucket, key = %self.key, "comment appended");
        Ok(comment)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
