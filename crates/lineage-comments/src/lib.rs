#![forbid(unsafe_code)]

//! Comment storage for the family-tree site.
//!
//! One JSON array lives under a single object-storage key. `GET` lists it, `POST` appends a
//! timestamped comment, anything else is `405`. [`handler`] is the transport-free entry point;
//! [`server`] exposes it over HTTP with `axum`.

pub mod handler;
pub mod server;
pub mod store;

pub use handler::{CommentService, HandlerError, HandlerEvent, HandlerResponse};
pub use server::{ServerConfig, router};
pub use store::{FsStore, MemoryStore, ObjectStore, StoreError};
