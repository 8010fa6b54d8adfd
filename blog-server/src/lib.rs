//! blog-server: HTTP JSON backend for blog articles and tags
//!
//! Layers, leaf-first:
//! - [`db`]: PostgreSQL repositories plus an in-memory store
//! - [`service`]: per-entity services over a repository
//! - [`http`]: axum routers, extractors and JSON error mapping

pub mod db;
pub mod http;
pub mod models;
pub mod service;
pub mod state;

pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use state::{AppState, Storage};
