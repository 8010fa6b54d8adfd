//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Article listing loads tags with one JOIN query - no N+1 queries
//! - Article row + join-table writes share one transaction
//! - Timestamps are stamped by `save`, not by database defaults

pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
