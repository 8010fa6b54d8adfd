//! Repository contract and PostgreSQL implementations
//!
//! Every entity gets the same four operations through [`Repository`]:
//! list, lookup by id, upsert keyed by id, delete by id.

pub mod articles;
pub mod tags;

use async_trait::async_trait;

use crate::models::Entity;

pub use articles::ArticleRepo;
pub use tags::TagRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unknown tag '{id}'")]
    UnknownTag { id: i32 },

    #[error("{resource} ids exhausted")]
    IdsExhausted { resource: &'static str },

    #[error("corrupt {resource} row '{id}': {reason}")]
    Corrupt {
        resource: &'static str,
        id: i32,
        reason: String,
    },
}

impl DbError {
    pub fn not_found<E: Entity>(id: i32) -> Self {
        Self::NotFound {
            resource: E::RESOURCE,
            id: id.to_string(),
        }
    }
}

/// Data access for one entity table.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// All rows in insertion (id) order.
    async fn find_all(&self) -> Result<Vec<E>, DbError>;

    /// The row with `id`, or `None`.
    async fn find_by_id(&self, id: i32) -> Result<Option<E>, DbError>;

    /// Insert when `id` is `None`, otherwise replace the existing row.
    ///
    /// Replacing keeps `created_at` and fails with [`DbError::NotFound`]
    /// when no row has `id`.
    async fn save(&self, id: Option<i32>, draft: E::Draft) -> Result<E, DbError>;

    /// Remove the row and its join rows; [`DbError::NotFound`] if absent.
    async fn delete_by_id(&self, id: i32) -> Result<(), DbError>;
}
