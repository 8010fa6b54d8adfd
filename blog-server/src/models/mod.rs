//! Domain models for the blog backend
//!
//! Each persisted type has a matching *draft*: the caller-supplied fields,
//! without the id and the server-stamped timestamps. Drafts are what the
//! HTTP layer deserializes and what repositories save.

pub mod article;
pub mod tag;
pub mod timestamp;

pub use article::{Article, ArticleDraft, ArticleStatus, TagRef, UnknownStatus};
pub use tag::{Tag, TagDraft};

/// A record type with an integer primary key stored in its own table.
pub trait Entity: Send + Sync + 'static {
    /// Resource name used in error messages and logs.
    const RESOURCE: &'static str;

    /// Caller-supplied fields accepted by `save`.
    type Draft: Send + 'static;
}
