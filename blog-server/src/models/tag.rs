//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// A persisted tag.
///
/// The articles carrying a tag live only in the `article_tags` join table;
/// a tag never serializes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Tag {
    const RESOURCE: &'static str = "tag";
    type Draft = TagDraft;
}

/// Caller-supplied tag fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}
