//! Article model and its publication status

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{timestamp, Entity, Tag};

/// Publication status of an article.
///
/// `Archived` is an ordinary status, not a deletion marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status string that is not one of `draft`, `published`, `archived`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown article status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A persisted article with its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub reading_time: Option<i32>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl Entity for Article {
    const RESOURCE: &'static str = "article";
    type Draft = ArticleDraft;
}

/// Reference to an existing tag inside an article body.
///
/// Only `id` is read; clients may echo back full tag objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TagRef {
    pub id: i32,
}

/// Caller-supplied article fields.
///
/// `id`, `createdAt` and `updatedAt` in a request body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub reading_time: Option<i32>,
    pub views: Option<i32>,
    pub likes: Option<i32>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<TagRef>>,
}

impl ArticleDraft {
    /// Distinct referenced tag ids, ascending.
    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags
            .iter()
            .flatten()
            .map(|t| t.id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_defaults_to_published() {
        let draft: ArticleDraft = serde_json::from_value(json!({ "title": "Hello" })).unwrap();
        assert_eq!(draft.status, ArticleStatus::Published);
        assert!(draft.tags.is_none());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [ArticleStatus::Draft, ArticleStatus::Published, ArticleStatus::Archived] {
            assert_eq!(status.as_str().parse::<ArticleStatus>().unwrap(), status);
        }
        assert_eq!(
            "deleted".parse::<ArticleStatus>().unwrap_err(),
            UnknownStatus("deleted".into())
        );
    }

    #[test]
    fn draft_ignores_server_fields() {
        let draft: ArticleDraft = serde_json::from_value(json!({
            "id": 99,
            "title": "Hello",
            "readingTime": 5,
            "status": "draft",
            "createdAt": "2020-01-01T00:00:00Z",
            "publishedAt": "2024-05-01T10:00:00",
        }))
        .unwrap();
        assert_eq!(draft.title.as_deref(), Some("Hello"));
        assert_eq!(draft.reading_time, Some(5));
        assert_eq!(draft.status, ArticleStatus::Draft);
        assert!(draft.published_at.is_some());
    }

    #[test]
    fn rejects_unknown_status() {
        let result = serde_json::from_value::<ArticleDraft>(json!({ "status": "deleted" }));
        assert!(result.is_err());
    }

    #[test]
    fn tag_ids_are_deduplicated() {
        let draft: ArticleDraft = serde_json::from_value(json!({
            "tags": [{ "id": 3, "name": "rust" }, { "id": 1 }, { "id": 3 }]
        }))
        .unwrap();
        assert_eq!(draft.tag_ids(), vec![1, 3]);
    }

    #[test]
    fn null_tags_means_none() {
        let draft: ArticleDraft = serde_json::from_value(json!({ "tags": null })).unwrap();
        assert!(draft.tag_ids().is_empty());
    }
}
