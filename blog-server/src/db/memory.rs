//! In-process store with the same contract as the PostgreSQL repositories
//!
//! Backs `blogctl serve --memory` and the HTTP tests. Everything lives behind
//! one `RwLock`, so each repository call is atomic with respect to the others.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::repos::{DbError, Repository};
use crate::models::{Article, ArticleDraft, Entity, Tag, TagDraft};

/// Next id after `last`, failing like an exhausted SERIAL sequence.
fn next_id<E: Entity>(last: &mut i32) -> Result<i32, DbError> {
    *last = last
        .checked_add(1)
        .ok_or(DbError::IdsExhausted { resource: E::RESOURCE })?;
    Ok(*last)
}

#[derive(Default)]
struct Tables {
    /// Articles stored with an empty `tags` list; see [`Tables::hydrate`].
    articles: BTreeMap<i32, Article>,
    tags: BTreeMap<i32, Tag>,
    /// `(article_id, tag_id)` pairs
    links: BTreeSet<(i32, i32)>,
    last_article_id: i32,
    last_tag_id: i32,
}

impl Tables {
    fn hydrate(&self, article: &Article) -> Article {
        let tags = self
            .links
            .range((article.id, i32::MIN)..=(article.id, i32::MAX))
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();

        Article {
            tags,
            ..article.clone()
        }
    }
}

/// Shared in-memory tables for articles, tags and their links.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Article> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Article>, DbError> {
        let tables = self.inner.read().await;
        Ok(tables.articles.values().map(|a| tables.hydrate(a)).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, DbError> {
        let tables = self.inner.read().await;
        Ok(tables.articles.get(&id).map(|a| tables.hydrate(a)))
    }

    async fn save(&self, id: Option<i32>, draft: ArticleDraft) -> Result<Article, DbError> {
        let mut guard = self.inner.write().await;
        let tables = &mut *guard;

        let tag_ids = draft.tag_ids();
        if let Some(&missing) = tag_ids.iter().find(|id| !tables.tags.contains_key(*id)) {
            return Err(DbError::UnknownTag { id: missing });
        }

        let now = Utc::now();
        let (id, created_at) = match id {
            None => (next_id::<Article>(&mut tables.last_article_id)?, now),
            Some(id) => {
                let existing = tables
                    .articles
                    .get(&id)
                    .ok_or_else(|| DbError::not_found::<Article>(id))?;
                (id, existing.created_at)
            }
        };

        let article = Article {
            id,
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            author: draft.author,
            category: draft.category,
            reading_time: draft.reading_time,
            views: draft.views,
            likes: draft.likes,
            status: draft.status,
            created_at,
            updated_at: now,
            published_at: draft.published_at,
            tags: Vec::new(),
        };

        tables.links.retain(|&(article_id, _)| article_id != id);
        tables.links.extend(tag_ids.into_iter().map(|tag_id| (id, tag_id)));
        let saved = tables.hydrate(&article);
        tables.articles.insert(id, article);

        tracing::debug!(article_id = id, "article saved");
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        let mut tables = self.inner.write().await;
        if tables.articles.remove(&id).is_none() {
            return Err(DbError::not_found::<Article>(id));
        }
        tables.links.retain(|&(article_id, _)| article_id != id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Tag> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Tag>, DbError> {
        let tables = self.inner.read().await;
        Ok(tables.tags.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, DbError> {
        let tables = self.inner.read().await;
        Ok(tables.tags.get(&id).cloned())
    }

    async fn save(&self, id: Option<i32>, draft: TagDraft) -> Result<Tag, DbError> {
        let mut tables = self.inner.write().await;

        let (id, created_at) = match id {
            None => (next_id::<Tag>(&mut tables.last_tag_id)?, Utc::now()),
            Some(id) => {
                let existing = tables
                    .tags
                    .get(&id)
                    .ok_or_else(|| DbError::not_found::<Tag>(id))?;
                (id, existing.created_at)
            }
        };

        let tag = Tag {
            id,
            name: draft.name,
            description: draft.description,
            color: draft.color,
            created_at,
        };
        tables.tags.insert(id, tag.clone());

        tracing::debug!(tag_id = id, "tag saved");
        Ok(tag)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        let mut tables = self.inner.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(DbError::not_found::<Tag>(id));
        }
        tables.links.retain(|&(_, tag_id)| tag_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleStatus, TagRef};

    fn tag_draft(name: &str) -> TagDraft {
        TagDraft {
            name: Some(name.into()),
            ..TagDraft::default()
        }
    }

    fn article_draft(title: &str, tags: &[i32]) -> ArticleDraft {
        ArticleDraft {
            title: Some(title.into()),
            tags: Some(tags.iter().map(|&id| TagRef { id }).collect()),
            ..ArticleDraft::default()
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let a = Repository::<Tag>::save(&store, None, tag_draft("a")).await.unwrap();
        let b = Repository::<Tag>::save(&store, None, tag_draft("b")).await.unwrap();
        let article = Repository::<Article>::save(&store, None, article_draft("x", &[]))
            .await
            .unwrap();

        assert_eq!((a.id, b.id, article.id), (1, 2, 1));
        assert_eq!(article.created_at, article.updated_at);
        assert_eq!(article.status, ArticleStatus::Published);
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let store = MemoryStore::new();
        let tag = Repository::<Tag>::save(&store, None, tag_draft("old")).await.unwrap();
        let updated = Repository::<Tag>::save(&store, Some(tag.id), tag_draft("new"))
            .await
            .unwrap();

        assert_eq!(updated.id, tag.id);
        assert_eq!(updated.created_at, tag.created_at);
        assert_eq!(updated.name.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = Repository::<Article>::save(&store, Some(42), article_draft("x", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "article", .. }));

        let all = Repository::<Article>::find_all(&store).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn unknown_tag_writes_nothing() {
        let store = MemoryStore::new();
        let err = Repository::<Article>::save(&store, None, article_draft("x", &[7]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownTag { id: 7 }));

        let all = Repository::<Article>::find_all(&store).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn replacing_tags_overwrites_links() {
        let store = MemoryStore::new();
        let rust = Repository::<Tag>::save(&store, None, tag_draft("rust")).await.unwrap();
        let go = Repository::<Tag>::save(&store, None, tag_draft("go")).await.unwrap();

        let article = Repository::<Article>::save(&store, None, article_draft("x", &[rust.id]))
            .await
            .unwrap();
        assert_eq!(article.tags, vec![rust.clone()]);

        let article = Repository::<Article>::save(&store, Some(article.id), article_draft("x", &[go.id]))
            .await
            .unwrap();
        assert_eq!(article.tags, vec![go]);
    }

    #[tokio::test]
    async fn deleting_tag_detaches_it_from_articles() {
        let store = MemoryStore::new();
        let rust = Repository::<Tag>::save(&store, None, tag_draft("rust")).await.unwrap();
        let article = Repository::<Article>::save(&store, None, article_draft("x", &[rust.id]))
            .await
            .unwrap();

        Repository::<Tag>::delete_by_id(&store, rust.id).await.unwrap();

        let article = Repository::<Article>::find_by_id(&store, article.id)
            .await
            .unwrap()
            .expect("article survives tag deletion");
        assert!(article.tags.is_empty());
    }

    #[tokio::test]
    async fn exhausted_ids_fail_without_writing() {
        let store = MemoryStore::new();
        store.inner.write().await.last_tag_id = i32::MAX;

        let err = Repository::<Tag>::save(&store, None, tag_draft("overflow"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::IdsExhausted { resource: "tag" }));
        assert!(Repository::<Tag>::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = Repository::<Tag>::delete_by_id(&store, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "tag", .. }));
    }
}
