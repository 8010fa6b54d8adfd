//! Article repository
//!
//! Handles article CRUD with:
//! - Tag association rewritten in the same transaction as the row
//! - Tags for a whole listing loaded with one JOIN

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};

use super::tags::TagRow;
use super::{DbError, Repository};
use crate::models::{Article, ArticleDraft, ArticleStatus, Entity, Tag, UnknownStatus};

/// Article record from database (without tags)
#[derive(Debug, Clone, FromRow)]
struct ArticleRow {
    id: i32,
    title: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    author: Option<String>,
    category: Option<String>,
    reading_time: Option<i32>,
    views: Option<i32>,
    likes: Option<i32>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl ArticleRow {
    fn into_article(self, tags: Vec<Tag>) -> Result<Article, DbError> {
        let status: ArticleStatus = self.status.parse().map_err(|e: UnknownStatus| DbError::Corrupt {
            resource: Article::RESOURCE,
            id: self.id,
            reason: e.to_string(),
        })?;

        Ok(Article {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            author: self.author,
            category: self.category,
            reading_time: self.reading_time,
            views: self.views,
            likes: self.likes,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_at: self.published_at,
            tags,
        })
    }
}

/// Join row: owning article id plus the full tag
#[derive(Debug, FromRow)]
struct ArticleTagRow {
    article_id: i32,
    #[sqlx(flatten)]
    tag: TagRow,
}

/// Load tags for every article in `article_ids`, keyed by article id.
async fn load_tags<'e, X>(executor: X, article_ids: &[i32]) -> Result<HashMap<i32, Vec<Tag>>, DbError>
where
    X: PgExecutor<'e>,
{
    if article_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<ArticleTagRow> = sqlx::query_as(
        r#"
        SELECT at.article_id, t.id, t.name, t.description, t.color, t.created_at
        FROM article_tags at
        JOIN tags t ON t.id = at.tag_id
        WHERE at.article_id = ANY($1)
        ORDER BY at.article_id, t.id
        "#,
    )
    .bind(article_ids)
    .fetch_all(executor)
    .await?;

    let mut by_article: HashMap<i32, Vec<Tag>> = HashMap::new();
    for row in rows {
        by_article
            .entry(row.article_id)
            .or_default()
            .push(Tag::from(row.tag));
    }
    Ok(by_article)
}

/// Fail with [`DbError::UnknownTag`] unless every id names a tag.
///
/// Takes a share lock so the tags cannot be deleted before commit.
async fn ensure_tags_exist<'e, X>(executor: X, tag_ids: &[i32]) -> Result<(), DbError>
where
    X: PgExecutor<'e>,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1) FOR SHARE")
        .bind(tag_ids)
        .fetch_all(executor)
        .await?;

    match tag_ids.iter().find(|id| !found.contains(id)) {
        Some(&id) => Err(DbError::UnknownTag { id }),
        None => Ok(()),
    }
}

/// Article repository
#[derive(Clone)]
pub struct ArticleRepo {
    pool: PgPool,
}

impl ArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Article> for ArticleRepo {
    async fn find_all(&self) -> Result<Vec<Article>, DbError> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            r#"
            SELECT id, title, excerpt, content, author, category, reading_time,
                   views, likes, status, created_at, updated_at, published_at
            FROM articles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut tags = load_tags(&self.pool, &ids).await?;

        rows.into_iter()
            .map(|r| {
                let article_tags = tags.remove(&r.id).unwrap_or_default();
                r.into_article(article_tags)
            })
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, DbError> {
        let row: Option<ArticleRow> = sqlx::query_as(
            r#"
            SELECT id, title, excerpt, content, author, category, reading_time,
                   views, likes, status, created_at, updated_at, published_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut tags = load_tags(&self.pool, &[id]).await?;
        row.into_article(tags.remove(&id).unwrap_or_default()).map(Some)
    }

    async fn save(&self, id: Option<i32>, draft: ArticleDraft) -> Result<Article, DbError> {
        let tag_ids = draft.tag_ids();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        ensure_tags_exist(&mut *tx, &tag_ids).await?;

        let row: ArticleRow = match id {
            None => {
                sqlx::query_as(
                    r#"
                    INSERT INTO articles (
                        title, excerpt, content, author, category, reading_time,
                        views, likes, status, published_at, created_at, updated_at
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
                    RETURNING id, title, excerpt, content, author, category, reading_time,
                              views, likes, status, created_at, updated_at, published_at
                    "#,
                )
                .bind(draft.title)
                .bind(draft.excerpt)
                .bind(draft.content)
                .bind(draft.author)
                .bind(draft.category)
                .bind(draft.reading_time)
                .bind(draft.views)
                .bind(draft.likes)
                .bind(draft.status.as_str())
                .bind(draft.published_at)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_as(
                r#"
                UPDATE articles
                SET title = $2, excerpt = $3, content = $4, author = $5, category = $6,
                    reading_time = $7, views = $8, likes = $9, status = $10,
                    published_at = $11, updated_at = $12
                WHERE id = $1
                RETURNING id, title, excerpt, content, author, category, reading_time,
                          views, likes, status, created_at, updated_at, published_at
                "#,
            )
            .bind(id)
            .bind(draft.title)
            .bind(draft.excerpt)
            .bind(draft.content)
            .bind(draft.author)
            .bind(draft.category)
            .bind(draft.reading_time)
            .bind(draft.views)
            .bind(draft.likes)
            .bind(draft.status.as_str())
            .bind(draft.published_at)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found::<Article>(id))?,
        };

        let article_id = row.id;

        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut *tx)
            .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO article_tags (article_id, tag_id)
                SELECT $1, UNNEST($2::int[])
                "#,
            )
            .bind(article_id)
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await?;
        }

        let mut tags = load_tags(&mut *tx, &[article_id]).await?;
        tx.commit().await?;

        tracing::debug!(article_id, tags = tag_ids.len(), "article saved");
        row.into_article(tags.remove(&article_id).unwrap_or_default())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        // article_tags rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found::<Article>(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> ArticleRow {
        let now = Utc::now();
        ArticleRow {
            id: 9,
            title: Some("stored".into()),
            excerpt: None,
            content: None,
            author: None,
            category: None,
            reading_time: None,
            views: None,
            likes: None,
            status: status.into(),
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    #[test]
    fn row_converts_with_tags() {
        let article = row("archived").into_article(Vec::new()).unwrap();
        assert_eq!(article.id, 9);
        assert_eq!(article.status, ArticleStatus::Archived);
        assert!(article.tags.is_empty());
    }

    #[test]
    fn unknown_stored_status_is_corrupt_article() {
        let err = row("bogus").into_article(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            DbError::Corrupt { resource: "article", id: 9, .. }
        ));
    }
}
