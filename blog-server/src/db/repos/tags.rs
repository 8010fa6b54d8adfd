//! Tag repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{DbError, Repository};
use crate::models::{Tag, TagDraft};

/// Tag record from database
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TagRow {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            color: r.color,
            created_at: r.created_at,
        }
    }
}

/// Tag repository
#[derive(Clone)]
pub struct TagRepo {
    pool: PgPool,
}

impl TagRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Tag> for TagRepo {
    async fn find_all(&self) -> Result<Vec<Tag>, DbError> {
        let rows: Vec<TagRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, color, created_at
            FROM tags
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, DbError> {
        let row: Option<TagRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, color, created_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn save(&self, id: Option<i32>, draft: TagDraft) -> Result<Tag, DbError> {
        let row: TagRow = match id {
            None => {
                sqlx::query_as(
                    r#"
                    INSERT INTO tags (name, description, color, created_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, name, description, color, created_at
                    "#,
                )
                .bind(draft.name)
                .bind(draft.description)
                .bind(draft.color)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => sqlx::query_as(
                r#"
                UPDATE tags
                SET name = $2, description = $3, color = $4
                WHERE id = $1
                RETURNING id, name, description, color, created_at
                "#,
            )
            .bind(id)
            .bind(draft.name)
            .bind(draft.description)
            .bind(draft.color)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found::<Tag>(id))?,
        };

        tracing::debug!(tag_id = row.id, "tag saved");
        Ok(Tag::from(row))
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        // article_tags rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found::<Tag>(id));
        }
        Ok(())
    }
}
