//! Idempotent schema bootstrap
//!
//! Tables are created with `IF NOT EXISTS` on every startup. There is no
//! versioned migration history.

use sqlx::PgPool;

/// Create the `articles`, `tags` and `article_tags` tables if missing.
pub async fn bootstrap(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Bootstrapping database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id SERIAL PRIMARY KEY,
            title TEXT,
            excerpt TEXT,
            content TEXT,
            author TEXT,
            category TEXT,
            reading_time INTEGER,
            views INTEGER,
            likes INTEGER,
            status TEXT NOT NULL DEFAULT 'published'
                CHECK (status IN ('draft', 'published', 'archived')),
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            published_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id SERIAL PRIMARY KEY,
            name TEXT,
            description TEXT,
            color TEXT,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Deleting either side drops its join rows, never the other entity
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS article_tags (
            article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (article_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_article_tags_tag ON article_tags(tag_id)")
        .execute(pool)
        .await?;

    tracing::info!("Schema ready");
    Ok(())
}
