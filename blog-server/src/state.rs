//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{ArticleRepo, DbError, MemoryStore, TagRepo};
use crate::service::{ArticleService, TagService};

/// Backing store behind the services, kept for reachability checks.
#[derive(Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory,
}

impl Storage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }

    /// Round-trip to the store. Always succeeds for memory.
    pub async fn ping(&self) -> Result<(), DbError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Self::Memory => Ok(()),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    articles: ArticleService,
    tags: TagService,
    storage: Storage,
}

impl AppState {
    pub fn new(articles: ArticleService, tags: TagService, storage: Storage) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                articles,
                tags,
                storage,
            }),
        }
    }

    /// State backed by PostgreSQL repositories sharing `pool`.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            ArticleService::new(Arc::new(ArticleRepo::new(pool.clone()))),
            TagService::new(Arc::new(TagRepo::new(pool.clone()))),
            Storage::Postgres(pool),
        )
    }

    /// State backed by one in-process [`MemoryStore`].
    pub fn memory(store: MemoryStore) -> Self {
        Self::new(
            ArticleService::new(Arc::new(store.clone())),
            TagService::new(Arc::new(store)),
            Storage::Memory,
        )
    }

    pub fn articles(&self) -> &ArticleService {
        &self.inner.articles
    }

    pub fn tags(&self) -> &TagService {
        &self.inner.tags
    }

    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }
}
