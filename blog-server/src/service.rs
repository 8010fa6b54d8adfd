//! Service layer - one per entity, delegating to its repository
//!
//! Services are where behavior beyond persistence would go. Today they hand
//! every call straight to the repository: no validation, no error mapping.

use std::sync::Arc;

use crate::db::repos::{DbError, Repository};
use crate::models::{Article, Entity, Tag};

pub type ArticleService = Service<Article>;
pub type TagService = Service<Tag>;

/// Pass-through service over a [`Repository`] for `E`.
pub struct Service<E: Entity> {
    repo: Arc<dyn Repository<E>>,
}

// Manual impl: cloning shares the repository and needs no `E: Clone`
impl<E: Entity> Clone for Service<E> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<E: Entity> Service<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        Self { repo }
    }

    pub async fn find_all(&self) -> Result<Vec<E>, DbError> {
        self.repo.find_all().await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<E>, DbError> {
        self.repo.find_by_id(id).await
    }

    pub async fn save(&self, id: Option<i32>, draft: E::Draft) -> Result<E, DbError> {
        self.repo.save(id, draft).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<(), DbError> {
        self.repo.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::TagDraft;

    #[tokio::test]
    async fn delegates_to_repository() {
        let store = MemoryStore::new();
        let service = TagService::new(Arc::new(store.clone()));

        let tag = service
            .save(
                None,
                TagDraft {
                    name: Some("rust".into()),
                    ..TagDraft::default()
                },
            )
            .await
            .unwrap();

        let from_store = Repository::<Tag>::find_by_id(&store, tag.id).await.unwrap();
        assert_eq!(from_store, Some(tag.clone()));
        assert_eq!(service.find_all().await.unwrap(), vec![tag.clone()]);

        service.delete_by_id(tag.id).await.unwrap();
        assert_eq!(service.find_by_id(tag.id).await.unwrap(), None);
    }
}
