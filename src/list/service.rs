use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewTodoList, TodoListModel, UpdateListInput},
    repository::TodoListRepository,
};
use crate::shared::{AppError, ResourceKind};

/// List operations on behalf of an authenticated user
#[async_trait]
pub trait TodoListService: Send + Sync {
    async fn create(&self, user_id: i64, list: NewTodoList) -> Result<i64, AppError>;
    async fn get_all(&self, user_id: i64) -> Result<Vec<TodoListModel>, AppError>;
    async fn get_by_id(&self, user_id: i64, list_id: i64) -> Result<TodoListModel, AppError>;
    async fn update(
        &self,
        user_id: i64,
        list_id: i64,
        input: UpdateListInput,
    ) -> Result<(), AppError>;
    async fn delete(&self, user_id: i64, list_id: i64) -> Result<(), AppError>;
}

/// Service for list business logic: ownership first, then the repository
pub struct ListService {
    repository: Arc<dyn TodoListRepository + Send + Sync>,
}

impl ListService {
    pub fn new(repository: Arc<dyn TodoListRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    async fn ensure_owned(&self, user_id: i64, list_id: i64) -> Result<(), AppError> {
        if self.repository.is_owned_by(user_id, list_id).await? {
            Ok(())
        } else {
            warn!(user_id, list_id, "List not found for user");
            Err(AppError::NotFound(ResourceKind::List))
        }
    }
}

#[async_trait]
impl TodoListService for ListService {
    #[instrument(skip(self, list))]
    async fn create(&self, user_id: i64, list: NewTodoList) -> Result<i64, AppError> {
        let list_id = self.repository.create(user_id, &list).await?;
        info!(list_id, "List created");
        Ok(list_id)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, user_id: i64) -> Result<Vec<TodoListModel>, AppError> {
        let lists = self.repository.get_all(user_id).await?;
        debug!(list_count = lists.len(), "Lists retrieved");
        Ok(lists)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, user_id: i64, list_id: i64) -> Result<TodoListModel, AppError> {
        self.ensure_owned(user_id, list_id).await?;

        self.repository
            .get_by_id(user_id, list_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::List))
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        list_id: i64,
        input: UpdateListInput,
    ) -> Result<(), AppError> {
        input.validate()?;
        self.ensure_owned(user_id, list_id).await?;

        // Ownership can vanish between the check and the write
        if !self.repository.update(user_id, list_id, &input).await? {
            return Err(AppError::NotFound(ResourceKind::List));
        }

        info!(list_id, "List updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, list_id: i64) -> Result<(), AppError> {
        if !self.repository.is_owned_by(user_id, list_id).await? {
            debug!(list_id, "Nothing to delete for user");
            return Ok(());
        }

        self.repository.delete(user_id, list_id).await?;
        info!(list_id, "List deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTodoStore;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn new_list(title: &str) -> NewTodoList {
        NewTodoList {
            title: title.to_string(),
            description: "Description".to_string(),
        }
    }

    fn service() -> ListService {
        ListService::new(Arc::new(InMemoryTodoStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let id = service.create(ALICE, new_list("Groceries")).await.unwrap();

        let list = service.get_by_id(ALICE, id).await.unwrap();
        assert_eq!(list.title, "Groceries");
        assert_eq!(list.description, "Description");
    }

    #[tokio::test]
    async fn test_get_all_is_scoped_to_owner() {
        let service = service();
        assert!(service.get_all(ALICE).await.unwrap().is_empty());

        service.create(ALICE, new_list("Mine")).await.unwrap();
        service.create(BOB, new_list("Theirs")).await.unwrap();

        let lists = service.get_all(ALICE).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].title, "Mine");
    }

    #[tokio::test]
    async fn test_foreign_list_looks_missing() {
        let service = service();
        let bobs = service.create(BOB, new_list("Theirs")).await.unwrap();
        let missing = bobs + 100;

        let foreign = service.get_by_id(ALICE, bobs).await.unwrap_err();
        let absent = service.get_by_id(ALICE, missing).await.unwrap_err();
        assert!(matches!(foreign, AppError::NotFound(ResourceKind::List)));
        assert_eq!(foreign.to_string(), absent.to_string());

        let input = UpdateListInput {
            title: Some("Hijacked".to_string()),
            description: None,
        };
        let foreign = service.update(ALICE, bobs, input.clone()).await.unwrap_err();
        let absent = service.update(ALICE, missing, input).await.unwrap_err();
        assert_eq!(foreign.to_string(), absent.to_string());

        assert!(service.delete(ALICE, bobs).await.is_ok());
        assert!(service.delete(ALICE, missing).await.is_ok());

        // Bob's list is untouched
        assert_eq!(service.get_by_id(BOB, bobs).await.unwrap().title, "Theirs");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = service();
        let id = service.create(ALICE, new_list("Groceries")).await.unwrap();

        service
            .update(
                ALICE,
                id,
                UpdateListInput {
                    title: Some("X".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        let list = service.get_by_id(ALICE, id).await.unwrap();
        assert_eq!(list.title, "X");
        assert_eq!(list.description, "Description");
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_before_ownership() {
        let service = service();

        let result = service.update(ALICE, 999, UpdateListInput::default()).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidUpdateInput(ResourceKind::List))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = service();
        let id = service.create(ALICE, new_list("Groceries")).await.unwrap();

        service.delete(ALICE, id).await.unwrap();
        service.delete(ALICE, id).await.unwrap();

        assert!(matches!(
            service.get_by_id(ALICE, id).await,
            Err(AppError::NotFound(ResourceKind::List))
        ));
    }
}
