use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewTodoItem, TodoItemModel, UpdateItemInput},
    repository::TodoItemRepository,
};
use crate::list::repository::TodoListRepository;
use crate::shared::{AppError, ResourceKind};

/// Item operations on behalf of an authenticated user
#[async_trait]
pub trait TodoItemService: Send + Sync {
    async fn create(&self, user_id: i64, list_id: i64, item: NewTodoItem)
        -> Result<i64, AppError>;
    async fn get_all(&self, user_id: i64, list_id: i64) -> Result<Vec<TodoItemModel>, AppError>;
    async fn get_by_id(&self, user_id: i64, item_id: i64) -> Result<TodoItemModel, AppError>;
    async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        input: UpdateItemInput,
    ) -> Result<(), AppError>;
    async fn delete(&self, user_id: i64, item_id: i64) -> Result<(), AppError>;
}

/// Service for item business logic. Parent lists are checked through the list repository.
pub struct ItemService {
    items: Arc<dyn TodoItemRepository + Send + Sync>,
    lists: Arc<dyn TodoListRepository + Send + Sync>,
}

impl ItemService {
    pub fn new(
        items: Arc<dyn TodoItemRepository + Send + Sync>,
        lists: Arc<dyn TodoListRepository + Send + Sync>,
    ) -> Self {
        Self { items, lists }
    }

    async fn ensure_parent_owned(&self, user_id: i64, list_id: i64) -> Result<(), AppError> {
        if self.lists.is_owned_by(user_id, list_id).await? {
            Ok(())
        } else {
            warn!(user_id, list_id, "Parent list not found for user");
            Err(AppError::NoSuchParent)
        }
    }

    async fn ensure_owned(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        if self.items.is_owned_by(user_id, item_id).await? {
            Ok(())
        } else {
            warn!(user_id, item_id, "Item not found for user");
            Err(AppError::NotFound(ResourceKind::Item))
        }
    }
}

#[async_trait]
impl TodoItemService for ItemService {
    #[instrument(skip(self, item))]
    async fn create(
        &self,
        user_id: i64,
        list_id: i64,
        item: NewTodoItem,
    ) -> Result<i64, AppError> {
        self.ensure_parent_owned(user_id, list_id).await?;

        let item_id = self.items.create(list_id, &item).await?;
        info!(item_id, "Item created");
        Ok(item_id)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, user_id: i64, list_id: i64) -> Result<Vec<TodoItemModel>, AppError> {
        self.ensure_parent_owned(user_id, list_id).await?;

        let items = self.items.get_all(user_id, list_id).await?;
        debug!(item_count = items.len(), "Items retrieved");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, user_id: i64, item_id: i64) -> Result<TodoItemModel, AppError> {
        self.ensure_owned(user_id, item_id).await?;

        self.items
            .get_by_id(user_id, item_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::Item))
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        input: UpdateItemInput,
    ) -> Result<(), AppError> {
        input.validate()?;
        self.ensure_owned(user_id, item_id).await?;

        if !self.items.update(user_id, item_id, &input).await? {
            return Err(AppError::NotFound(ResourceKind::Item));
        }

        info!(item_id, "Item updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        if !self.items.is_owned_by(user_id, item_id).await? {
            debug!(item_id, "Nothing to delete for user");
            return Ok(());
        }

        self.items.delete(user_id, item_id).await?;
        info!(item_id, "Item deleted");
        Ok(())
    }
}
