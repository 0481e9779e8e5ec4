use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use super::models::{NewTodoItem, TodoItemModel, UpdateItemInput};
use crate::shared::AppError;

/// Trait for item repository operations.
///
/// Reads and writes follow the ownership chain user -> list -> item.
#[async_trait]
pub trait TodoItemRepository {
    /// Stores the item under the list. The caller has already checked the list.
    async fn create(&self, list_id: i64, item: &NewTodoItem) -> Result<i64, AppError>;
    async fn get_all(&self, user_id: i64, list_id: i64) -> Result<Vec<TodoItemModel>, AppError>;
    async fn get_by_id(&self, user_id: i64, item_id: i64)
        -> Result<Option<TodoItemModel>, AppError>;

    /// Applies the present fields; returns false when no owned item matched
    async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        input: &UpdateItemInput,
    ) -> Result<bool, AppError>;

    async fn delete(&self, user_id: i64, item_id: i64) -> Result<(), AppError>;
    async fn is_owned_by(&self, user_id: i64, item_id: i64) -> Result<bool, AppError>;
}

fn store_failure(operation: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "Item query failed");
        AppError::BackingStoreFailure(e.to_string())
    }
}

/// PostgreSQL implementation of the item repository
pub struct PostgresTodoItemRepository {
    pool: PgPool,
}

impl PostgresTodoItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoItemRepository for PostgresTodoItemRepository {
    #[instrument(skip(self, item))]
    async fn create(&self, list_id: i64, item: &NewTodoItem) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await.map_err(store_failure("begin"))?;

        let item_id: i64 = sqlx::query_scalar(
            "INSERT INTO todo_items (title, description, done) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.done)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_failure("insert item"))?;

        sqlx::query("INSERT INTO lists_items (list_id, item_id) VALUES ($1, $2)")
            .bind(list_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(store_failure("insert list association"))?;

        tx.commit().await.map_err(store_failure("commit"))?;

        debug!(item_id, "Item created successfully in database");
        Ok(item_id)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, user_id: i64, list_id: i64) -> Result<Vec<TodoItemModel>, AppError> {
        sqlx::query_as::<_, TodoItemModel>(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
             INNER JOIN lists_items li ON li.item_id = ti.id \
             INNER JOIN users_lists ul ON ul.list_id = li.list_id \
             WHERE li.list_id = $1 AND ul.user_id = $2 ORDER BY ti.id",
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_failure("select items"))
    }

    #[instrument(skip(self))]
    async fn get_by_id(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<TodoItemModel>, AppError> {
        sqlx::query_as::<_, TodoItemModel>(
            "SELECT ti.id, ti.title, ti.description, ti.done FROM todo_items ti \
             INNER JOIN lists_items li ON li.item_id = ti.id \
             INNER JOIN users_lists ul ON ul.list_id = li.list_id \
             WHERE ti.id = $1 AND ul.user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure("select item"))
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        input: &UpdateItemInput,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE todo_items ti SET \
             title = COALESCE($1, ti.title), \
             description = COALESCE($2, ti.description), \
             done = COALESCE($3, ti.done) \
             FROM lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $4 AND ti.id = $5",
        )
        .bind(input.title.as_deref())
        .bind(input.description.as_deref())
        .bind(input.done)
        .bind(user_id)
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(store_failure("update item"))?;

        debug!(rows = result.rows_affected(), "Item update applied");
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM todo_items ti USING lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $1 AND ti.id = $2",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(store_failure("delete item"))?;

        debug!(rows = result.rows_affected(), "Item delete applied");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_owned_by(&self, user_id: i64, item_id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM lists_items li \
             INNER JOIN users_lists ul ON ul.list_id = li.list_id \
             WHERE ul.user_id = $1 AND li.item_id = $2)",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_failure("check item ownership"))
    }
}
