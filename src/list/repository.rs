use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use super::models::{NewTodoList, TodoListModel, UpdateListInput};
use crate::shared::AppError;

/// Trait for list repository operations.
///
/// Every query is scoped by the owning user, so a list owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait TodoListRepository {
    /// Stores the list and its ownership association in one step
    async fn create(&self, user_id: i64, list: &NewTodoList) -> Result<i64, AppError>;
    async fn get_all(&self, user_id: i64) -> Result<Vec<TodoListModel>, AppError>;
    async fn get_by_id(&self, user_id: i64, list_id: i64)
        -> Result<Option<TodoListModel>, AppError>;

    /// Applies the present fields; returns false when no owned list matched
    async fn update(
        &self,
        user_id: i64,
        list_id: i64,
        input: &UpdateListInput,
    ) -> Result<bool, AppError>;

    /// Removes the list and its items. Absent lists are not an error.
    async fn delete(&self, user_id: i64, list_id: i64) -> Result<(), AppError>;

    async fn is_owned_by(&self, user_id: i64, list_id: i64) -> Result<bool, AppError>;
}

fn store_failure(operation: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "List query failed");
        AppError::BackingStoreFailure(e.to_string())
    }
}

/// PostgreSQL implementation of the list repository
pub struct PostgresTodoListRepository {
    pool: PgPool,
}

impl PostgresTodoListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoListRepository for PostgresTodoListRepository {
    #[instrument(skip(self, list))]
    async fn create(&self, user_id: i64, list: &NewTodoList) -> Result<i64, AppError> {
        debug!("Creating list in database");

        let mut tx = self.pool.begin().await.map_err(store_failure("begin"))?;

        let list_id: i64 = sqlx::query_scalar(
            "INSERT INTO todo_lists (title, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&list.title)
        .bind(&list.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_failure("insert list"))?;

        sqlx::query("INSERT INTO users_lists (user_id, list_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await
            .map_err(store_failure("insert ownership"))?;

        tx.commit().await.map_err(store_failure("commit"))?;

        debug!(list_id, "List created successfully in database");
        Ok(list_id)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, user_id: i64) -> Result<Vec<TodoListModel>, AppError> {
        sqlx::query_as::<_, TodoListModel>(
            "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
             INNER JOIN users_lists ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 ORDER BY tl.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_failure("select lists"))
    }

    #[instrument(skip(self))]
    async fn get_by_id(
        &self,
        user_id: i64,
        list_id: i64,
    ) -> Result<Option<TodoListModel>, AppError> {
        sqlx::query_as::<_, TodoListModel>(
            "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
             INNER JOIN users_lists ul ON tl.id = ul.list_id \
             WHERE ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure("select list"))
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        list_id: i64,
        input: &UpdateListInput,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE todo_lists tl SET \
             title = COALESCE($1, tl.title), \
             description = COALESCE($2, tl.description) \
             FROM users_lists ul \
             WHERE tl.id = ul.list_id AND ul.user_id = $3 AND ul.list_id = $4",
        )
        .bind(input.title.as_deref())
        .bind(input.description.as_deref())
        .bind(user_id)
        .bind(list_id)
        .execute(&self.pool)
        .await
        .map_err(store_failure("update list"))?;

        debug!(rows = result.rows_affected(), "List update applied");
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, list_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(store_failure("begin"))?;

        sqlx::query(
            "DELETE FROM todo_items ti USING lists_items li, users_lists ul \
             WHERE ti.id = li.item_id AND li.list_id = ul.list_id \
             AND ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure("delete list items"))?;

        let result = sqlx::query(
            "DELETE FROM todo_lists tl USING users_lists ul \
             WHERE tl.id = ul.list_id AND ul.user_id = $1 AND ul.list_id = $2",
        )
        .bind(user_id)
        .bind(list_id)
        .execute(&mut *tx)
        .await
        .map_err(store_failure("delete list"))?;

        tx.commit().await.map_err(store_failure("commit"))?;

        debug!(rows = result.rows_affected(), "List delete applied");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_owned_by(&self, user_id: i64, list_id: i64) -> Result<bool, AppError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users_lists WHERE user_id = $1 AND list_id = $2)",
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_failure("check list ownership"))
    }
}
