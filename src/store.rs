use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::item::{
    models::{NewTodoItem, TodoItemModel, UpdateItemInput},
    repository::TodoItemRepository,
};
use crate::list::{
    models::{NewTodoList, TodoListModel, UpdateListInput},
    repository::TodoListRepository,
};
use crate::shared::AppError;

#[derive(Default)]
struct TodoTables {
    next_list_id: i64,
    next_item_id: i64,
    lists: BTreeMap<i64, TodoListModel>,
    list_owners: HashMap<i64, i64>, // list_id -> user_id
    items: BTreeMap<i64, TodoItemModel>,
    item_lists: HashMap<i64, i64>, // item_id -> list_id
}

impl TodoTables {
    fn owns_list(&self, user_id: i64, list_id: i64) -> bool {
        self.list_owners.get(&list_id) == Some(&user_id)
    }

    fn owns_item(&self, user_id: i64, item_id: i64) -> bool {
        self.item_lists
            .get(&item_id)
            .is_some_and(|list_id| self.owns_list(user_id, *list_id))
    }
}

/// In-memory implementation of the list and item repositories for development and testing
///
/// Both tables live behind one lock, so every operation sees a consistent
/// ownership chain. Data is lost when the application restarts.
#[derive(Default)]
pub struct InMemoryTodoStore {
    tables: Mutex<TodoTables>,
}

impl InMemoryTodoStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, TodoTables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::BackingStoreFailure("todo tables lock poisoned".to_string()))
    }
}

#[async_trait]
impl TodoListRepository for InMemoryTodoStore {
    #[instrument(skip(self, list))]
    async fn create(&self, user_id: i64, list: &NewTodoList) -> Result<i64, AppError> {
        let mut tables = self.tables()?;
        tables.next_list_id += 1;
        let list_id = tables.next_list_id;

        tables.lists.insert(list_id, list.clone().into_model(list_id));
        tables.list_owners.insert(list_id, user_id);

        debug!(list_id, "List created in memory");
        Ok(list_id)
    }

    async fn get_all(&self, user_id: i64) -> Result<Vec<TodoListModel>, AppError> {
        let tables = self.tables()?;
        Ok(tables
            .lists
            .values()
            .filter(|list| tables.owns_list(user_id, list.id))
            .cloned()
            .collect())
    }

    async fn get_by_id(
        &self,
        user_id: i64,
        list_id: i64,
    ) -> Result<Option<TodoListModel>, AppError> {
        let tables = self.tables()?;
        if !tables.owns_list(user_id, list_id) {
            return Ok(None);
        }
        Ok(tables.lists.get(&list_id).cloned())
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        list_id: i64,
        input: &UpdateListInput,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables()?;
        if !tables.owns_list(user_id, list_id) {
            return Ok(false);
        }

        match tables.lists.get_mut(&list_id) {
            Some(list) => {
                input.apply_to(list);
                debug!(list_id, "List updated in memory");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, list_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if !tables.owns_list(user_id, list_id) {
            return Ok(());
        }

        let item_ids: Vec<i64> = tables
            .item_lists
            .iter()
            .filter(|(_, owner_list)| **owner_list == list_id)
            .map(|(item_id, _)| *item_id)
            .collect();
        for item_id in &item_ids {
            tables.items.remove(item_id);
            tables.item_lists.remove(item_id);
        }
        tables.lists.remove(&list_id);
        tables.list_owners.remove(&list_id);

        debug!(list_id, removed_items = item_ids.len(), "List deleted from memory");
        Ok(())
    }

    async fn is_owned_by(&self, user_id: i64, list_id: i64) -> Result<bool, AppError> {
        Ok(self.tables()?.owns_list(user_id, list_id))
    }
}

#[async_trait]
impl TodoItemRepository for InMemoryTodoStore {
    #[instrument(skip(self, item))]
    async fn create(&self, list_id: i64, item: &NewTodoItem) -> Result<i64, AppError> {
        let mut tables = self.tables()?;
        if !tables.lists.contains_key(&list_id) {
            return Err(AppError::BackingStoreFailure(format!(
                "list {} does not exist",
                list_id
            )));
        }

        tables.next_item_id += 1;
        let item_id = tables.next_item_id;
        tables.items.insert(item_id, item.clone().into_model(item_id));
        tables.item_lists.insert(item_id, list_id);

        debug!(item_id, "Item created in memory");
        Ok(item_id)
    }

    async fn get_all(&self, user_id: i64, list_id: i64) -> Result<Vec<TodoItemModel>, AppError> {
        let tables = self.tables()?;
        if !tables.owns_list(user_id, list_id) {
            return Ok(Vec::new());
        }
        Ok(tables
            .items
            .values()
            .filter(|item| tables.item_lists.get(&item.id) == Some(&list_id))
            .cloned()
            .collect())
    }

    async fn get_by_id(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<TodoItemModel>, AppError> {
        let tables = self.tables()?;
        if !tables.owns_item(user_id, item_id) {
            return Ok(None);
        }
        Ok(tables.items.get(&item_id).cloned())
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        user_id: i64,
        item_id: i64,
        input: &UpdateItemInput,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables()?;
        if !tables.owns_item(user_id, item_id) {
            return Ok(false);
        }

        match tables.items.get_mut(&item_id) {
            Some(item) => {
                input.apply_to(item);
                debug!(item_id, "Item updated in memory");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.owns_item(user_id, item_id) {
            tables.items.remove(&item_id);
            tables.item_lists.remove(&item_id);
            debug!(item_id, "Item deleted from memory");
        }
        Ok(())
    }

    async fn is_owned_by(&self, user_id: i64, item_id: i64) -> Result<bool, AppError> {
        Ok(self.tables()?.owns_item(user_id, item_id))
    }
}
