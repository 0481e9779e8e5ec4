use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::{AppError, ResourceKind};

/// Database model for todo_items table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TodoItemModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
}

/// An item that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodoItem {
    pub title: String,
    pub description: String,
    pub done: bool,
}

impl NewTodoItem {
    pub fn into_model(self, id: i64) -> TodoItemModel {
        TodoItemModel {
            id,
            title: self.title,
            description: self.description,
            done: self.done,
        }
    }
}

/// Sparse update: only the fields that are present get written
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UpdateItemInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl UpdateItemInput {
    pub fn validate(&self) -> Result<(), AppError> {
        let nothing_to_update =
            self.title.is_none() && self.description.is_none() && self.done.is_none();
        let blank_title = self.title.as_deref().is_some_and(|t| t.trim().is_empty());

        if nothing_to_update || blank_title {
            return Err(AppError::InvalidUpdateInput(ResourceKind::Item));
        }
        Ok(())
    }

    pub fn apply_to(&self, item: &mut TodoItemModel) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(done) = self.done {
            item.done = done;
        }
    }
}
