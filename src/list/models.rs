use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::{AppError, ResourceKind};

/// Database model for todo_lists table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TodoListModel {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// A list that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodoList {
    pub title: String,
    pub description: String,
}

impl NewTodoList {
    pub fn into_model(self, id: i64) -> TodoListModel {
        TodoListModel {
            id,
            title: self.title,
            description: self.description,
        }
    }
}

/// Sparse update: only the fields that are present get written
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UpdateListInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateListInput {
    /// Requires at least one field, and a title that is not blank when present
    pub fn validate(&self) -> Result<(), AppError> {
        let nothing_to_update = self.title.is_none() && self.description.is_none();
        let blank_title = self.title.as_deref().is_some_and(|t| t.trim().is_empty());

        if nothing_to_update || blank_title {
            return Err(AppError::InvalidUpdateInput(ResourceKind::List));
        }
        Ok(())
    }

    pub fn apply_to(&self, list: &mut TodoListModel) {
        if let Some(title) = &self.title {
            list.title = title.clone();
        }
        if let Some(description) = &self.description {
            list.description = description.clone();
        }
    }
}
