use serde::Deserialize;

use super::models::NewTodoItem;
use crate::shared::AppError;

/// Request payload for POST /api/lists/:id/items
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl CreateItemRequest {
    pub fn into_new_item(self) -> Result<NewTodoItem, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Invalid request body".to_string()));
        }
        Ok(NewTodoItem {
            title: self.title,
            description: self.description,
            done: self.done,
        })
    }
}
