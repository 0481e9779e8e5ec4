use serde::Deserialize;

use super::models::NewTodoList;
use crate::shared::AppError;

/// Request payload for POST /api/lists
#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateListRequest {
    /// Title is required and must not be blank
    pub fn into_new_list(self) -> Result<NewTodoList, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Invalid request body".to_string()));
        }
        Ok(NewTodoList {
            title: self.title,
            description: self.description,
        })
    }
}
