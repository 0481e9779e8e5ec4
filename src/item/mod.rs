// Public API - what other modules can use
pub use handlers::{create_item, delete_item, get_all_items, get_item_by_id, update_item};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
