// Public API - what other modules can use
pub use handlers::{create_list, delete_list, get_all_lists, get_list_by_id, update_list};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
