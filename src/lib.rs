pub mod config;
pub mod extractor;
pub mod fetch;
pub mod messages;
pub mod models;
pub mod notifier;
pub mod parser;
pub mod store;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
