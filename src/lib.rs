pub mod config;
pub mod extractor;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod reconciler;
pub mod scraper;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
