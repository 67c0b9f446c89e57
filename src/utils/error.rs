use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Malformed row: {message}")]
    MalformedRow { message: String },

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn malformed_row(message: impl Into<String>) -> Self {
        AppError::MalformedRow {
            message: message.into(),
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
