use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Analytics log is not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
