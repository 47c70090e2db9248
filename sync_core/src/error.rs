use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Malformed input (count strings, positions, region rows)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration, reported before any input is processed
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
