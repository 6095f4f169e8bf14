use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Diagnostic has not been started")]
    NotStarted,

    #[error("Diagnostic already terminated")]
    SessionTerminated,

    #[error("Tier out of range: {0} (expected 1..=10)")]
    TierOutOfRange(u8),

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Outbox is closed")]
    OutboxClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PlacementError>;
