#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Matchmaker hub is closed")]
    HubClosed,

    #[error("Session rejected: {0}")]
    Rejected(#[from] talkative_core::MatchError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[cfg(feature = "telemetry")]
    #[error("Telemetry setup failed: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
