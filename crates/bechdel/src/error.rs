use std::time::Duration;

/// Failure of a single title lookup against the provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Malformed provider response: {0}")]
    Decode(String),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            LookupError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            LookupError::Status(status.as_u16())
        } else {
            LookupError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(error: serde_json::Error) -> Self {
        LookupError::Decode(error.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BechdelError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search controller stopped")]
    ControllerStopped,
}

pub type BechdelResult<T> = std::result::Result<T, BechdelError>;
