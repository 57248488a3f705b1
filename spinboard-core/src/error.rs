use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpinboardError>;

#[derive(Error, Debug)]
pub enum SpinboardError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Operation timeout: {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpinboardError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Maps a non-success HTTP status onto the error taxonomy.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::auth(format!("{} rejected with status {}", context, status)),
            _ => Self::protocol(format!("{} failed with status {}", context, status)),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

// reqwest failures split across timeout, transport and decode errors
impl From<reqwest::Error> for SpinboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SpinboardError::Timeout(err.to_string())
        } else if err.is_decode() {
            SpinboardError::Protocol(format!("Malformed response: {}", err))
        } else if let Some(status) = err.status() {
            SpinboardError::from_status(status, "Request")
        } else {
            SpinboardError::Network(err.to_string())
        }
    }
}
