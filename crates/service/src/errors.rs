use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request payload rejected; the message is safe to show to callers.
    #[error("{0}")]
    Validation(String),
    #[error("storage i/o error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ServiceError {
    pub fn validation(msg: &str) -> Self { Self::Validation(msg.to_string()) }

    pub fn is_client_error(&self) -> bool { matches!(self, Self::Validation(_)) }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}
