use thiserror::Error;

/// Failures talking to a third-party AI provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AiError {
    #[error("{provider} transport error: {message}")]
    Transport { provider: &'static str, message: String },
    #[error("{provider} returned HTTP {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },
    #[error("{provider} response could not be decoded: {message}")]
    Decode { provider: &'static str, message: String },
    #[error("{provider} returned an empty result")]
    EmptyResponse { provider: &'static str },
}

impl AiError {
    pub fn transport(provider: &'static str, error: reqwest::Error) -> Self {
        Self::Transport { provider, message: error.to_string() }
    }

    pub fn decode(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Decode { provider, message: message.into() }
    }

    /// Builds a status error, truncating the body to keep logs readable.
    pub fn status(provider: &'static str, status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let body = text.chars().take(200).collect();
        Self::Status { provider, status, body }
    }
}

/// Failures of the duplicate-detection cache.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CacheError {
    #[error("Cache file error: {0}")]
    Io(String),
    #[error("Cache serialization error: {0}")]
    Serialization(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
