use thiserror::Error;

/// Failure of a single request/response exchange with the portal API
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("server rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// No usable response: connection refused, DNS failure, broken body...
    #[error("transport failure: {0}")]
    Transport(String),
    /// No response within the configured wait
    #[error("request timed out")]
    Timeout,
}

impl ApiError {
    /// Server-provided message of a rejection, if there was one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// True for failures that mean "could not talk to the server"
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
