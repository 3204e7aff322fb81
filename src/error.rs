//! Errors raised by the API client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connect(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 404,
            url: "http://localhost:3000/courses/9".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Server returned 404 for http://localhost:3000/courses/9"
        );
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err: ApiError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
