//! Errors raised at the search provider boundary.
//!
//! Messages never include the subscription token.

/// Failure of a single provider call. The engine logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Provider answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure (DNS, refused, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The call exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Provider cannot be used as configured.
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout(e.to_string())
        } else if e.is_decode() {
            SearchError::Decode(e.to_string())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}
