//! Kakao client error types.

/// Errors from the Kakao HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum KakaoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        /// `code` field of the error body, when upstream sent one
        code: Option<i64>,
        message: String,
    },

    /// The configured API key cannot be used
    #[error("invalid API key: {0}")]
    InvalidApiKey(&'static str),
}

impl KakaoError {
    /// Whether the request hit the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, KakaoError::Http(e) if e.is_timeout())
    }
}
