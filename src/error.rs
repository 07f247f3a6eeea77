use thiserror::Error;

/// Errors raised while answering a chat query
#[derive(Debug, Error)]
pub enum ChatError {
    /// Local sliding-window quota is exhausted
    #[error("Rate limit exceeded. Please wait {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{api} API error ({status}): {body}")]
    Api {
        api: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {context} payload: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing field in upstream payload: {0}")]
    MissingField(&'static str),
}

impl ChatError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ChatError::RateLimited { .. })
    }
}

pub type ChatResult<T> = std::result::Result<T, ChatError>;
