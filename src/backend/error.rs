use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the search engine and suggestion API clients.
pub enum BackendError {
    /// The HTTP request could not be sent or timed out.
    #[error("request to '{url}' failed: {message}")]
    Request {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("'{url}' returned HTTP {status}: {body}")]
    Status {
        /// Endpoint URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from '{url}': {message}")]
    Decode {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// A request body could not be encoded.
    #[error("failed to encode request: {message}")]
    Encode {
        /// Error message.
        message: String,
    },

    /// The response decoded but does not fit the request (e.g. wrong response count).
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// Why the response was rejected.
        reason: String,
    },

    /// Client construction failed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Error message.
        message: String,
    },
}

/// Convenience result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

const MAX_ERROR_BODY: usize = 512;

pub(crate) fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
