use thiserror::Error;

#[derive(Debug, Error)]
/// Failures talking to the query-rewriting oracle. None of these fail a request.
pub enum OracleError {
    #[error("oracle request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("oracle '{url}' returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    #[error("failed to decode oracle response from '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("oracle did not answer within {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("oracle unavailable: {message}")]
    Unavailable { message: String },
}

pub type OracleResult<T> = Result<T, OracleError>;
