//! Error taxonomy for the model client.

use thiserror::Error;

/// Failures talking to the remote model.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key in the environment at request time.
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    /// Transport-level failure (connection, TLS, timeout, decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The model answered with neither an image nor a text note.
    #[error("the model returned neither an image nor text; try a different prompt")]
    EmptyResponse,
}
