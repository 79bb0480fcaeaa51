//! Error types for Graph API calls.
//!
//! The client catches every one of these at its boundary and turns it into a
//! logged message (see [`crate::clients::FailureLog`]). Only `delete` and
//! `get_upload_status` hand a [`GraphError`] back to the caller.
//!
//! - [`GraphError::Transport`]: network failure or timeout
//! - [`GraphError::Status`]: a response other than `200 OK` where a body was expected
//! - [`GraphError::Parse`]: malformed JSON in a successful response
//! - [`GraphError::File`]: a local upload file could not be read
//! - [`GraphError::InvalidRequest`]: a request failed validation before sending

use thiserror::Error;

/// Error returned when a read receives a non-200 response.
///
/// # Example
///
/// ```rust
/// use commerce_graph::clients::GraphStatusError;
///
/// let error = GraphStatusError {
///     code: 404,
///     url: "https://graph.facebook.com/v2.9/123".to_string(),
///     body: r#"{"error":{"message":"Unknown path"}}"#.to_string(),
/// };
/// assert!(error.to_string().starts_with("Graph API returned 404"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Graph API returned {code} for {url}: {body}")]
pub struct GraphStatusError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The URL that was requested.
    pub url: String,
    /// The raw response body.
    pub body: String,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidGraphRequestError {
    /// Neither an `Authorization` header nor an `access_token` query parameter is set.
    #[error("Request to {url} carries no access token.")]
    MissingCredential {
        /// The URL of the rejected request.
        url: String,
    },

    /// A POST request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for Graph API calls.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Network, connection or timeout error.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response.
    #[error(transparent)]
    Status(#[from] GraphStatusError),

    /// The response body was not valid JSON.
    #[error("Malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// A file to upload could not be read.
    #[error("Cannot read upload file: {0}")]
    File(#[from] std::io::Error),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidGraphRequestError),
}

impl GraphError {
    /// Returns `true` for network-level failures, including timeouts.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
