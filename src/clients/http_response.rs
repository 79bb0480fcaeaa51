//! HTTP response types for Graph API calls.
//!
//! This module provides [`GraphResponse`], the raw result of a synchronous
//! call, and [`UploadStatus`], the decoded body of an upload status poll.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clients::errors::{GraphError, GraphStatusError};
use crate::config::ResourceId;

/// An HTTP response from the Graph API.
///
/// The body is kept as text; decoding is left to the operation that needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl GraphResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: impl Into<String>) -> Self {
        Self {
            code,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` only for `200 OK`, the one status Graph reads treat as success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == 200
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, GraphError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decodes the body if the status is `200`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Status`] for any other status and
    /// [`GraphError::Parse`] for malformed JSON.
    pub fn into_json(self, url: &str) -> Result<serde_json::Value, GraphError> {
        if !self.is_ok() {
            return Err(GraphStatusError {
                code: self.code,
                url: url.to_string(),
                body: self.body,
            }
            .into());
        }
        self.json()
    }

    /// Returns `error.message` from a Graph error body, if present.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let body: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        match body.get("error")? {
            serde_json::Value::String(message) => Some(message.clone()),
            error => error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(String::from),
        }
    }

    /// Returns the value of the `x-fb-trace-id` header, if present.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.headers
            .get("x-fb-trace-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Completion state of a feed upload.
///
/// Graph answers `GET {upload-id}/?fields=end_time` with
/// `{"id": "...", "end_time": "2017-06-14T18:00:00+0000"}`; `end_time` is
/// absent while the upload is still being processed.
///
/// # Example
///
/// ```rust
/// use commerce_graph::clients::UploadStatus;
///
/// let status: UploadStatus =
///     serde_json::from_str(r#"{"id":"u1","end_time":"2017-06-14T18:00:00+0000"}"#).unwrap();
/// assert!(status.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// The upload id.
    pub id: ResourceId,
    /// When processing finished, if it has.
    #[serde(default, deserialize_with = "deserialize_graph_time")]
    pub end_time: Option<DateTime<Utc>>,
}

impl UploadStatus {
    /// Graph's timestamp format (`+0000` offsets, no colon).
    pub const TIME_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%z";

    /// Decodes an upload status from a `200` response.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Status`] for non-200 responses and
    /// [`GraphError::Parse`] if the body does not describe an upload.
    pub fn from_response(response: &GraphResponse) -> Result<Self, GraphError> {
        if !response.is_ok() {
            return Err(GraphStatusError {
                code: response.code,
                url: String::new(),
                body: response.body.clone(),
            }
            .into());
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Returns `true` once Graph reports an end time.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }
}

fn deserialize_graph_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    DateTime::parse_from_str(&raw, UploadStatus::TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(&raw))
        .map(|time| Some(time.with_timezone(&Utc)))
        .map_err(serde::de::Error::custom)
}
