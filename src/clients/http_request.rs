//! HTTP request types for Graph API calls.
//!
//! This module provides the [`GraphRequest`] type and its builder. A request
//! is built fresh for every call and is never mutated once built.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::clients::errors::InvalidGraphRequestError;
use crate::config::{AccessToken, DEFAULT_TIMEOUT};

/// Name of the query parameter carrying the token on uploads.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Body fields of a POST request.
///
/// Graph reads POST bodies as form fields. String values are sent as-is;
/// any other value (numbers, booleans, nested objects and arrays) is sent as
/// its compact JSON text.
pub type FormData = serde_json::Map<String, serde_json::Value>;

/// HTTP methods used against the Graph API.
///
/// Updates are POSTs to the resource's own URL, so there is no PUT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for reading resources.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A local file sent as one multipart field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    /// Path of the file on disk; read when the request is sent.
    pub path: PathBuf,
    /// MIME type of the part.
    pub mime: String,
}

impl FilePart {
    /// A CSV feed file in the `file` field.
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self {
            field: "file".to_string(),
            path: path.into(),
            mime: "text/csv".to_string(),
        }
    }
}

/// The body of a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Form-encoded fields.
    Form(FormData),
    /// A multipart upload of a single file.
    Multipart(FilePart),
}

impl RequestBody {
    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Encodes form data into `(name, value)` pairs.
///
/// # Example
///
/// ```rust
/// use commerce_graph::clients::form_fields;
/// use serde_json::json;
///
/// let data = json!({"name": "Shirt", "price": 1999, "visible": true});
/// let fields = form_fields(data.as_object().unwrap());
/// assert!(fields.contains(&("name".to_string(), "Shirt".to_string())));
/// assert!(fields.contains(&("price".to_string(), "1999".to_string())));
/// assert!(fields.contains(&("visible".to_string(), "true".to_string())));
/// ```
#[must_use]
pub fn form_fields(data: &FormData) -> Vec<(String, String)> {
    data.iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// An HTTP request to be sent to the Graph API.
///
/// # Example
///
/// ```rust
/// use commerce_graph::AccessToken;
/// use commerce_graph::clients::{GraphRequest, HttpMethod, RequestBody};
/// use serde_json::json;
///
/// let token = AccessToken::new("token").unwrap();
/// let request = GraphRequest::builder(HttpMethod::Post, "https://graph.facebook.com/v2.9/1/products")
///     .bearer(&token)
///     .form(json!({"retailer_id": "sku-1"}).as_object().unwrap().clone())
///     .build()
///     .unwrap();
///
/// assert_eq!(request.headers.get("Authorization").unwrap(), "Bearer token");
/// assert!(matches!(request.body, RequestBody::Form(_)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GraphRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The full URL, query string included if the suffix carried one.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Extra query parameters appended to the URL.
    pub query: HashMap<String, String>,
    /// The request body.
    pub body: RequestBody,
    /// Time allowed for the whole request.
    pub timeout: Duration,
}

impl GraphRequest {
    /// Creates a new builder for constructing a `GraphRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> GraphRequestBuilder {
        GraphRequestBuilder::new(method, url)
    }

    /// Returns the token this request authenticates with, from the
    /// `Authorization` header or the `access_token` query parameter.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .or_else(|| self.query.get(ACCESS_TOKEN_PARAM).map(String::as_str))
            .or_else(|| {
                self.url
                    .split_once('?')
                    .and_then(|(_, q)| {
                        q.split('&')
                            .find_map(|pair| pair.strip_prefix("access_token="))
                    })
            })
            .filter(|token| !token.is_empty())
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphRequestError`] if:
    /// - the request carries no access token
    /// - `method` is `Post` and `body` is empty
    pub fn verify(&self) -> Result<(), InvalidGraphRequestError> {
        if self.credential().is_none() {
            return Err(InvalidGraphRequestError::MissingCredential {
                url: self.url.clone(),
            });
        }

        if self.method == HttpMethod::Post && self.body.is_empty() {
            return Err(InvalidGraphRequestError::MissingBody {
                method: self.method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`GraphRequest`] instances.
#[derive(Debug)]
pub struct GraphRequestBuilder {
    method: HttpMethod,
    url: String,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    body: RequestBody,
    timeout: Duration,
}

impl GraphRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query: HashMap::new(),
            body: RequestBody::Empty,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(self, token: &AccessToken) -> Self {
        self.header("Authorization", token.bearer())
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets a form body.
    #[must_use]
    pub fn form(mut self, data: FormData) -> Self {
        self.body = RequestBody::Form(data);
        self
    }

    /// Sets a multipart file body.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`GraphRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGraphRequestError`] if the request fails validation.
    pub fn build(self) -> Result<GraphRequest, InvalidGraphRequestError> {
        let request = GraphRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            query: self.query,
            body: self.body,
            timeout: self.timeout,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token() -> AccessToken {
        AccessToken::new("tok").unwrap()
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = GraphRequest::builder(HttpMethod::Get, "https://g/v2.9/1")
            .bearer(&token())
            .build()
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://g/v2.9/1");
        assert!(request.body.is_empty());
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert_eq!(request.credential(), Some("tok"));
    }

    #[test]
    fn test_verify_requires_credential() {
        let result = GraphRequest::builder(HttpMethod::Get, "https://g/v2.9/1").build();
        assert!(matches!(
            result,
            Err(InvalidGraphRequestError::MissingCredential { url }) if url == "https://g/v2.9/1"
        ));
    }

    #[test]
    fn test_verify_rejects_empty_bearer() {
        let result = GraphRequest::builder(HttpMethod::Get, "https://g/v2.9/1")
            .header("Authorization", "Bearer ")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_requires_body_for_post() {
        let result = GraphRequest::builder(HttpMethod::Post, "https://g/v2.9/1")
            .bearer(&token())
            .build();
        assert!(matches!(
            result,
            Err(InvalidGraphRequestError::MissingBody { method }) if method == "post"
        ));
    }

    #[test]
    fn test_query_string_token_counts_as_credential() {
        let request = GraphRequest::builder(HttpMethod::Post, "https://g/v2.9/f/uploads")
            .query_param(ACCESS_TOKEN_PARAM, "q-tok")
            .file(FilePart::csv("/tmp/feed.csv"))
            .build()
            .unwrap();
        assert_eq!(request.credential(), Some("q-tok"));
        assert!(!request.headers.contains_key("Authorization"));

        let inline = GraphRequest::builder(HttpMethod::Get, "https://g/v2.9/f?access_token=abc")
            .build()
            .unwrap();
        assert_eq!(inline.credential(), Some("abc"));
    }

    #[test]
    fn test_form_fields_encoding() {
        let data = json!({
            "name": "Group",
            "variants": [{"product_field": "color"}],
            "count": 3,
            "missing": null
        });
        let mut fields = form_fields(data.as_object().unwrap());
        fields.sort();

        assert_eq!(
            fields,
            vec![
                ("count".to_string(), "3".to_string()),
                ("missing".to_string(), String::new()),
                ("name".to_string(), "Group".to_string()),
                (
                    "variants".to_string(),
                    r#"[{"product_field":"color"}]"#.to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_csv_file_part() {
        let part = FilePart::csv("/tmp/feed.csv");
        assert_eq!(part.field, "file");
        assert_eq!(part.mime, "text/csv");
        assert_eq!(part.path, PathBuf::from("/tmp/feed.csv"));
    }
}
