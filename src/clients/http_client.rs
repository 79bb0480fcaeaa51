//! HTTP transport for Graph API requests.
//!
//! [`HttpClient`] turns a [`GraphRequest`] into a single reqwest call. It
//! does not retry and does not interpret status codes; that is left to the
//! operations in [`crate::clients::GraphClient`].

use std::collections::HashMap;

use reqwest::multipart::{Form, Part};

use crate::clients::errors::GraphError;
use crate::clients::http_request::{form_fields, FilePart, GraphRequest, HttpMethod, RequestBody};
use crate::clients::http_response::GraphResponse;
use crate::config::GraphConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport shared by synchronous delivery and the background dispatcher.
///
/// Cloning is cheap: the underlying reqwest connection pool is shared.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Commerce Graph Client v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers,
        }
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request and waits for the response, up to the request's timeout.
    ///
    /// Any status code is returned as a [`GraphResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if:
    /// - the request fails validation (`InvalidRequest`)
    /// - a multipart file cannot be read (`File`)
    /// - the connection fails or times out (`Transport`)
    pub async fn send(&self, request: GraphRequest) -> Result<GraphResponse, GraphError> {
        request.verify()?;

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in self.default_headers.iter().chain(&request.headers) {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        req_builder = match request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Form(data) => req_builder.form(&form_fields(&data)),
            RequestBody::Multipart(part) => req_builder.multipart(Self::multipart(part).await?),
        };

        let res = req_builder.timeout(request.timeout).send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(GraphResponse::new(code, headers, body))
    }

    async fn multipart(part: FilePart) -> Result<Form, GraphError> {
        let bytes = tokio::fs::read(&part.path).await?;
        let file_name = part
            .path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let file = Part::bytes(bytes).file_name(file_name).mime_str(&part.mime)?;
        Ok(Form::new().part(part.field, file))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&GraphConfig::default());
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Commerce Graph Client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = GraphConfig::builder()
            .user_agent_prefix("CatalogSync/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config);
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("CatalogSync/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&GraphConfig::default());
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[tokio::test]
    async fn test_send_rejects_request_without_credential() {
        let client = HttpClient::new(&GraphConfig::default());
        let request = GraphRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/1".to_string(),
            headers: HashMap::new(),
            query: HashMap::new(),
            body: RequestBody::Empty,
            timeout: std::time::Duration::from_secs(1),
        };
        let result = client.send(request).await;
        assert!(matches!(result, Err(GraphError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_send_reports_unreadable_upload_file() {
        let client = HttpClient::new(&GraphConfig::default());
        let request = GraphRequest::builder(HttpMethod::Post, "http://127.0.0.1:9/f/uploads")
            .query_param("access_token", "tok")
            .file(FilePart::csv("/nonexistent/dir/feed.csv"))
            .build()
            .unwrap();
        let result = client.send(request).await;
        assert!(matches!(result, Err(GraphError::File(_))));
    }
}
