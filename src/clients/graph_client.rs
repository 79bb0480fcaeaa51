//! Catalog client for the Graph API.
//!
//! This module provides [`GraphClient`], which exposes verb-shaped
//! operations on catalogs, product groups, product items, feeds and uploads.
//! Each operation builds a URL, builds a fresh [`GraphRequest`] and sends it
//! through the appropriate delivery path.
//!
//! # Failure policy
//!
//! Writes are best-effort, reads are reliable:
//!
//! - creates, updates and log events never return an error. With
//!   synchronous delivery the caller gets the raw response back
//!   ([`PostOutcome::Completed`]) whatever its status; with asynchronous
//!   delivery nothing comes back ([`PostOutcome::Queued`]).
//! - reads return `None` on any failure; `delete` and `get_upload_status`
//!   return a `Result` the caller must check.
//!
//! Every swallowed failure is reported once to the client's
//! [`FailureLog`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::delivery::{DeferredTask, Delivery};
use crate::clients::errors::GraphError;
use crate::clients::failure_log::{FailureLog, TracingFailureLog};
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{
    FilePart, FormData, GraphRequest, HttpMethod, ACCESS_TOKEN_PARAM,
};
use crate::clients::http_response::GraphResponse;
use crate::clients::url::{self, build_url};
use crate::config::{AccessToken, GraphConfig, ResourceId};

/// Result of a create, update or log call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostOutcome {
    /// Sent synchronously; the response may still carry a Graph error.
    Completed(GraphResponse),
    /// Handed to the background dispatcher; no result will ever be available.
    Queued,
    /// Sent synchronously but no response arrived. The failure has been logged.
    Failed,
}

impl PostOutcome {
    /// Returns the response for [`PostOutcome::Completed`].
    #[must_use]
    pub const fn response(&self) -> Option<&GraphResponse> {
        match self {
            Self::Completed(response) => Some(response),
            Self::Queued | Self::Failed => None,
        }
    }

    /// Returns `true` for [`PostOutcome::Queued`].
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Client for the Graph commerce catalog endpoints.
///
/// The access token, delivery strategy and failure log are fixed at
/// construction. Every operation that accepts a `credential` uses it instead
/// of the stored token for that one call.
///
/// # Thread Safety
///
/// `GraphClient` is `Send + Sync` and holds no mutable state; calls share
/// nothing but the connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use commerce_graph::{AccessToken, GraphClient};
/// use serde_json::json;
///
/// let client = GraphClient::new(AccessToken::new("token")?, None);
///
/// if client.validate_product_catalog("1234").await == Some(true) {
///     let data = json!({"retailer_id": "sku-1"}).as_object().unwrap().clone();
///     client.create_product_group("1234", data).await;
/// }
/// ```
#[derive(Debug)]
pub struct GraphClient {
    http: HttpClient,
    access_token: AccessToken,
    api_base: String,
    timeout: Duration,
    delivery: Delivery,
    failure_log: Arc<dyn FailureLog>,
}

// Verify GraphClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphClient>();
};

impl GraphClient {
    /// Creates a client with synchronous delivery and `tracing` failure logs.
    #[must_use]
    pub fn new(access_token: AccessToken, config: Option<&GraphConfig>) -> Self {
        let mut builder = Self::builder(access_token);
        if let Some(config) = config {
            builder = builder.config(config.clone());
        }
        builder.build()
    }

    /// Creates a builder for a client authenticated with `access_token`.
    #[must_use]
    pub fn builder(access_token: AccessToken) -> GraphClientBuilder {
        GraphClientBuilder::new(access_token)
    }

    /// Returns the stored access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the base every resource URL starts with.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the configured delivery strategy.
    #[must_use]
    pub const fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Builds the URL of `resource_id` followed by `suffix`.
    #[must_use]
    pub fn build_url(&self, resource_id: impl Into<ResourceId>, suffix: &str) -> String {
        build_url(&self.api_base, resource_id.into(), suffix)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Fetches `resource_id` + `suffix` and decodes the body.
    ///
    /// Returns `Some` only for a `200` response with a JSON body. Transport
    /// errors, other statuses and malformed bodies are logged and yield `None`.
    pub async fn fetch(
        &self,
        resource_id: impl Into<ResourceId>,
        suffix: &str,
        credential: Option<&AccessToken>,
    ) -> Option<serde_json::Value> {
        let url = self.build_url(resource_id, suffix);
        let response = self.get(&url, credential).await.ok()?;
        match response.into_json(&url) {
            Ok(body) => Some(body),
            Err(error) => {
                self.report(format!("GET {url} failed: {error}"));
                None
            }
        }
    }

    /// Returns the name of a Facebook page.
    pub async fn get_page_name(
        &self,
        page_id: impl Into<ResourceId>,
        credential: Option<&AccessToken>,
    ) -> Option<String> {
        let body = self.fetch(page_id, url::FIELDS_NAME, credential).await?;
        body.get("name")
            .and_then(serde_json::Value::as_str)
            .map(String::from)
    }

    /// Checks whether a product catalog is reachable with the stored token.
    ///
    /// Returns `None` if the request could not be sent at all. A non-200
    /// answer yields `Some(false)` and is logged.
    pub async fn validate_product_catalog(
        &self,
        product_catalog_id: impl Into<ResourceId>,
    ) -> Option<bool> {
        let url = self.build_url(product_catalog_id, "");
        let response = self.get(&url, None).await.ok()?;
        self.report_status(HttpMethod::Get, &url, &response);
        Some(response.is_ok())
    }

    /// Polls the completion state of a feed upload.
    ///
    /// Always synchronous. Decode the body with
    /// [`UploadStatus::from_response`](crate::clients::UploadStatus::from_response).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the request could not be sent. Non-200
    /// answers come back as `Ok`. Both are logged.
    pub async fn get_upload_status(
        &self,
        upload_id: impl Into<ResourceId>,
    ) -> Result<GraphResponse, GraphError> {
        let url = self.build_url(upload_id, url::FIELDS_END_TIME);
        let response = self.get(&url, None).await?;
        self.report_status(HttpMethod::Get, &url, &response);
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Creates a child of `parent_id` under `child_path` (e.g. `/products`).
    pub async fn create(
        &self,
        parent_id: impl Into<ResourceId>,
        child_path: &str,
        data: FormData,
        credential: Option<&AccessToken>,
    ) -> PostOutcome {
        let url = self.build_url(parent_id, child_path);
        self.post(url, data, credential).await
    }

    /// Creates a product group in a catalog.
    pub async fn create_product_group(
        &self,
        product_catalog_id: impl Into<ResourceId>,
        data: FormData,
    ) -> PostOutcome {
        self.create(product_catalog_id, url::PRODUCT_GROUPS, data, None)
            .await
    }

    /// Creates a product item in a product group.
    pub async fn create_product_item(
        &self,
        product_group_id: impl Into<ResourceId>,
        data: FormData,
    ) -> PostOutcome {
        self.create(product_group_id, url::PRODUCTS, data, None).await
    }

    /// Creates a product feed in a catalog.
    ///
    /// A successful synchronous call answers `{"id": <feed id>}`.
    pub async fn create_feed(
        &self,
        product_catalog_id: impl Into<ResourceId>,
        data: FormData,
    ) -> PostOutcome {
        self.create(product_catalog_id, url::PRODUCT_FEEDS, data, None)
            .await
    }

    /// Updates a resource by posting to its own URL.
    pub async fn update(
        &self,
        resource_id: impl Into<ResourceId>,
        data: FormData,
        credential: Option<&AccessToken>,
    ) -> PostOutcome {
        let url = self.build_url(resource_id, "");
        self.post(url, data, credential).await
    }

    /// Updates a product group.
    pub async fn update_product_group(
        &self,
        product_group_id: impl Into<ResourceId>,
        data: FormData,
    ) -> PostOutcome {
        self.update(product_group_id, data, None).await
    }

    /// Updates a product item.
    pub async fn update_product_item(
        &self,
        product_item_id: impl Into<ResourceId>,
        data: FormData,
    ) -> PostOutcome {
        self.update(product_item_id, data, None).await
    }

    /// Posts a log event for an external merchant settings id.
    pub async fn log_event(
        &self,
        resource_id: impl Into<ResourceId>,
        message: &str,
        error: bool,
    ) -> PostOutcome {
        let url = self.build_url(resource_id, url::LOG_EVENTS);
        let mut data = FormData::new();
        data.insert("message".to_string(), message.into());
        data.insert("error".to_string(), if error { "1" } else { "0" }.into());
        self.post(url, data, None).await
    }

    /// Deletes a resource. Always synchronous.
    ///
    /// Any status comes back as `Ok`; check [`GraphResponse::is_ok`]. Non-200
    /// answers are logged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the request could not be sent; the failure
    /// has already been logged.
    pub async fn delete(
        &self,
        resource_id: impl Into<ResourceId>,
        credential: Option<&AccessToken>,
    ) -> Result<GraphResponse, GraphError> {
        let url = self.build_url(resource_id, "");
        let request = GraphRequest::builder(HttpMethod::Delete, &url)
            .bearer(self.credential(credential))
            .timeout(self.timeout)
            .build()?;
        let response = self.send_logged(request).await?;
        self.report_status(HttpMethod::Delete, &url, &response);
        Ok(response)
    }

    /// Deletes a product item.
    ///
    /// # Errors
    ///
    /// See [`GraphClient::delete`].
    pub async fn delete_product_item(
        &self,
        product_item_id: impl Into<ResourceId>,
    ) -> Result<GraphResponse, GraphError> {
        self.delete(product_item_id, None).await
    }

    /// Deletes a product group.
    ///
    /// # Errors
    ///
    /// See [`GraphClient::delete`].
    pub async fn delete_product_group(
        &self,
        product_group_id: impl Into<ResourceId>,
    ) -> Result<GraphResponse, GraphError> {
        self.delete(product_group_id, None).await
    }

    /// Uploads a CSV feed file to a feed. Always synchronous.
    ///
    /// The token travels as the `access_token` query parameter rather than a
    /// header. Returns the decoded reply, `{"id": <upload id>}` on success or
    /// `{"error": ...}` on failure, logging the latter; returns `None` (after
    /// logging) if the file cannot be read, the request cannot be sent, or the
    /// reply is not JSON.
    pub async fn upload_file(
        &self,
        feed_id: impl Into<ResourceId>,
        path: impl AsRef<Path>,
        credential: Option<&AccessToken>,
    ) -> Option<serde_json::Value> {
        let url = self.build_url(feed_id, url::UPLOADS);
        let token: &str = self.credential(credential).as_ref();
        let request = GraphRequest::builder(HttpMethod::Post, &url)
            .query_param(ACCESS_TOKEN_PARAM, token)
            .file(FilePart::csv(path.as_ref()))
            .timeout(self.timeout)
            .build();

        let result = match request {
            Ok(request) => self.http.send(request).await,
            Err(error) => Err(error.into()),
        };

        let outcome = result.and_then(|response| {
            let body = response.json()?;
            if !response.is_ok() || body.get("error").is_some() {
                let reason = response
                    .error_message()
                    .unwrap_or_else(|| response.body.clone());
                self.report(format!(
                    "Feed upload to {url} returned {}: {reason}",
                    response.code
                ));
            }
            Ok(body)
        });
        match outcome {
            Ok(body) => Some(body),
            Err(error) => {
                // The request URL carries the token; keep it out of the log.
                let error = match error {
                    GraphError::Transport(e) => GraphError::Transport(e.without_url()),
                    other => other,
                };
                self.report(format!("Feed upload to {url} failed: {error}"));
                None
            }
        }
    }

    /// Uploads a CSV feed file with the stored token.
    pub async fn create_upload(
        &self,
        feed_id: impl Into<ResourceId>,
        path: impl AsRef<Path>,
    ) -> Option<serde_json::Value> {
        self.upload_file(feed_id, path, None).await
    }

    // ------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------

    fn credential<'a>(&'a self, credential: Option<&'a AccessToken>) -> &'a AccessToken {
        credential.unwrap_or(&self.access_token)
    }

    fn report(&self, message: String) {
        self.failure_log.record(&message);
    }

    fn report_status(&self, method: HttpMethod, url: &str, response: &GraphResponse) {
        if response.is_ok() {
            return;
        }
        let reason = response
            .error_message()
            .unwrap_or_else(|| response.body.clone());
        self.report(format!(
            "{} {url} returned {}: {reason}",
            method.to_string().to_uppercase(),
            response.code
        ));
    }

    async fn get(
        &self,
        url: &str,
        credential: Option<&AccessToken>,
    ) -> Result<GraphResponse, GraphError> {
        let request = GraphRequest::builder(HttpMethod::Get, url)
            .bearer(self.credential(credential))
            .timeout(self.timeout)
            .build()?;
        self.send_logged(request).await
    }

    async fn send_logged(&self, request: GraphRequest) -> Result<GraphResponse, GraphError> {
        let method = request.method;
        let url = request.url.clone();
        self.http.send(request).await.map_err(|error| {
            self.report(format!(
                "{} {url} failed: {error}",
                method.to_string().to_uppercase()
            ));
            error
        })
    }

    async fn post(
        &self,
        url: String,
        data: FormData,
        credential: Option<&AccessToken>,
    ) -> PostOutcome {
        let request = match GraphRequest::builder(HttpMethod::Post, url)
            .bearer(self.credential(credential))
            .form(data)
            .timeout(self.timeout)
            .build()
        {
            Ok(request) => request,
            Err(error) => {
                self.report(format!("POST request rejected: {error}"));
                return PostOutcome::Failed;
            }
        };

        match &self.delivery {
            Delivery::Asynchronous(dispatcher) => {
                dispatcher.submit(DeferredTask::new(request));
                PostOutcome::Queued
            }
            Delivery::Synchronous => {
                let url = request.url.clone();
                match self.send_logged(request).await {
                    Ok(response) => {
                        self.report_status(HttpMethod::Post, &url, &response);
                        PostOutcome::Completed(response)
                    }
                    Err(_) => PostOutcome::Failed,
                }
            }
        }
    }
}

/// Builder for constructing [`GraphClient`] instances.
///
/// # Defaults
///
/// - `config`: [`GraphConfig::default`]
/// - `delivery`: [`Delivery::Synchronous`]
/// - `failure_log`: [`TracingFailureLog`]
#[derive(Debug)]
pub struct GraphClientBuilder {
    access_token: AccessToken,
    config: Option<GraphConfig>,
    delivery: Option<Delivery>,
    failure_log: Option<Arc<dyn FailureLog>>,
}

impl GraphClientBuilder {
    const fn new(access_token: AccessToken) -> Self {
        Self {
            access_token,
            config: None,
            delivery: None,
            failure_log: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the delivery strategy for creates, updates and log events.
    #[must_use]
    pub fn delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Sets the sink for failure messages.
    #[must_use]
    pub fn failure_log(mut self, failure_log: Arc<dyn FailureLog>) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    /// Builds the [`GraphClient`].
    #[must_use]
    pub fn build(self) -> GraphClient {
        let config = self.config.unwrap_or_default();
        let delivery = self.delivery.unwrap_or_default();
        tracing::debug!(
            asynchronous = delivery.is_asynchronous(),
            "Building Graph client"
        );

        GraphClient {
            http: HttpClient::new(&config),
            access_token: self.access_token,
            api_base: config.api_base(),
            timeout: config.timeout(),
            delivery,
            failure_log: self
                .failure_log
                .unwrap_or_else(|| Arc::new(TracingFailureLog)),
        }
    }
}
