//! Delivery strategies for outbound writes.
//!
//! A [`GraphClient`](crate::clients::GraphClient) is built with one
//! [`Delivery`]:
//!
//! - [`Delivery::Synchronous`]: the request is sent immediately and the caller
//!   waits for the response (or the timeout).
//! - [`Delivery::Asynchronous`]: the request is captured as a [`DeferredTask`]
//!   and handed to a [`BackgroundDispatcher`]; the caller gets no result.
//!
//! Only creates, updates and log events follow the configured strategy.
//! Reads, deletes, uploads and status polls always go out synchronously.
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_graph::{AccessToken, GraphClient, GraphConfig};
//! use commerce_graph::clients::Delivery;
//!
//! let config = GraphConfig::default();
//! let client = GraphClient::builder(AccessToken::new("token")?)
//!     .delivery(Delivery::background(&config))
//!     .config(config)
//!     .build();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{GraphRequest, RequestBody};
use crate::config::GraphConfig;

/// An immutable snapshot of a write request, destined for background execution.
///
/// The task owns its request; once submitted it is executed (or dropped)
/// entirely by the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredTask {
    request: GraphRequest,
}

impl DeferredTask {
    pub(crate) const fn new(request: GraphRequest) -> Self {
        Self { request }
    }

    /// The URL the request will be posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// Extra query parameters.
    #[must_use]
    pub const fn query(&self) -> &HashMap<String, String> {
        &self.request.query
    }

    /// The post body.
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.request.body
    }

    /// Request headers, `Authorization` included.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.request.headers
    }

    /// The timeout the request will be sent with.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.request.timeout
    }

    /// Consumes the task, returning the captured request.
    #[must_use]
    pub fn into_request(self) -> GraphRequest {
        self.request
    }
}

/// Executes deferred tasks outside the caller's lifetime.
///
/// `submit` must not block and offers no return channel: the caller cannot
/// observe success, failure or completion time, and no ordering between
/// submissions is guaranteed.
pub trait BackgroundDispatcher: Send + Sync + fmt::Debug {
    /// Takes ownership of a task for later execution.
    fn submit(&self, task: DeferredTask);
}

/// Dispatcher that runs each task as its own Tokio task.
///
/// Failures are reported through `tracing` and nowhere else.
#[derive(Clone, Debug)]
pub struct SpawnDispatcher {
    http: HttpClient,
    handle: Handle,
}

impl SpawnDispatcher {
    /// Creates a dispatcher spawning onto the given runtime.
    #[must_use]
    pub const fn new(http: HttpClient, handle: Handle) -> Self {
        Self { http, handle }
    }

    /// Creates a dispatcher on the current Tokio runtime, if there is one.
    #[must_use]
    pub fn try_current(http: HttpClient) -> Option<Self> {
        Handle::try_current().ok().map(|handle| Self::new(http, handle))
    }
}

impl BackgroundDispatcher for SpawnDispatcher {
    fn submit(&self, task: DeferredTask) {
        let http = self.http.clone();
        tracing::debug!(url = task.url(), "Queueing deferred Graph API request");

        self.handle.spawn(async move {
            let request = task.into_request();
            let url = request.url.clone();
            match http.send(request).await {
                Ok(response) if response.is_ok() => {
                    tracing::debug!(url = %url, "Deferred Graph API request completed");
                }
                Ok(response) => {
                    let message = response
                        .error_message()
                        .unwrap_or_else(|| response.body.clone());
                    tracing::warn!(
                        url = %url,
                        code = response.code,
                        "Deferred Graph API request failed: {message}"
                    );
                }
                Err(error) => {
                    tracing::warn!(url = %url, "Deferred Graph API request failed: {error}");
                }
            }
        });
    }
}

/// How eligible writes are sent.
#[derive(Clone, Debug, Default)]
pub enum Delivery {
    /// Send immediately and wait for the response.
    #[default]
    Synchronous,
    /// Hand a [`DeferredTask`] to the dispatcher and return at once.
    Asynchronous(Arc<dyn BackgroundDispatcher>),
}

impl Delivery {
    /// Asynchronous delivery through the given dispatcher.
    #[must_use]
    pub fn asynchronous(dispatcher: impl BackgroundDispatcher + 'static) -> Self {
        Self::Asynchronous(Arc::new(dispatcher))
    }

    /// Picks asynchronous delivery on a [`SpawnDispatcher`] when a Tokio
    /// runtime is available, synchronous delivery otherwise.
    #[must_use]
    pub fn background(config: &GraphConfig) -> Self {
        SpawnDispatcher::try_current(HttpClient::new(config)).map_or_else(
            || {
                tracing::debug!("No Tokio runtime available, using synchronous delivery");
                Self::Synchronous
            },
            Self::asynchronous,
        )
    }

    /// Returns `true` for [`Delivery::Asynchronous`].
    #[must_use]
    pub const fn is_asynchronous(&self) -> bool {
        matches!(self, Self::Asynchronous(_))
    }
}
