//! Client types for Graph API communication.
//!
//! # Overview
//!
//! - [`GraphClient`]: verb-shaped catalog operations (fetch, create, update,
//!   delete, upload, log)
//! - [`build_url`]: pure `base + id + suffix` URL construction
//! - [`Delivery`]: synchronous or asynchronous delivery of writes
//! - [`BackgroundDispatcher`] / [`SpawnDispatcher`]: executors for [`DeferredTask`]s
//! - [`HttpClient`]: the reqwest transport shared by both delivery paths
//! - [`GraphRequest`] / [`GraphResponse`]: a single request and its raw response
//! - [`FailureLog`]: where swallowed failures are reported
//! - [`GraphError`]: transport, status, parse and file errors
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
//!
//! // Read: waits for the response
//! let name = client.get_page_name("1234", None).await;
//!
//! // Write: queued for background delivery, no result
//! client.update_product_item("5678", data).await;
//! ```
//!
//! # Retry Behavior
//!
//! None. Every request is attempted once with the configured timeout;
//! callers polling [`GraphClient::get_upload_status`] choose their own cadence.

mod delivery;
mod errors;
mod failure_log;
mod graph_client;
mod http_client;
mod http_request;
mod http_response;
pub mod url;

pub use delivery::{BackgroundDispatcher, DeferredTask, Delivery, SpawnDispatcher};
pub use errors::{GraphError, GraphStatusError, InvalidGraphRequestError};
pub use failure_log::{FailureLog, TracingFailureLog};
pub use graph_client::{GraphClient, GraphClientBuilder, PostOutcome};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    form_fields, FilePart, FormData, GraphRequest, GraphRequestBuilder, HttpMethod, RequestBody,
    ACCESS_TOKEN_PARAM,
};
pub use http_response::{GraphResponse, UploadStatus};
pub use url::build_url;
