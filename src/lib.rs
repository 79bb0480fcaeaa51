//! # Commerce Graph API client
//!
//! A Rust client for the Facebook Graph commerce catalog endpoints, with
//! pluggable synchronous/asynchronous delivery of writes.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GraphConfig`] and [`GraphConfigBuilder`]
//! - Validated newtypes for access tokens, resource ids and hosts
//! - A uniform resource-URL builder ([`clients::build_url`])
//! - [`GraphClient`] with verb-shaped catalog operations
//! - Synchronous or background [`Delivery`] of creates, updates and log events
//! - Pixel settings logic for the admin settings page ([`settings`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use commerce_graph::{AccessToken, GraphClient, GraphConfig};
//! use commerce_graph::clients::Delivery;
//! use serde_json::json;
//!
//! let config = GraphConfig::default();
//! let client = GraphClient::builder(AccessToken::new("EAAB...")?)
//!     .delivery(Delivery::background(&config))
//!     .config(config)
//!     .build();
//!
//! // Reads always wait for the answer
//! let page = client.get_page_name("1234", None).await;
//!
//! // Writes follow the configured delivery
//! let group = json!({"retailer_id": "sku-1"}).as_object().unwrap().clone();
//! client.create_product_group("catalog-id", group).await;
//!
//! // Deletes are always synchronous and must be checked
//! let response = client.delete_product_item("item-id").await?;
//! assert!(response.is_ok());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration, credentials, stores and loggers are
//!   passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Best-effort writes, reliable reads**: write failures are logged, never
//!   returned; read failures come back as `None` or `Err`
//! - **Thread-safe**: all client types are `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;
pub mod settings;

pub use config::{
    AccessToken, GraphConfig, GraphConfigBuilder, GraphHost, GraphVersion, ResourceId,
    DEFAULT_TIMEOUT,
};
pub use error::ConfigError;

pub use clients::{
    BackgroundDispatcher, DeferredTask, Delivery, FailureLog, GraphClient, GraphClientBuilder,
    GraphError, GraphRequest, GraphResponse, HttpMethod, PostOutcome, UploadStatus,
};
