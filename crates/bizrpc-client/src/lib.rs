//! bizrpc Client
//!
//! A session-aware facade over a business-application server that exposes
//! several RPC services (`common`, `db`, `object`) behind one address.
//!
//! The client takes care of three things callers would otherwise repeat at
//! every call site:
//!
//! - building and caching one transport handle per service endpoint
//! - logging in lazily and reusing the session id on every model call
//! - turning in-band fault payloads into typed errors
//!
//! # Example
//!
//! ```no_run
//! use bizrpc_client::{ClientConfig, RpcClient, SearchOptions};
//! use serde_json::json;
//!
//! # async fn run() -> bizrpc_common::Result<()> {
//! let config = ClientConfig::authenticated("https://erp.example.com", "prod", "admin", "secret");
//! let mut client = RpcClient::connect(config)?;
//!
//! let ids = client
//!     .search("res.partner", json!([["is_company", "=", true]]), SearchOptions::default())
//!     .await?;
//! let partners = client.read("res.partner", &[7, 9], &["name", "email"], None).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod model;
pub mod session;

pub use client::RpcClient;
pub use config::{ClientConfig, DEFAULT_API_PATH};
pub use credentials::Credentials;
pub use endpoint::{EndpointHandle, EndpointKind, EndpointRegistry};
pub use model::{SearchOptions, DEFAULT_SEARCH_LIMIT};
pub use session::SessionInfo;
