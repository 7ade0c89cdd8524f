//! bizrpc Transport Layer
//!
//! The client never talks to the network directly. It consumes two seams:
//!
//! - **[`TransportFactory`]**: builds a handle bound to one endpoint URL
//! - **[`Transport`]**: invokes a remote method with positional arguments and
//!   returns the decoded value, or a transport-level error
//!
//! In-band faults are *not* a transport concern: a transport returns them as
//! ordinary values and the client classifies them.
//!
//! # Components
//!
//! - **[`HttpTransport`]** / **[`HttpTransportFactory`]**: JSON-RPC 2.0 over HTTP (reqwest)
//! - **[`MemoryTransport`]** / **[`MemoryTransportFactory`]**: scripted in-process transport
//! - **[`JsonCodec`]**: encode/decode of the JSON-RPC envelope
//!
//! # Example
//!
//! ```no_run
//! use bizrpc_common::transport::{HttpTransportFactory, Transport, TransportFactory};
//!
//! # async fn run() -> bizrpc_common::Result<()> {
//! let factory = HttpTransportFactory::new()?;
//! let common = factory.construct("https://erp.example.com/xmlrpc/2/common")?;
//! let version = common.invoke("version", vec![]).await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::protocol::error::Result;
use crate::protocol::RpcArgs;

pub use codec::JsonCodec;
pub use http::{HttpTransport, HttpTransportConfig, HttpTransportFactory};
pub use memory::{MemoryTransport, MemoryTransportFactory, RecordedCall};

/// A handle bound to one remote endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Full address this handle talks to.
    fn url(&self) -> &str;

    /// Invokes `method` with `args`.
    ///
    /// Returns the decoded value, including in-band error payloads. Errors are
    /// reserved for network and protocol failures.
    async fn invoke(&self, method: &str, args: RpcArgs) -> Result<Value>;
}

/// Builds transport handles for endpoint URLs.
pub trait TransportFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns `Configuration` if `endpoint_url` cannot be used.
    fn construct(&self, endpoint_url: &str) -> Result<Arc<dyn Transport>>;
}
