//! In-process transport
//!
//! A scripted stand-in for a remote server: every invocation is recorded and
//! answered by a handler closure. All handles built by one factory share the
//! same handler and call log, so a test can assert the exact sequence of
//! remote calls a client made across endpoints.
//!
//! # Usage
//!
//! ```
//! use bizrpc_common::transport::{MemoryTransportFactory, TransportFactory};
//! use serde_json::json;
//!
//! let factory = MemoryTransportFactory::new(|call| match call.method.as_str() {
//!     "version" => Ok(json!({"server_version": "17.0"})),
//!     _ => Ok(json!(false)),
//! });
//! let _common = factory.construct("http://erp/xmlrpc/2/common").unwrap();
//! assert_eq!(factory.constructed(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{Transport, TransportFactory};
use crate::protocol::error::Result;
use crate::protocol::RpcArgs;

/// One invocation seen by a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub method: String,
    pub args: RpcArgs,
}

impl RecordedCall {
    /// Last path segment of the URL, i.e. the endpoint name.
    pub fn endpoint(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or("")
    }
}

type Handler = dyn Fn(&RecordedCall) -> Result<Value> + Send + Sync;

struct Shared {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
    constructed: AtomicUsize,
}

impl Shared {
    fn calls(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        // a panicking handler must not hide the log from later assertions
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone)]
pub struct MemoryTransportFactory {
    shared: Arc<Shared>,
}

impl MemoryTransportFactory {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedCall) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
                constructed: AtomicUsize::new(0),
            }),
        }
    }

    /// Snapshot of every invocation so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.calls().clone()
    }

    /// Number of invocations of `method` on any endpoint.
    pub fn count(&self, method: &str) -> usize {
        self.shared.calls().iter().filter(|c| c.method == method).count()
    }

    pub fn total_calls(&self) -> usize {
        self.shared.calls().len()
    }

    /// Number of handles built so far.
    pub fn constructed(&self) -> usize {
        self.shared.constructed.load(Ordering::SeqCst)
    }
}

impl TransportFactory for MemoryTransportFactory {
    fn construct(&self, endpoint_url: &str) -> Result<Arc<dyn Transport>> {
        self.shared.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemoryTransport {
            url: endpoint_url.to_string(),
            shared: Arc::clone(&self.shared),
        }))
    }
}

pub struct MemoryTransport {
    url: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl Transport for MemoryTransport {
    fn url(&self) -> &str {
        &self.url
    }

    async fn invoke(&self, method: &str, args: RpcArgs) -> Result<Value> {
        let call = RecordedCall {
            url: self.url.clone(),
            method: method.to_string(),
            args,
        };
        self.shared.calls().push(call.clone());
        (self.shared.handler)(&call)
    }
}
