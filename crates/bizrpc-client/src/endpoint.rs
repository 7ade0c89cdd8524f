//! Endpoint Registry
//!
//! Each remote service lives at its own sub-address of the API URL:
//!
//! ```text
//! https://erp.example.com/xmlrpc/2/common   authentication, version
//! https://erp.example.com/xmlrpc/2/db       database administration
//! https://erp.example.com/xmlrpc/2/object   model method invocation
//! ```
//!
//! The registry builds one transport handle per endpoint name on first use
//! and hands out the same `Arc` afterwards. It also remembers which endpoint
//! was touched last, for diagnostics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bizrpc_common::protocol::error::{BizrpcError, Result};
use bizrpc_common::protocol::RpcArgs;
use bizrpc_common::transport::{Transport, TransportFactory};
use serde_json::Value;

use crate::config::trim_separators;

pub const ENDPOINT_COMMON: &str = "common";
pub const ENDPOINT_DB: &str = "db";
pub const ENDPOINT_OBJECT: &str = "object";

/// The service an endpoint name refers to, resolved once per handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Authentication and server introspection
    Common,
    /// Database administration
    Db,
    /// Model method invocation, requires a session id
    Object,
    /// Any other name, passed through uninterpreted
    Other(String),
}

impl EndpointKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            ENDPOINT_COMMON => EndpointKind::Common,
            ENDPOINT_DB => EndpointKind::Db,
            ENDPOINT_OBJECT => EndpointKind::Object,
            other => EndpointKind::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EndpointKind::Common => ENDPOINT_COMMON,
            EndpointKind::Db => ENDPOINT_DB,
            EndpointKind::Object => ENDPOINT_OBJECT,
            EndpointKind::Other(name) => name,
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, EndpointKind::Object)
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transport handle bound to one endpoint.
pub struct EndpointHandle {
    kind: EndpointKind,
    url: String,
    transport: Arc<dyn Transport>,
}

impl EndpointHandle {
    pub fn kind(&self) -> &EndpointKind {
        &self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn invoke(&self, method: &str, args: RpcArgs) -> Result<Value> {
        tracing::debug!(endpoint = %self.kind, method, argc = args.len(), "invoking remote method");
        self.transport.invoke(method, args).await
    }
}

impl fmt::Debug for EndpointHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHandle")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Per-session cache of endpoint handles.
pub struct EndpointRegistry {
    api_url: String,
    factory: Arc<dyn TransportFactory>,
    handles: HashMap<String, Arc<EndpointHandle>>,
    current: Option<String>,
}

impl EndpointRegistry {
    pub fn new(api_url: impl Into<String>, factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            api_url: api_url.into(),
            factory,
            handles: HashMap::new(),
            current: None,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the cached handle for `name`, building it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error unchanged (typically `Configuration`).
    pub fn get_endpoint(&mut self, name: &str) -> Result<Arc<EndpointHandle>> {
        let name = trim_separators(name);

        let handle = match self.handles.get(name) {
            Some(handle) => {
                tracing::debug!(endpoint = name, "endpoint cache hit");
                Arc::clone(handle)
            }
            None => {
                let url = format!("{}/{}", trim_separators(&self.api_url), name);
                let transport = self.factory.construct(&url)?;
                tracing::debug!(endpoint = name, url = %url, "created endpoint handle");

                let handle = Arc::new(EndpointHandle {
                    kind: EndpointKind::from_name(name),
                    url,
                    transport,
                });
                self.handles.insert(name.to_string(), Arc::clone(&handle));
                handle
            }
        };

        self.current = Some(name.to_string());
        Ok(handle)
    }

    /// Name of the endpoint most recently resolved.
    pub fn current_endpoint(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Handle of the endpoint most recently resolved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` before the first resolution.
    pub fn current_handle(&self) -> Result<Arc<EndpointHandle>> {
        self.current
            .as_ref()
            .and_then(|name| self.handles.get(name))
            .cloned()
            .ok_or_else(|| {
                BizrpcError::InvalidState(
                    "Need to make a first call before getting the current endpoint".into(),
                )
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(trim_separators(name))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl fmt::Debug for EndpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRegistry")
            .field("api_url", &self.api_url)
            .field("endpoints", &self.handles.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizrpc_common::transport::MemoryTransportFactory;
    use serde_json::json;

    fn registry() -> (EndpointRegistry, MemoryTransportFactory) {
        let factory = MemoryTransportFactory::new(|_| Ok(json!(null)));
        let registry = EndpointRegistry::new("https://host/xmlrpc/2", Arc::new(factory.clone()));
        (registry, factory)
    }

    struct RejectingFactory;

    impl TransportFactory for RejectingFactory {
        fn construct(&self, endpoint_url: &str) -> Result<Arc<dyn Transport>> {
            Err(BizrpcError::Configuration(format!("bad url {}", endpoint_url)))
        }
    }

    #[test]
    fn test_same_name_returns_same_handle() {
        let (mut registry, factory) = registry();

        let first = registry.get_endpoint("common").unwrap();
        let second = registry.get_endpoint("common").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.constructed(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_names_return_different_handles() {
        let (mut registry, factory) = registry();

        let common = registry.get_endpoint("common").unwrap();
        let object = registry.get_endpoint("object").unwrap();

        assert!(!Arc::ptr_eq(&common, &object));
        assert_eq!(factory.constructed(), 2);
    }

    #[test]
    fn test_names_are_normalized() {
        let (mut registry, factory) = registry();

        let plain = registry.get_endpoint("object").unwrap();
        let padded = registry.get_endpoint(" /object/ ").unwrap();

        assert!(Arc::ptr_eq(&plain, &padded));
        assert_eq!(factory.constructed(), 1);
        assert!(registry.contains("/object"));
    }

    #[test]
    fn test_handle_url_and_kind() {
        let (mut registry, _) = registry();

        let db = registry.get_endpoint("db").unwrap();
        assert_eq!(db.url(), "https://host/xmlrpc/2/db");
        assert_eq!(db.kind(), &EndpointKind::Db);

        let report = registry.get_endpoint("report").unwrap();
        assert_eq!(report.kind(), &EndpointKind::Other("report".into()));
        assert_eq!(report.kind().name(), "report");
    }

    #[test]
    fn test_current_endpoint_tracks_last_lookup() {
        let (mut registry, _) = registry();
        assert_eq!(registry.current_endpoint(), None);
        assert!(matches!(registry.current_handle(), Err(BizrpcError::InvalidState(_))));

        registry.get_endpoint("common").unwrap();
        registry.get_endpoint("object").unwrap();
        assert_eq!(registry.current_endpoint(), Some("object"));

        registry.get_endpoint("common").unwrap();
        assert_eq!(registry.current_endpoint(), Some("common"));
        assert_eq!(registry.current_handle().unwrap().kind(), &EndpointKind::Common);
    }

    #[test]
    fn test_construction_failure_propagates() {
        let mut registry = EndpointRegistry::new("https://host/xmlrpc/2", Arc::new(RejectingFactory));

        let err = registry.get_endpoint("common").unwrap_err();
        assert!(matches!(err, BizrpcError::Configuration(ref msg) if msg.contains("/common")));
        assert!(registry.is_empty());
        assert_eq!(registry.current_endpoint(), None);
    }

    #[test]
    fn test_endpoint_kind_round_trip() {
        for name in [ENDPOINT_COMMON, ENDPOINT_DB, ENDPOINT_OBJECT] {
            assert_eq!(EndpointKind::from_name(name).name(), name);
        }
        assert!(EndpointKind::Object.requires_session());
        assert!(!EndpointKind::Common.requires_session());
        assert!(!EndpointKind::Db.requires_session());
    }

    #[tokio::test]
    async fn test_handle_invokes_transport() {
        let (mut registry, factory) = registry();

        let common = registry.get_endpoint("common").unwrap();
        common.invoke("version", vec![]).await.unwrap();

        let calls = factory.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://host/xmlrpc/2/common");
        assert_eq!(calls[0].method, "version");
    }
}
