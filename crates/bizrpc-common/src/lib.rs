//! bizrpc Common Types and Transport
//!
//! This crate provides the protocol definitions, the in-band error taxonomy
//! and the transport seam shared by the bizrpc client.
//!
//! # Overview
//!
//! The remote business server exposes several independent services
//! (`common`, `db`, `object`) under one address. Each reply is either a
//! decoded value or, inside an otherwise successful reply, a declared fault.
//! This crate contains:
//!
//! - **Protocol Layer**: error types, the response classifier, JSON-RPC envelope
//! - **Transport Layer**: the [`Transport`](transport::Transport) and
//!   [`TransportFactory`](transport::TransportFactory) traits plus HTTP and
//!   in-memory implementations
//!
//! # Components
//!
//! - [`protocol`] - Error taxonomy, classifier, request/argument types
//! - [`transport`] - Transport traits, HTTP transport, in-memory transport
//!
//! # Example
//!
//! ```
//! use bizrpc_common::{validate, BizrpcError};
//! use serde_json::json;
//!
//! let ids = validate(json!([7, 9])).unwrap();
//! assert_eq!(ids, json!([7, 9]));
//!
//! let err = validate(json!({"faultCode": 2, "faultString": "Access Denied"})).unwrap_err();
//! assert!(matches!(err, BizrpcError::RemoteFault { .. }));
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
