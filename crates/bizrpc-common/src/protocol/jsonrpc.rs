//! JSON-RPC 2.0 Envelope
//!
//! The bundled HTTP transport wraps each invocation in a JSON-RPC 2.0
//! request. Positional arguments always travel as a `params` array.
//!
//! - Request format: `{"jsonrpc": "2.0", "method": "...", "params": [...], "id": ...}`
//! - Response format: `{"jsonrpc": "2.0", "result": ..., "error": ..., "id": ...}`
//! - Error format: `{"code": ..., "message": "...", "data": ...}`
//!
//! A JSON-RPC `error` object is a transport-level failure and is surfaced as
//! [`BizrpcError::Rpc`]. In-band faults travel inside `result` and are left to
//! the [`classifier`](super::classifier).
//!
//! # Example
//!
//! ```
//! use bizrpc_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::call("version", vec![]);
//! assert_eq!(request.params, json!([]));
//!
//! let response = JsonRpcResponse::success(request.id.clone(), json!({"server_version": "17.0"}));
//! assert!(response.into_result().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{BizrpcError, Result};
use super::requests::{next_request_id, RpcArgs};

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Name of the remote method
    pub method: String,
    /// Positional parameters
    pub params: Value,
    /// Request identifier
    pub id: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Result value; a remote method may legitimately return `null`
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Invalid JSON was received by the server
pub const PARSE_ERROR: i64 = -32700;
/// The method does not exist / is not available
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Internal JSON-RPC error
pub const INTERNAL_ERROR: i64 = -32603;

impl JsonRpcRequest {
    /// Builds a request with a fresh id.
    pub fn call(method: impl Into<String>, params: RpcArgs) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params: Value::Array(params),
            id: Value::from(next_request_id()),
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result,
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result: Value::Null,
            error: Some(error),
            id,
        }
    }

    /// Splits the envelope into the decoded value or a transport-level error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(BizrpcError::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found")
    }

    pub fn internal_error(msg: &str) -> Self {
        Self::new(INTERNAL_ERROR, msg)
    }
}
