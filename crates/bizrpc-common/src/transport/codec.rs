use crate::protocol::error::{BizrpcError, Result};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// JSON codec for the JSON-RPC envelope
///
/// Requests encode through `serde_json`. Response bodies that fail to decode
/// are reported as [`BizrpcError::InvalidResponse`], since they mean the
/// remote did not speak the expected protocol.
///
/// # Example
///
/// ```
/// use bizrpc_common::transport::JsonCodec;
/// use bizrpc_common::protocol::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::call("version", vec![]);
/// let encoded = JsonCodec::encode_request(&request).unwrap();
///
/// let body = br#"{"jsonrpc":"2.0","result":{"server_version":"17.0"},"id":1}"#;
/// let response = JsonCodec::decode_response(body).unwrap();
/// assert_eq!(response.result["server_version"], json!("17.0"));
/// ```
pub struct JsonCodec;

impl JsonCodec {
    pub fn encode_request(request: &JsonRpcRequest) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(request)?)
    }

    pub fn decode_request(data: &[u8]) -> Result<JsonRpcRequest> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn encode_response(response: &JsonRpcResponse) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(response)?)
    }

    /// Decode a response body
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` if the body is not a JSON-RPC response
    pub fn decode_response(data: &[u8]) -> Result<JsonRpcResponse> {
        serde_json::from_slice(data).map_err(|e| {
            BizrpcError::InvalidResponse(format!("Malformed JSON-RPC response: {}", e))
        })
    }
}
