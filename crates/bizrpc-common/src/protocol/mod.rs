pub mod classifier;
pub mod error;
pub mod jsonrpc;
pub mod requests;


pub use classifier::{is_success, response_entry, truthy, validate};
pub use error::{BizrpcError, Result};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use requests::{kwargs, next_request_id, KwArgs, MethodName, RequestId, RpcArgs};
