use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

pub type RequestId = u64;
pub type MethodName = String;
/// Positional argument list of one invocation.
pub type RpcArgs = Vec<Value>;
/// Named argument map of one invocation.
pub type KwArgs = Map<String, Value>;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide increasing envelope id, starting at 1.
pub fn next_request_id() -> RequestId {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Builds a [`KwArgs`] map from key/value pairs.
///
/// ```
/// use bizrpc_common::protocol::kwargs;
/// use serde_json::json;
///
/// let kw = kwargs([("limit", json!(10)), ("order", json!("name"))]);
/// assert_eq!(kw.len(), 2);
/// ```
pub fn kwargs<K, I>(pairs: I) -> KwArgs
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
