//! Model convenience methods
//!
//! Thin wrappers over [`RpcClient::call`] for the common ORM methods. Each one
//! only decides which arguments travel positionally and which travel as
//! named arguments:
//!
//! | method | positional | named |
//! | --- | --- | --- |
//! | `search` | `[criteria]` | `offset`, `limit`, `order`, `context` |
//! | `search_count` | `[criteria]` | `context` |
//! | `read` | `[ids]` | `fields`, `context` |
//! | `search_read` | `[criteria]` | `fields`, `offset`, `limit`, `order`, `context` |
//! | `fields_get` | `[fields]` | `attributes` |
//! | `create` | `[data]` | `context` |
//! | `write` | `[ids, data]` | `context` |
//! | `unlink` | `[ids]` | `context` |
//! | `check_access_rights` | `[permission]` | `raise_exception` |
//!
//! `context` is only sent when non-empty.

use bizrpc_common::protocol::error::Result;
use bizrpc_common::protocol::{truthy, KwArgs};
use serde_json::{json, Value};

use crate::client::RpcClient;

/// Default page size of `search` and `search_read`.
pub const DEFAULT_SEARCH_LIMIT: u64 = 100;

pub const OPERATION_CREATE: &str = "create";
pub const OPERATION_WRITE: &str = "write";
pub const OPERATION_READ: &str = "read";
pub const OPERATION_UNLINK: &str = "unlink";

/// Pagination, ordering and context of a search.
///
/// A `limit` of 0 asks the server for every match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub offset: u64,
    pub limit: u64,
    pub order: String,
    pub context: KwArgs,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_SEARCH_LIMIT,
            order: String::new(),
            context: KwArgs::new(),
        }
    }
}

impl SearchOptions {
    pub fn unlimited() -> Self {
        Self {
            limit: 0,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn with_context(mut self, context: KwArgs) -> Self {
        self.context = context;
        self
    }

    fn apply(self, kwargs: &mut KwArgs) {
        kwargs.insert("offset".into(), json!(self.offset));
        kwargs.insert("limit".into(), json!(self.limit));
        kwargs.insert("order".into(), json!(self.order));
        insert_context(kwargs, Some(self.context));
    }
}

fn insert_context(kwargs: &mut KwArgs, context: Option<KwArgs>) {
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        kwargs.insert("context".into(), Value::Object(context));
    }
}

// An empty named map is not sent at all.
fn named(kwargs: KwArgs) -> Option<KwArgs> {
    if kwargs.is_empty() {
        None
    } else {
        Some(kwargs)
    }
}

fn context_only(context: Option<KwArgs>) -> Option<KwArgs> {
    let mut kwargs = KwArgs::new();
    insert_context(&mut kwargs, context);
    named(kwargs)
}

impl RpcClient {
    /// Ids of the records of `model` matching `criteria`.
    ///
    /// `criteria` is a domain, e.g. `json!([["is_company", "=", true]])`.
    pub async fn search(&mut self, model: &str, criteria: Value, options: SearchOptions) -> Result<Value> {
        let mut kwargs = KwArgs::new();
        options.apply(&mut kwargs);
        self.call(model, "search", vec![criteria], Some(kwargs)).await
    }

    pub async fn search_count(&mut self, model: &str, criteria: Value, context: Option<KwArgs>) -> Result<Value> {
        self.call(model, "search_count", vec![criteria], context_only(context)).await
    }

    /// Reads `fields` of the records `ids`; an empty field list reads all fields.
    pub async fn read(
        &mut self,
        model: &str,
        ids: &[i64],
        fields: &[&str],
        context: Option<KwArgs>,
    ) -> Result<Value> {
        let mut kwargs = KwArgs::new();
        kwargs.insert("fields".into(), json!(fields));
        insert_context(&mut kwargs, context);
        self.call(model, "read", vec![json!(ids)], Some(kwargs)).await
    }

    pub async fn search_read(
        &mut self,
        model: &str,
        criteria: Value,
        fields: &[&str],
        options: SearchOptions,
    ) -> Result<Value> {
        let mut kwargs = KwArgs::new();
        kwargs.insert("fields".into(), json!(fields));
        options.apply(&mut kwargs);
        self.call(model, "search_read", vec![criteria], Some(kwargs)).await
    }

    /// Field definitions of `model`, restricted to `fields` when non-empty.
    pub async fn fields_get(&mut self, model: &str, fields: &[&str], attributes: &[&str]) -> Result<Value> {
        let args = if fields.is_empty() { vec![] } else { vec![json!(fields)] };

        let mut kwargs = KwArgs::new();
        kwargs.insert("attributes".into(), json!(attributes));
        self.call(model, "fields_get", args, Some(kwargs)).await
    }

    /// Creates one record and returns its id.
    pub async fn create(&mut self, model: &str, data: KwArgs, context: Option<KwArgs>) -> Result<Value> {
        self.call(model, "create", vec![Value::Object(data)], context_only(context))
            .await
    }

    pub async fn write(
        &mut self,
        model: &str,
        ids: &[i64],
        data: KwArgs,
        context: Option<KwArgs>,
    ) -> Result<Value> {
        self.call(model, "write", vec![json!(ids), Value::Object(data)], context_only(context))
            .await
    }

    pub async fn unlink(&mut self, model: &str, ids: &[i64], context: Option<KwArgs>) -> Result<Value> {
        self.call(model, "unlink", vec![json!(ids)], context_only(context)).await
    }

    /// Whether the current user may perform `permission` on `model`.
    ///
    /// Never fails: any error, local or remote, reads as `false`.
    pub async fn check_access_rights(&mut self, model: &str, permission: &str, raise_exception: bool) -> bool {
        let mut kwargs = KwArgs::new();
        kwargs.insert("raise_exception".into(), json!(raise_exception));

        match self
            .call(model, "check_access_rights", vec![json!(permission)], Some(kwargs))
            .await
        {
            Ok(raw) => truthy(&raw),
            Err(e) => {
                tracing::debug!(model, permission, error = %e, "access check failed");
                false
            }
        }
    }
}
