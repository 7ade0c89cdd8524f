use std::sync::Arc;

use bizrpc_common::protocol::error::{BizrpcError, Result};
use bizrpc_common::protocol::{validate, KwArgs, RpcArgs};
use bizrpc_common::transport::{HttpTransportFactory, TransportFactory};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::endpoint::{EndpointHandle, EndpointRegistry, ENDPOINT_COMMON, ENDPOINT_DB, ENDPOINT_OBJECT};
use crate::session::SessionInfo;

/// Session-aware client for a multi-service business RPC server
///
/// One `RpcClient` is one logical connection: it owns the endpoint handle
/// cache and the session id. Model calls authenticate lazily on first use and
/// reuse the session id until [`uid(true)`](Self::uid) forces a new login.
///
/// Methods take `&mut self`; share a client between tasks behind a lock, or
/// build one per task.
///
/// Every reply passes through the response classifier, so in-band faults
/// surface as [`BizrpcError::RemoteFault`] / [`BizrpcError::RemoteStatus`].
pub struct RpcClient {
    credentials: Credentials,
    registry: EndpointRegistry,
    session_id: Option<i64>,
    info: SessionInfo,
}

impl RpcClient {
    /// Create a client that builds its endpoint handles with `factory`.
    pub fn new<F>(config: ClientConfig, factory: F) -> Self
    where
        F: TransportFactory + 'static,
    {
        Self::with_factory(config, Arc::new(factory))
    }

    pub fn with_factory(config: ClientConfig, factory: Arc<dyn TransportFactory>) -> Self {
        let info = SessionInfo::new(config.normalized_api_path());
        let registry = EndpointRegistry::new(config.api_url(), factory);
        let credentials = config.credentials();

        tracing::debug!(
            api_url = registry.api_url(),
            instance = info.instance_id(),
            credentials = %credentials,
            "created RPC client"
        );

        Self {
            credentials,
            registry,
            session_id: None,
            info,
        }
    }

    /// Create a client speaking JSON-RPC 2.0 over HTTP.
    ///
    /// The bundled transport encodes every call as a JSON-RPC envelope posted
    /// to `<base_url>/<api_path>/<endpoint>`. Servers that only answer
    /// XML-RPC on the default `xmlrpc/2` path need a [`TransportFactory`]
    /// of their own, passed to [`RpcClient::new`]; JSON-RPC gateways are
    /// reached by pointing [`ClientConfig::with_api_path`] at them.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let factory = HttpTransportFactory::with_config(config.transport.clone())?;
        Ok(Self::new(config, factory))
    }

    pub fn api_url(&self) -> &str {
        self.registry.api_url()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.info.created_at()
    }

    pub fn created_at_string(&self) -> String {
        self.info.created_at_string()
    }

    pub fn instance_id(&self) -> &str {
        self.info.instance_id()
    }

    /// Name of the endpoint talked to most recently.
    pub fn current_endpoint(&self) -> Option<&str> {
        self.registry.current_endpoint()
    }

    pub fn current_handle(&self) -> Result<Arc<EndpointHandle>> {
        self.registry.current_handle()
    }

    /// Cached handle for `name`, built on first use.
    pub fn endpoint(&mut self, name: &str) -> Result<Arc<EndpointHandle>> {
        self.registry.get_endpoint(name)
    }

    /// Cached session id, without authenticating.
    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    /// Returns the session id, authenticating first if needed.
    ///
    /// `force_reset` discards the cached id and logs in again.
    ///
    /// # Errors
    ///
    /// - `Auth` when credentials are missing (no remote call is made) or the
    ///   remote rejects them
    /// - `RemoteFault` / `RemoteStatus` when the rejection carries a declared fault
    /// - transport errors unchanged
    pub async fn uid(&mut self, force_reset: bool) -> Result<i64> {
        if force_reset {
            self.session_id = None;
        }
        if let Some(uid) = self.session_id {
            return Ok(uid);
        }

        let (database, username, password) = self
            .credentials
            .complete()
            .ok_or_else(|| BizrpcError::Auth("credentials missing".into()))?;
        let args = vec![json!(database), json!(username), json!(password), json!({})];

        let common = self.registry.get_endpoint(ENDPOINT_COMMON)?;
        let raw = common.invoke("authenticate", args).await?;

        match raw.as_i64() {
            Some(uid) => {
                tracing::info!(uid, database, username, "authenticated");
                self.session_id = Some(uid);
                Ok(uid)
            }
            None => {
                tracing::warn!(database, username, "authentication rejected");
                validate(raw)?;
                Err(BizrpcError::Auth("unsuccessful authentication".into()))
            }
        }
    }

    /// Non-failing login probe.
    pub async fn try_authenticate(&mut self, force_reset: bool) -> bool {
        match self.uid(force_reset).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "authentication probe failed");
                false
            }
        }
    }

    /// Invokes `method` on `model` through `execute_kw`.
    ///
    /// The remote receives `(database, uid, password, model, method, args)`,
    /// followed by `kwargs` when given.
    pub async fn call(
        &mut self,
        model: &str,
        method: &str,
        args: RpcArgs,
        kwargs: Option<KwArgs>,
    ) -> Result<Value> {
        let mut params = self.model_params(model, method).await?;
        params.push(Value::Array(args));
        if let Some(kwargs) = kwargs {
            params.push(Value::Object(kwargs));
        }

        self.invoke_on(ENDPOINT_OBJECT, "execute_kw", params).await
    }

    /// Invokes `method` on `model` through `execute`, spreading `args` as
    /// individual positional parameters.
    pub async fn execute(&mut self, model: &str, method: &str, args: RpcArgs) -> Result<Value> {
        let mut params = self.model_params(model, method).await?;
        params.extend(args);

        self.invoke_on(ENDPOINT_OBJECT, "execute", params).await
    }

    // Authenticates before `object` is resolved; `object` ends up current.
    async fn model_params(&mut self, model: &str, method: &str) -> Result<RpcArgs> {
        let uid = self.uid(false).await?;
        let (database, _, password) = self
            .credentials
            .complete()
            .ok_or_else(|| BizrpcError::Auth("credentials missing".into()))?;

        Ok(vec![
            json!(database),
            json!(uid),
            json!(password),
            json!(model),
            json!(method),
        ])
    }

    /// Invokes `method` on endpoint `name` and classifies the reply.
    ///
    /// # Errors
    ///
    /// Returns `Auth` without contacting the server when `name` is an
    /// endpoint that needs a session and the client has no credentials.
    pub async fn invoke_on(&mut self, name: &str, method: &str, args: RpcArgs) -> Result<Value> {
        let handle = self.registry.get_endpoint(name)?;
        if handle.kind().requires_session() && !self.credentials.is_complete() {
            return Err(BizrpcError::Auth("credentials missing".into()));
        }
        let raw = handle.invoke(method, args).await?;
        validate(raw)
    }

    /// Server version information (`common.version`), no session required.
    pub async fn version(&mut self) -> Result<Value> {
        self.invoke_on(ENDPOINT_COMMON, "version", vec![]).await
    }

    pub async fn server_version(&mut self) -> Result<Value> {
        self.invoke_on(ENDPOINT_DB, "server_version", vec![]).await
    }

    pub async fn db_exist(&mut self, db_name: &str) -> Result<bool> {
        let raw = self.invoke_on(ENDPOINT_DB, "db_exist", vec![json!(db_name)]).await?;
        Ok(bizrpc_common::truthy(&raw))
    }

    /// Lists databases; `document` is forwarded to the remote `list` method.
    pub async fn list_dbs(&mut self, document: bool) -> Result<Value> {
        self.invoke_on(ENDPOINT_DB, "list", vec![json!(document)]).await
    }

    pub async fn list_lang(&mut self) -> Result<Value> {
        self.invoke_on(ENDPOINT_DB, "list_lang", vec![]).await
    }

    pub async fn list_countries(&mut self) -> Result<Value> {
        self.invoke_on(ENDPOINT_DB, "list_countries", vec![]).await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("instance_id", &self.info.instance_id())
            .field("credentials", &self.credentials)
            .field("session_id", &self.session_id)
            .field("registry", &self.registry)
            .finish()
    }
}
