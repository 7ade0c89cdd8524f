//! HTTP Client Integration Tests
//!
//! These tests run the client against a real HTTP server speaking JSON-RPC
//! 2.0 and verify:
//! - endpoint URLs (`/xmlrpc/2/common`, `/xmlrpc/2/db`, `/xmlrpc/2/object`)
//! - login followed by model calls with the expected arguments
//! - in-band faults inside a successful reply
//! - transport-level failures (JSON-RPC errors, HTTP statuses, bad bodies)
//!
//! All servers bind to `127.0.0.1:0` and are shut down on drop.

use bizrpc_client::{ClientConfig, RpcClient, SearchOptions};
use bizrpc_common::protocol::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use bizrpc_common::BizrpcError;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Routes client logs to the test harness; set `RUST_LOG=debug` to see them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fake business server that runs on a separate task
struct TestServer {
    addr: String,
    logins: Arc<AtomicUsize>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Starts a new test server on a random port
    async fn new() -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let logins = Arc::new(AtomicUsize::new(0));

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
        let counter = Arc::clone(&logins);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let counter = Arc::clone(&counter);

                                tokio::spawn(async move {
                                    let service = service_fn(move |req| {
                                        let counter = Arc::clone(&counter);
                                        async move { Self::handle(req, counter).await }
                                    });

                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        eprintln!("Server error: {}", err);
                                    }
                                });
                            }
                            Err(err) => {
                                eprintln!("Accept error: {}", err);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            logins,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    async fn handle(
        req: Request<Incoming>,
        logins: Arc<AtomicUsize>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let path = req.uri().path().to_string();
        let whole_body = req.into_body().collect().await?.to_bytes();

        if path.ends_with("/broken") {
            return Ok(Self::reply(StatusCode::INTERNAL_SERVER_ERROR, Bytes::from("boom")));
        }
        if path.ends_with("/garbage") {
            return Ok(Self::reply(StatusCode::OK, Bytes::from("<html>not json</html>")));
        }

        let request: JsonRpcRequest = match serde_json::from_slice(&whole_body) {
            Ok(request) => request,
            Err(_) => {
                let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error());
                return Ok(Self::reply(
                    StatusCode::OK,
                    Bytes::from(serde_json::to_vec(&response).unwrap()),
                ));
            }
        };
        let params = request.params.as_array().cloned().unwrap_or_default();
        let endpoint = path.rsplit('/').next().unwrap_or("").to_string();

        let outcome = match (endpoint.as_str(), request.method.as_str()) {
            ("common", "version") => Ok(json!({"server_version": "17.0", "protocol_version": 1})),
            ("common", "authenticate") => {
                logins.fetch_add(1, Ordering::SeqCst);
                if params.get(2) == Some(&json!("p")) {
                    Ok(json!(2))
                } else {
                    Ok(json!(false))
                }
            }
            ("db", "list") => Ok(json!({"faultCode": 3, "faultString": "Access Denied"})),
            // echo the model call back so tests can inspect what was sent
            ("object", "execute_kw") => Ok(match params.get(4).and_then(Value::as_str) {
                Some("search") => json!([1]),
                _ => Value::Array(params),
            }),
            _ => Err(JsonRpcError::method_not_found()),
        };

        let response = match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::error(request.id, error),
        };
        Ok(Self::reply(
            StatusCode::OK,
            Bytes::from(serde_json::to_vec(&response).unwrap()),
        ))
    }

    fn reply(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(body))
            .unwrap()
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn authenticated(server: &TestServer, password: &str) -> RpcClient {
    let config = ClientConfig::authenticated(server.base_url(), "d", "u", password).with_timeout_ms(5000);
    RpcClient::connect(config).unwrap()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[tokio::test]
async fn test_version_over_http() {
    let server = TestServer::new().await;
    let mut client = RpcClient::connect(ClientConfig::anonymous(server.base_url())).unwrap();

    let version = client.version().await.unwrap();
    assert_eq!(version["server_version"], json!("17.0"));
    assert_eq!(server.logins(), 0);
}

#[tokio::test]
async fn test_custom_api_path_over_http() {
    let server = TestServer::new().await;
    let config = ClientConfig::anonymous(server.base_url()).with_api_path(Some("/jsonrpc/"));
    let mut client = RpcClient::connect(config).unwrap();

    assert_eq!(client.api_url(), format!("{}/jsonrpc", server.base_url()));
    let version = client.version().await.unwrap();
    assert_eq!(version["protocol_version"], json!(1));
}

#[tokio::test]
async fn test_search_over_http() {
    let server = TestServer::new().await;
    let mut client = authenticated(&server, "p");

    let ids = client
        .search("res.partner", json!([["id", "=", 1]]), SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(ids, json!([1]));
    assert_eq!(server.logins(), 1);
    assert_eq!(client.session_id(), Some(2));
}

#[tokio::test]
async fn test_model_call_arguments_over_http() {
    let server = TestServer::new().await;
    let mut client = authenticated(&server, "p");

    let echoed = client
        .read("res.partner", &[7], &["name"], None)
        .await
        .unwrap();

    assert_eq!(
        echoed,
        json!(["d", 2, "p", "res.partner", "read", [[7]], {"fields": ["name"]}])
    );

    client.read("res.partner", &[8], &[], None).await.unwrap();
    assert_eq!(server.logins(), 1);
}

#[tokio::test]
async fn test_rejected_login_over_http() {
    let server = TestServer::new().await;
    let mut client = authenticated(&server, "wrong");

    let err = client.uid(false).await.unwrap_err();
    assert!(err.is_auth());
    assert!(!client.try_authenticate(false).await);
    assert_eq!(server.logins(), 2);
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_in_band_fault_over_http() {
    let server = TestServer::new().await;
    let mut client = RpcClient::connect(ClientConfig::anonymous(server.base_url())).unwrap();

    let err = client.list_dbs(false).await.unwrap_err();
    assert!(matches!(err, BizrpcError::RemoteFault { ref message, .. } if message == "Access Denied"));
    assert_eq!(err.fault_code(), Some(3));
}

#[tokio::test]
async fn test_jsonrpc_error_is_transport_level() {
    let server = TestServer::new().await;
    let mut client = RpcClient::connect(ClientConfig::anonymous(server.base_url())).unwrap();

    let err = client.list_lang().await.unwrap_err();
    assert!(matches!(err, BizrpcError::Rpc { code: -32601, .. }));
    assert!(!err.is_in_band());
}

#[tokio::test]
async fn test_http_status_error() {
    let server = TestServer::new().await;
    let mut client = RpcClient::connect(ClientConfig::anonymous(server.base_url())).unwrap();

    let err = client.invoke_on("broken", "version", vec![]).await.unwrap_err();
    assert!(matches!(err, BizrpcError::Http(_)));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = TestServer::new().await;
    let mut client = RpcClient::connect(ClientConfig::anonymous(server.base_url())).unwrap();

    let err = client.invoke_on("garbage", "version", vec![]).await.unwrap_err();
    assert!(matches!(err, BizrpcError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_invalid_base_url_is_configuration_error() {
    let mut client = RpcClient::connect(ClientConfig::anonymous("erp.example.com")).unwrap();

    let err = client.version().await.unwrap_err();
    assert!(matches!(err, BizrpcError::Configuration(_)));
    assert_eq!(client.current_endpoint(), None);
}

#[tokio::test]
async fn test_check_access_rights_over_http() {
    let server = TestServer::new().await;
    let mut client = authenticated(&server, "p");

    // the echo server answers with the non-empty argument list
    assert!(client.check_access_rights("res.partner", "read", false).await);

    let mut rejected = authenticated(&server, "wrong");
    assert!(!rejected.check_access_rights("res.partner", "read", false).await);
}
