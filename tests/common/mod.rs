//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use wallink_relay::blockchain::{
    Balance, BlockchainError, BlockchainResult, ExecutionOutcome, LedgerClient, TransactionPlan,
};
use wallink_relay::config::RelayConfig;
use wallink_relay::{HttpServer, Shutdown};

pub const PACKAGE_ID: &str = "0x5ca1ab1e";
pub const USER: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";
pub const NFT: &str = "0x00000000000000000000000000000000000000000000000000000000000000bb";

/// In-memory ledger. Built payloads are the JSON-encoded plan so tests can
/// inspect exactly what the relay asked for.
#[derive(Default)]
pub struct MockLedger {
    pub plans: Mutex<Vec<TransactionPlan>>,
    pub executions: Mutex<Vec<(String, Vec<String>)>>,
    pub fail_builds: bool,
    pub build_delay: Option<Duration>,
}

impl MockLedger {
    pub fn failing() -> Self {
        Self {
            fail_builds: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            build_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn plan_count(&self) -> usize {
        self.plans.lock().unwrap().len()
    }

    pub fn execution_count(&self) -> usize {
        self.executions.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn build_move_call(&self, plan: &TransactionPlan) -> BlockchainResult<Vec<u8>> {
        if let Some(delay) = self.build_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_builds {
            return Err(BlockchainError::Rpc("connection refused".into()));
        }
        self.plans.lock().unwrap().push(plan.clone());
        Ok(serde_json::to_vec(plan).unwrap())
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> BlockchainResult<ExecutionOutcome> {
        let mut executions = self.executions.lock().unwrap();
        if executions.iter().any(|(bytes, _)| bytes == tx_bytes) {
            return Err(BlockchainError::Node {
                code: -32002,
                message: "Transaction is already executed".into(),
            });
        }
        executions.push((tx_bytes.to_string(), signatures.to_vec()));
        Ok(ExecutionOutcome {
            digest: "7Yx3digest".into(),
            effects: json!({ "status": { "status": "success" }, "gasUsed": { "computationCost": "1000" } }),
            object_changes: json!([{ "type": "created", "objectId": NFT }]),
            events: json!([]),
        })
    }

    async fn latest_checkpoint(&self) -> BlockchainResult<u64> {
        Ok(4242)
    }

    async fn get_balance(&self, _owner: &str) -> BlockchainResult<Balance> {
        Ok(Balance {
            coin_type: "0x2::sui::SUI".into(),
            coin_object_count: 2,
            total_balance: "1500000000".into(),
        })
    }
}

/// Decode a `transactionBytes` value produced against [`MockLedger`].
pub fn decode_payload(transaction_bytes: &str) -> TransactionPlan {
    let bytes = STANDARD.decode(transaction_bytes).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.sui.package_id = PACKAGE_ID.into();
    config.rate_limit.enabled = false;
    config
}

/// A running relay bound to an ephemeral port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub base_url: String,
    pub shutdown: Shutdown,
}

pub async fn spawn_relay(config: RelayConfig, ledger: Arc<dyn LedgerClient>) -> TestRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}{}", addr, config.listener.base_path);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config, ledger);
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestRelay {
        addr,
        base_url,
        shutdown,
    }
}

/// Scripted JSON-RPC node. `handler` receives (method, params) and returns
/// the full `result` or `error` member to send back.
pub struct MockNode {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
    pub hits: Arc<AtomicUsize>,
    _shutdown: broadcast::Sender<()>,
}

#[derive(Clone)]
struct NodeState {
    requests: Arc<Mutex<Vec<Value>>>,
    hits: Arc<AtomicUsize>,
    handler: Arc<dyn Fn(&str, &Value) -> Value + Send + Sync>,
}

pub async fn start_rpc_node<F>(handler: F) -> MockNode
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));
    let state = NodeState {
        requests: requests.clone(),
        hits: hits.clone(),
        handler: Arc::new(handler),
    };

    let app = Router::new().route("/", post(rpc)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, mut rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await
            .unwrap();
    });

    MockNode {
        url: format!("http://{}", addr),
        requests,
        hits,
        _shutdown: tx,
    }
}

async fn rpc(State(state): State<NodeState>, Json(request): Json<Value>) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(request.clone());

    let method = request["method"].as_str().unwrap_or_default();
    let mut reply = (state.handler)(method, &request["params"]);
    reply["jsonrpc"] = json!("2.0");
    reply["id"] = request["id"].clone();
    Json(reply)
}

/// A proxy in front of a dead node: every request gets a 503 with a JSON
/// body that is not a JSON-RPC envelope.
pub async fn start_unhealthy_gateway() -> MockNode {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new().route(
        "/",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "message": "no healthy upstream" })),
                )
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, mut rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await
            .unwrap();
    });

    MockNode {
        url: format!("http://{}", addr),
        requests,
        hits,
        _shutdown: tx,
    }
}

/// An address nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
