//! Sui JSON-RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint(s)
//! - Build Move-call transactions on the node (`unsafe_moveCall`)
//! - Submit signed transactions (`sui_executeTransactionBlock`)
//! - Query checkpoint and balance for health reporting
//!
//! Transport failures move on to the next endpoint for builds and reads.
//! Execution only ever goes to the primary endpoint, and a JSON-RPC error
//! from a node is returned as-is without trying another one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::blockchain::ledger::LedgerClient;
use crate::blockchain::types::{
    Balance, BlockchainError, BlockchainResult, ExecutionOutcome, TransactionPlan,
};
use crate::config::SuiConfig;
use crate::observability::metrics;

/// Execution waits until the node has applied the transaction locally.
const EXECUTE_REQUEST_TYPE: &str = "WaitForLocalExecution";

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionBytes {
    #[serde(rename = "txBytes")]
    tx_bytes: String,
}

/// Ledger client speaking Sui JSON-RPC 2.0 over HTTP.
pub struct SuiRpcClient {
    http: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<Url>,
    config: SuiConfig,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a new client. No network traffic happens here.
    pub fn new(config: SuiConfig) -> BlockchainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::NotAvailable(format!("HTTP client: {}", e)))?;

        let primary: Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::NotAvailable(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let mut endpoints = vec![primary];

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            network = %config.network,
            failovers = endpoints.len() - 1,
            "Ledger client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SuiConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
        failover: bool,
    ) -> BlockchainResult<T> {
        let start = Instant::now();
        let result = self.dispatch(method, &params, failover).await;
        metrics::record_ledger_call(method, result.is_ok(), start);
        result
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &Value,
        failover: bool,
    ) -> BlockchainResult<T> {
        let endpoints = if failover {
            &self.endpoints[..]
        } else {
            &self.endpoints[..1]
        };
        let mut last_error = BlockchainError::NotAvailable("no RPC endpoints configured".into());

        for (i, endpoint) in endpoints.iter().enumerate() {
            let body = json!({
                "jsonrpc": "2.0",
                "id": self.next_id.fetch_add(1, Ordering::Relaxed),
                "method": method,
                "params": params,
            });

            let response = match self.http.post(endpoint.clone()).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = if e.is_timeout() {
                        BlockchainError::Timeout(self.config.rpc_timeout_secs)
                    } else {
                        BlockchainError::Rpc(e.to_string())
                    };
                    tracing::warn!(provider_idx = i, method, error = %last_error, "RPC transport error");
                    continue;
                }
            };

            let status = response.status();
            let envelope: RpcEnvelope<T> = match response.json().await {
                Ok(envelope) => envelope,
                Err(e) if !status.is_success() => {
                    last_error = BlockchainError::Rpc(format!("HTTP {} from {}", status, endpoint));
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC endpoint unhealthy");
                    continue;
                }
                Err(e) => {
                    return Err(BlockchainError::InvalidResponse(format!("{}: {}", method, e)));
                }
            };

            if let Some(error) = envelope.error {
                return Err(BlockchainError::Node {
                    code: error.code,
                    message: error.message,
                });
            }

            // A gateway in front of the node may answer with its own JSON.
            if envelope.result.is_none() && !status.is_success() {
                last_error = BlockchainError::Rpc(format!("HTTP {} from {}", status, endpoint));
                tracing::warn!(provider_idx = i, method, error = %last_error, "RPC endpoint unhealthy");
                continue;
            }

            return envelope.result.ok_or_else(|| {
                BlockchainError::InvalidResponse(format!("{} returned neither result nor error", method))
            });
        }

        Err(last_error)
    }
}

#[async_trait]
impl LedgerClient for SuiRpcClient {
    async fn build_move_call(&self, plan: &TransactionPlan) -> BlockchainResult<Vec<u8>> {
        let arguments: Vec<Value> = plan.arguments.iter().map(|arg| arg.to_sui_json()).collect();
        let params = json!([
            plan.sender,
            plan.target.package,
            plan.target.module,
            plan.target.function,
            [],
            arguments,
            null,
            plan.gas_budget.to_string(),
            null,
        ]);

        let built: TransactionBytes = self.call("unsafe_moveCall", params, true).await?;
        let bytes = STANDARD
            .decode(built.tx_bytes.as_bytes())
            .map_err(|e| BlockchainError::InvalidResponse(format!("txBytes is not base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(BlockchainError::InvalidResponse("node returned empty txBytes".into()));
        }

        tracing::debug!(move_target = %plan.target, sender = %plan.sender, size = bytes.len(), "Transaction built");
        Ok(bytes)
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> BlockchainResult<ExecutionOutcome> {
        let params = json!([
            tx_bytes,
            signatures,
            {
                "showEffects": true,
                "showObjectChanges": true,
                "showEvents": true,
            },
            EXECUTE_REQUEST_TYPE,
        ]);

        self.call("sui_executeTransactionBlock", params, false).await
    }

    async fn latest_checkpoint(&self) -> BlockchainResult<u64> {
        let value: Value = self
            .call("sui_getLatestCheckpointSequenceNumber", json!([]), true)
            .await?;

        // The node encodes u64 as a string; accept a bare number too.
        let checkpoint = match &value {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        };
        checkpoint.ok_or_else(|| {
            BlockchainError::InvalidResponse(format!("unexpected checkpoint value {}", value))
        })
    }

    async fn get_balance(&self, owner: &str) -> BlockchainResult<Balance> {
        self.call("suix_getBalance", json!([owner, null]), true).await
    }
}

impl std::fmt::Debug for SuiRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiRpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("network", &self.config.network)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
