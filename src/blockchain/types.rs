//! Ledger-facing types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or transport failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error object.
    #[error("{message} (code {code})")]
    Node { code: i64, message: String },

    /// The node answered with something we could not interpret.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Ledger client not initialized or misconfigured.
    #[error("Ledger not available: {0}")]
    NotAvailable(String),
}

/// Result type for ledger operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Fully qualified Move function, `package::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCallTarget {
    pub package: String,
    pub module: String,
    pub function: String,
}

impl std::fmt::Display for MoveCallTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Pure (non-object) Move call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureArg {
    String(String),
    StringVector(Vec<String>),
    U64(u64),
}

/// A single Move call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallArg {
    /// An on-chain object, referenced by id.
    Object { id: String },
    Pure { value: PureArg },
}

impl CallArg {
    pub fn object(id: impl Into<String>) -> Self {
        CallArg::Object { id: id.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        CallArg::Pure { value: PureArg::String(value.into()) }
    }

    pub fn strings(values: Vec<String>) -> Self {
        CallArg::Pure { value: PureArg::StringVector(values) }
    }

    pub fn u64(value: u64) -> Self {
        CallArg::Pure { value: PureArg::U64(value) }
    }

    /// JSON form accepted by the node's `unsafe_moveCall`.
    ///
    /// u64 values are sent as decimal strings so they survive JSON number
    /// precision limits.
    pub fn to_sui_json(&self) -> Value {
        match self {
            CallArg::Object { id } => Value::String(id.clone()),
            CallArg::Pure { value: PureArg::String(s) } => Value::String(s.clone()),
            CallArg::Pure { value: PureArg::StringVector(values) } => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
            CallArg::Pure { value: PureArg::U64(n) } => Value::String(n.to_string()),
        }
    }
}

/// Everything the ledger needs to build one unsigned Move-call transaction.
///
/// `sender` is both the signer and the gas owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPlan {
    pub sender: String,
    pub gas_budget: u64,
    pub target: MoveCallTarget,
    pub arguments: Vec<CallArg>,
}

/// Result of submitting a signed transaction, relayed without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub digest: String,
    #[serde(default)]
    pub effects: Value,
    #[serde(default)]
    pub object_changes: Value,
    #[serde(default)]
    pub events: Value,
}

/// Coin balance of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    pub coin_object_count: u64,
    pub total_balance: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_display() {
        let target = MoveCallTarget {
            package: "0x2a".into(),
            module: "linktree_nft".into(),
            function: "create_profile_nft".into(),
        };
        assert_eq!(target.to_string(), "0x2a::linktree_nft::create_profile_nft");
    }

    #[test]
    fn test_sui_json_encoding() {
        assert_eq!(CallArg::object("0xbeef").to_sui_json(), json!("0xbeef"));
        assert_eq!(CallArg::string("Ada").to_sui_json(), json!("Ada"));
        assert_eq!(
            CallArg::strings(vec!["a".into(), "b".into()]).to_sui_json(),
            json!(["a", "b"])
        );
        assert_eq!(CallArg::u64(u64::MAX).to_sui_json(), json!("18446744073709551615"));
    }

    #[test]
    fn test_outcome_missing_fields_default_to_null() {
        let outcome: ExecutionOutcome = serde_json::from_value(json!({ "digest": "D1" })).unwrap();
        assert_eq!(outcome.digest, "D1");
        assert!(outcome.effects.is_null());
        assert!(outcome.object_changes.is_null());
        assert!(outcome.events.is_null());
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::Node {
            code: -32002,
            message: "Transaction has invalid signature".into(),
        };
        assert_eq!(err.to_string(), "Transaction has invalid signature (code -32002)");
    }
}
