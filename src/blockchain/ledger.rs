//! The ledger seam: what the relay needs from a node.

use async_trait::async_trait;

use crate::blockchain::types::{Balance, BlockchainResult, ExecutionOutcome, TransactionPlan};

/// Capabilities the relay requires from the remote ledger.
///
/// Building is harmless to repeat; executing is not, and callers must not
/// retry it on their own.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Build an unsigned transaction for `plan` and return its serialized bytes.
    async fn build_move_call(&self, plan: &TransactionPlan) -> BlockchainResult<Vec<u8>>;

    /// Submit base64 transaction bytes with their signatures, asking for
    /// effects, object changes and events.
    async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> BlockchainResult<ExecutionOutcome>;

    /// Latest checkpoint sequence number known to the node.
    async fn latest_checkpoint(&self) -> BlockchainResult<u64>;

    /// SUI balance of `owner`.
    async fn get_balance(&self, owner: &str) -> BlockchainResult<Balance>;
}
