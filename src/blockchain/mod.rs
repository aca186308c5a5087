//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! TransactionPlan (sender, gas budget, Move target, arguments)
//!     → ledger.rs (LedgerClient trait, the seam tests mock)
//!     → client.rs (Sui JSON-RPC: build on the node, execute, health reads)
//! ```
//!
//! # Constraints
//! - The relay holds no keys and signs nothing
//! - Signatures are forwarded, never logged
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod ledger;
pub mod types;

pub use client::SuiRpcClient;
pub use ledger::LedgerClient;
pub use types::{
    Balance, BlockchainError, BlockchainResult, CallArg, ExecutionOutcome, MoveCallTarget, PureArg,
    TransactionPlan,
};
