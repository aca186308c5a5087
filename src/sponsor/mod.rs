//! Profile intents: validation, Move-call mapping, execution relay.
//!
//! # Data Flow
//! ```text
//! request DTO (types.rs)
//!     → mapper.rs (required fields, linkIndex, socialLinks)
//!     → TransactionPlan → LedgerClient::build_move_call
//!     → TransactionBuildResult { transactionBytes: base64 }
//!
//! signed payload
//!     → mapper.rs → LedgerClient::execute_transaction
//!     → ExecutionResult (digest, effects, objectChanges, events verbatim)
//! ```

pub mod mapper;
pub mod types;

use thiserror::Error;

use crate::blockchain::BlockchainError;

pub use mapper::{SponsorSettings, TransactionMapper};
pub use types::{
    AddLinkRequest, ExecutionRequest, ExecutionResult, LedgerStatus, ProfileCreationRequest,
    ProfileUpdateRequest, RemoveLinkRequest, SocialLink, TransactionBuildResult, UpdateLinkRequest,
};

/// Failure of a single intent.
///
/// Build and execution failures are not told apart; both carry the
/// ledger's message.
#[derive(Debug, Error)]
pub enum SponsorError {
    /// Missing or malformed input, detected before any ledger call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ledger(#[from] BlockchainError),
}

pub type SponsorResult<T> = Result<T, SponsorError>;
