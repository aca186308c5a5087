//! Typed client for the wallink relay HTTP API.

pub mod client;

pub use client::{
    BuiltTransaction, ExecutedTransaction, LinkInput, RelayClient, SdkError, SdkResult,
};
