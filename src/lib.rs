//! Wallink relay library.
//!
//! Builds unsigned Move-call transactions for link-tree profile NFTs on
//! behalf of zkLogin users and relays their signed transactions to a Sui
//! node.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod sponsor;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
