//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-IP token bucket)
//!     → body size limit (tower-http, configured in http::server)
//!     → handlers
//! ```

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiterState};
