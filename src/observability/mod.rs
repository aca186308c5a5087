//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, mapper, ledger client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Request ids are attached by the HTTP layer and show up on every span.

pub mod logging;
pub mod metrics;
