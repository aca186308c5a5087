//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallink_intents_total` (counter): intents by name and outcome
//! - `wallink_ledger_call_duration_seconds` (histogram): RPC latency by method
//! - `wallink_ledger_calls_total` (counter): RPC calls by method and outcome
//! - `wallink_rate_limited_total` (counter): rejected requests
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// How an intent ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Invalid,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Invalid => "invalid",
            Outcome::Failed => "failed",
        }
    }
}

pub fn record_intent(intent: &'static str, outcome: Outcome) {
    counter!("wallink_intents_total", "intent" => intent, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_ledger_call(method: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("wallink_ledger_calls_total", "method" => method, "outcome" => outcome).increment(1);
    histogram!("wallink_ledger_call_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("wallink_rate_limited_total").increment(1);
}
