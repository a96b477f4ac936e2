use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{error, info};
use uuid::Uuid;

use common::{AuditEvent, AuditSink, Report};

use crate::InstrumentMonitor;

/// Drives one monitoring run across the whole watchlist.
///
/// Instruments are evaluated concurrently — each task owns its series
/// and touches no shared mutable state — but the report lists triggered
/// instruments in watchlist order, not completion order. One
/// instrument's fault or panic never aborts the others.
pub struct WatchlistRunner {
    monitor: Arc<InstrumentMonitor>,
    audit: Arc<dyn AuditSink>,
}

impl WatchlistRunner {
    pub fn new(monitor: Arc<InstrumentMonitor>, audit: Arc<dyn AuditSink>) -> Self {
        Self { monitor, audit }
    }

    pub async fn run(&self, symbols: &[String]) -> Report {
        let run_id = Uuid::new_v4();
        let run_at = Utc::now();
        info!(%run_id, instruments = symbols.len(), "Watchlist run starting");

        let tasks: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let monitor = self.monitor.clone();
                let symbol = symbol.clone();
                tokio::spawn(async move { monitor.run(&symbol).await })
            })
            .collect();

        // join_all preserves task order, which is watchlist order.
        let outcomes = join_all(tasks).await;

        let mut triggered = Vec::new();
        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                Ok(Ok(verdict)) => {
                    info!(
                        symbol = %verdict.symbol,
                        name = %verdict.name,
                        triggered = verdict.triggered,
                        reason = %verdict.reason,
                        "Verdict"
                    );
                    self.record(run_id, &AuditEvent::Verdict { verdict: verdict.clone() })
                        .await;
                    if verdict.triggered {
                        triggered.push(verdict);
                    }
                }
                Ok(Err(e)) => {
                    error!(symbol = %symbol, error = %e, "Instrument evaluation failed");
                    self.record(
                        run_id,
                        &AuditEvent::InstrumentFault {
                            symbol: symbol.clone(),
                            error: e.to_string(),
                        },
                    )
                    .await;
                }
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Instrument task panicked");
                    self.record(
                        run_id,
                        &AuditEvent::InstrumentFault {
                            symbol: symbol.clone(),
                            error: e.to_string(),
                        },
                    )
                    .await;
                }
            }
        }

        info!(%run_id, triggered = triggered.len(), "Watchlist run finished");
        Report {
            run_id,
            run_at,
            triggered,
        }
    }

    async fn record(&self, run_id: Uuid, event: &AuditEvent) {
        if let Err(e) = self.audit.record(run_id, event).await {
            error!(%run_id, error = %e, "Failed to write audit record");
        }
    }
}
