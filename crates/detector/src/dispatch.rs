use std::sync::Arc;

use tracing::{error, info};

use common::{AuditEvent, AuditSink, Notifier, Report};

/// Turns a report into at most one notification per run.
///
/// Batching is mandatory: one combined message for all triggered
/// instruments, never one message each. Delivery failure is logged and
/// audited but never re-raised.
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    destination: String,
    audit: Arc<dyn AuditSink>,
    /// Streak length quoted in the rendered message.
    required_run: usize,
}

impl AlertDispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        destination: impl Into<String>,
        audit: Arc<dyn AuditSink>,
        required_run: usize,
    ) -> Self {
        Self {
            notifier,
            destination: destination.into(),
            audit,
            required_run,
        }
    }

    pub async fn dispatch(&self, report: &Report) {
        if report.is_empty() {
            info!(run_id = %report.run_id, "No instruments triggered; nothing to send");
            self.record(report, &AuditEvent::NoMatches).await;
            return;
        }

        let message = render(report, self.required_run);
        match self.notifier.send(&self.destination, &message).await {
            Ok(()) => {
                info!(
                    run_id = %report.run_id,
                    instruments = report.triggered.len(),
                    "Alert sent"
                );
                self.record(
                    report,
                    &AuditEvent::NotificationSent {
                        instruments: report.triggered.iter().map(|v| v.symbol.clone()).collect(),
                    },
                )
                .await;
            }
            Err(e) => {
                error!(run_id = %report.run_id, error = %e, "Alert delivery failed");
                self.record(
                    report,
                    &AuditEvent::NotificationFailed {
                        error: e.to_string(),
                    },
                )
                .await;
            }
        }
    }

    async fn record(&self, report: &Report, event: &AuditEvent) {
        if let Err(e) = self.audit.record(report.run_id, event).await {
            error!(run_id = %report.run_id, error = %e, "Failed to write audit record");
        }
    }
}

fn render(report: &Report, required_run: usize) -> String {
    let names: Vec<String> = report
        .triggered
        .iter()
        .map(|v| {
            if v.name == v.symbol {
                v.symbol.clone()
            } else {
                format!("{} ({})", v.name, v.symbol)
            }
        })
        .collect();

    format!(
        "📉 {} — closed below the moving average for {} straight sessions: {}",
        report.run_at.format("%Y-%m-%d %H:%M UTC"),
        required_run,
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Verdict, VerdictReason};

    #[test]
    fn render_joins_display_names_with_symbols() {
        let report = Report::new(vec![
            Verdict {
                symbol: "7820.T".into(),
                name: "KDDI".into(),
                triggered: true,
                reason: VerdictReason::ConditionMet,
            },
            Verdict {
                symbol: "XYZ".into(),
                name: "XYZ".into(),
                triggered: true,
                reason: VerdictReason::ConditionMet,
            },
        ]);
        let msg = render(&report, 10);
        assert!(msg.contains("KDDI (7820.T)"), "message was: {msg}");
        assert!(msg.contains("XYZ"));
        assert!(msg.contains("10 straight sessions"));
        // Bare symbol is not doubled up
        assert!(!msg.contains("XYZ (XYZ)"));
    }
}
