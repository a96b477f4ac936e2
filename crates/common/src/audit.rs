use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, Verdict};

/// Structured record appended to the audit log.
///
/// One `Verdict` or `InstrumentFault` per instrument per run, plus
/// exactly one notification outcome per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    Verdict { verdict: Verdict },
    InstrumentFault { symbol: String, error: String },
    NotificationSent { instruments: Vec<String> },
    NotificationFailed { error: String },
    NoMatches,
}

/// Append-only sink for audit records.
///
/// `SqliteAudit` in `crates/audit` implements this for production;
/// tests use an in-memory sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, run_id: Uuid, event: &AuditEvent) -> Result<()>;
}
