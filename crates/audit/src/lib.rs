use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use common::{AuditEvent, AuditSink, Result};

/// Append-only audit log backed by SQLite.
///
/// The `audit_log` table is created by the workspace migration; run
/// migrations before constructing this. Rows are only ever inserted.
pub struct SqliteAudit {
    db: SqlitePool,
}

impl SqliteAudit {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditSink for SqliteAudit {
    async fn record(&self, run_id: Uuid, event: &AuditEvent) -> Result<()> {
        let payload = serde_json::to_value(event)?;
        // The enum is internally tagged; lift the tag into its own column
        // so runs can be filtered without parsing JSON.
        let kind = payload
            .get("event")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        debug!(%run_id, kind = %kind, "Appending audit record");
        sqlx::query(
            "INSERT INTO audit_log (run_id, recorded_at, event, payload) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(run_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(kind)
        .bind(payload.to_string())
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
