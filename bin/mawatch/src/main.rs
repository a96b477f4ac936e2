use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use audit::SqliteAudit;
use common::{AuditSink, Config, MarketData, Notifier};
use detector::{AlertDispatcher, InstrumentMonitor, MonitorParams, WatchlistConfig, WatchlistRunner};
use marketdata::YahooClient;
use notify::TelegramNotifier;

/// One batch check over the watchlist, then exit. Scheduling (cron,
/// systemd timer) lives outside the process.
#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let watchlist = WatchlistConfig::load(&cfg.watchlist_path);
    info!(
        instruments = watchlist.instruments.len(),
        window = watchlist.window,
        required_run = watchlist.required_run,
        "mawatch starting"
    );

    // ── Audit database ────────────────────────────────────────────────────────
    let db = SqlitePool::connect(&cfg.database_url)
        .await
        .unwrap_or_else(|e| panic!("Failed to connect to database: {e}"));
    sqlx::migrate!("../../migrations")
        .run(&db)
        .await
        .unwrap_or_else(|e| panic!("Database migration failed: {e}"));
    info!("Audit database ready");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let market: Arc<dyn MarketData> = Arc::new(YahooClient::new());
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(&cfg.telegram_token));
    let audit: Arc<dyn AuditSink> = Arc::new(SqliteAudit::new(db));

    // ── Core ──────────────────────────────────────────────────────────────────
    let params = MonitorParams {
        window: watchlist.window,
        required_run: watchlist.required_run,
        lookback_days: watchlist.lookback_days,
    };
    let monitor = Arc::new(InstrumentMonitor::new(
        market,
        Arc::new(watchlist.display_names()),
        params,
        Duration::from_secs(cfg.fetch_timeout_secs),
    ));
    let runner = WatchlistRunner::new(monitor, audit.clone());
    let dispatcher = AlertDispatcher::new(
        notifier,
        cfg.telegram_chat_id.clone(),
        audit,
        watchlist.required_run,
    );

    // ── Run ───────────────────────────────────────────────────────────────────
    let report = runner.run(&watchlist.symbols()).await;
    dispatcher.dispatch(&report).await;
    info!(run_id = %report.run_id, "Run complete");
}
