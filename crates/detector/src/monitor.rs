use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Utc};
use tracing::{debug, warn};

use common::{Error, MarketData, Observation, Result, Verdict, VerdictReason};

use crate::{streak, window};

/// Evaluation parameters for one monitoring run.
#[derive(Debug, Clone, Copy)]
pub struct MonitorParams {
    /// Moving-average window length in sessions.
    pub window: usize,
    /// Consecutive sessions the condition must hold.
    pub required_run: usize,
    /// Calendar days of history requested from the data source.
    pub lookback_days: i64,
}

/// Evaluates one instrument end to end: fetch, average, streak, verdict.
///
/// Data-quality problems (empty series, gaps, short history) come back
/// as verdict reasons, never as errors. Only collaborator faults and
/// invariant violations in the returned series are `Err`; the runner
/// isolates those per instrument.
pub struct InstrumentMonitor {
    client: Arc<dyn MarketData>,
    display_names: Arc<HashMap<String, String>>,
    params: MonitorParams,
    fetch_timeout: Duration,
}

impl InstrumentMonitor {
    pub fn new(
        client: Arc<dyn MarketData>,
        display_names: Arc<HashMap<String, String>>,
        params: MonitorParams,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            client,
            display_names,
            params,
            fetch_timeout,
        }
    }

    pub async fn run(&self, symbol: &str) -> Result<Verdict> {
        let name = self
            .display_names
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.to_string());

        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(self.params.lookback_days.max(0) as u64))
            .ok_or_else(|| Error::Other(format!("lookback underflows calendar: {}", self.params.lookback_days)))?;

        let fetch = self.client.fetch(symbol, start, end);
        let observations = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                // A stalled retrieval must not block the rest of the run;
                // treat it like an empty result for this instrument only.
                warn!(symbol, timeout_secs = self.fetch_timeout.as_secs(), "Market data fetch timed out");
                return Ok(Verdict::not_triggered(symbol, name, VerdictReason::RetrievalEmpty));
            }
        };

        if observations.is_empty() {
            return Ok(Verdict::not_triggered(symbol, name, VerdictReason::RetrievalEmpty));
        }
        validate_ordering(symbol, &observations)?;

        let series = window::compute(&observations, self.params.window);
        let evaluation = streak::evaluate(&series, self.params.required_run);
        debug!(
            symbol,
            sessions = series.len(),
            met = evaluation.met,
            reason = %evaluation.reason,
            "Instrument evaluated"
        );

        Ok(Verdict {
            symbol: symbol.to_string(),
            name,
            triggered: evaluation.met,
            reason: evaluation.reason,
        })
    }
}

/// The retrieval contract promises strictly ascending dates. A violation
/// is a collaborator bug, surfaced as this instrument's fault rather
/// than silently re-sorted.
fn validate_ordering(symbol: &str, observations: &[Observation]) -> Result<()> {
    for pair in observations.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(Error::MarketData(format!(
                "series for '{symbol}' is not strictly ascending: {} then {}",
                pair[0].date, pair[1].date
            )));
        }
    }
    Ok(())
}
