use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{Observation, Result};

/// Abstraction over the historical price feed.
///
/// `YahooClient` in `crates/marketdata` implements this for production.
/// Tests substitute fixtures. Only `InstrumentMonitor` in
/// `crates/detector` should hold a reference to a `dyn MarketData`.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch daily observations for `symbol` over `[start, end]`.
    ///
    /// Returns sessions strictly ascending by date; non-trading days are
    /// simply absent. An empty vec is a valid, non-exceptional outcome.
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Observation>>;
}
