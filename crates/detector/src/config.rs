use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Watchlist config file (TOML).
///
/// Example `config/watchlist.toml`:
/// ```toml
/// window = 50
/// required_run = 10
/// lookback_days = 100
///
/// [[instrument]]
/// symbol = "7820.T"
/// name = "KDDI"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchlistConfig {
    /// Moving-average window length in sessions.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Consecutive sessions the condition must hold.
    #[serde(default = "default_required_run")]
    pub required_run: usize,
    /// Calendar days of history to request per instrument.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    #[serde(rename = "instrument")]
    pub instruments: Vec<InstrumentConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstrumentConfig {
    /// Data-source symbol, e.g. "7820.T".
    pub symbol: String,
    /// Display name shown in alerts and logs. Optional; the raw symbol
    /// is used when absent.
    pub name: Option<String>,
}

fn default_window() -> usize {
    50
}

fn default_required_run() -> usize {
    10
}

fn default_lookback_days() -> i64 {
    100
}

impl WatchlistConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read watchlist config at '{path}': {e}"));
        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse watchlist config at '{path}': {e}"))
    }

    /// Symbols in file order (the order the final report preserves).
    pub fn symbols(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.symbol.clone()).collect()
    }

    /// Symbol to display-name table, passed to the monitor explicitly so
    /// tests can substitute fixtures.
    pub fn display_names(&self) -> HashMap<String, String> {
        self.instruments
            .iter()
            .filter_map(|i| i.name.clone().map(|n| (i.symbol.clone(), n)))
            .collect()
    }
}
