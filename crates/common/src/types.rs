use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One daily session as reported by the market data source.
///
/// `close` is `None` when the source reported a null for that session
/// (Yahoo does this for partially populated days). Sessions arrive
/// ascending by date with no duplicates; the monitor treats a violation
/// as a per-instrument fault.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Trailing moving average attached to one session.
///
/// Never zero, never extrapolated. The two undefined states are kept
/// apart because they map to different verdict reasons: not enough
/// history is `InsufficientData` downstream, a hole inside an otherwise
/// full window is `MissingValue`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovingAverage {
    /// Arithmetic mean of the trailing window of closes.
    Value(f64),
    /// Fewer than `window` observations end at this session.
    Warmup,
    /// Enough history, but at least one close inside the window is missing.
    Gap,
}

impl MovingAverage {
    pub fn value(&self) -> Option<f64> {
        match self {
            MovingAverage::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// One session with its derived moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub moving_average: MovingAverage,
}

/// Why an instrument's evaluation came out the way it did.
///
/// All of these are expected outcomes, not faults: data-quality
/// problems are encoded here and logged, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    ConditionMet,
    ConditionNotMet,
    InsufficientData,
    MissingValue,
    RetrievalEmpty,
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictReason::ConditionMet => write!(f, "condition met"),
            VerdictReason::ConditionNotMet => write!(f, "condition not met"),
            VerdictReason::InsufficientData => write!(f, "insufficient data"),
            VerdictReason::MissingValue => write!(f, "missing value in run"),
            VerdictReason::RetrievalEmpty => write!(f, "retrieval returned no data"),
        }
    }
}

/// Per-instrument outcome of one monitoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub symbol: String,
    /// Display name resolved from the watchlist, or the raw symbol.
    pub name: String,
    pub triggered: bool,
    pub reason: VerdictReason,
}

impl Verdict {
    pub fn not_triggered(symbol: impl Into<String>, name: impl Into<String>, reason: VerdictReason) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            triggered: false,
            reason,
        }
    }
}

/// Aggregate result of one run: the triggered verdicts in watchlist
/// order. Built fresh each run, consumed by the dispatcher, discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    pub run_at: DateTime<Utc>,
    pub triggered: Vec<Verdict>,
}

impl Report {
    pub fn new(triggered: Vec<Verdict>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_at: Utc::now(),
            triggered,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triggered.is_empty()
    }
}
