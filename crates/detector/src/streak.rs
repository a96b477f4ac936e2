use common::{MovingAverage, SeriesPoint, VerdictReason};

/// Outcome of one streak evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub met: bool,
    pub reason: VerdictReason,
}

impl Evaluation {
    fn not_met(reason: VerdictReason) -> Self {
        Self { met: false, reason }
    }
}

/// Decide whether `close < moving average` has held, strictly and
/// without gaps, for the most recent `required_run` sessions.
///
/// Scans backward from the newest session and stops at the first
/// disqualifier — the run must be unbroken, so there is nothing to
/// learn from older sessions once one fails. Every ambiguity resolves
/// to not-met:
/// - scanning past the series start, or hitting a warmup-region
///   average, is `InsufficientData`;
/// - a missing close or a gap in the average window is `MissingValue`,
///   no interpolation, no partial credit;
/// - a session with `close >= average` (ties included) is
///   `ConditionNotMet`.
pub fn evaluate(series: &[SeriesPoint], required_run: usize) -> Evaluation {
    assert!(required_run >= 1, "required run length must be >= 1");

    for offset in 0..required_run {
        let Some(idx) = series.len().checked_sub(offset + 1) else {
            return Evaluation::not_met(VerdictReason::InsufficientData);
        };
        let point = &series[idx];

        let average = match point.moving_average {
            MovingAverage::Value(v) => v,
            MovingAverage::Warmup => {
                return Evaluation::not_met(VerdictReason::InsufficientData);
            }
            MovingAverage::Gap => {
                return Evaluation::not_met(VerdictReason::MissingValue);
            }
        };
        let Some(close) = point.close else {
            return Evaluation::not_met(VerdictReason::MissingValue);
        };

        // Strict inequality: an equal close does not count.
        if close >= average {
            return Evaluation::not_met(VerdictReason::ConditionNotMet);
        }
    }

    Evaluation {
        met: true,
        reason: VerdictReason::ConditionMet,
    }
}
