use common::{MovingAverage, Observation, SeriesPoint};

/// Attach a trailing moving average to every session of a series.
///
/// Pure function of its input: same observations and window always
/// produce the same output. Empty input yields empty output; the caller
/// treats that as a retrieval problem, not an error here.
///
/// The average at index `i` is the arithmetic mean of closes over
/// `[i - window + 1, i]`. It is `Warmup` while fewer than `window`
/// observations end at `i`, and `Gap` when the window is full but any
/// close inside it is missing. Undefined never means zero.
pub fn compute(observations: &[Observation], window: usize) -> Vec<SeriesPoint> {
    assert!(window >= 1, "moving average window must be >= 1");

    observations
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let moving_average = if i + 1 < window {
                MovingAverage::Warmup
            } else {
                trailing_mean(&observations[i + 1 - window..=i])
            };
            SeriesPoint {
                date: obs.date,
                close: obs.close,
                moving_average,
            }
        })
        .collect()
}

fn trailing_mean(window: &[Observation]) -> MovingAverage {
    let mut sum = 0.0;
    for obs in window {
        match obs.close {
            Some(close) => sum += close,
            None => return MovingAverage::Gap,
        }
    }
    MovingAverage::Value(sum / window.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[Option<f64>]) -> Vec<Observation> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Observation {
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Days::new(i as u64),
                close,
            })
            .collect()
    }

    #[test]
    fn short_series_is_all_warmup() {
        let obs = series(&[Some(10.0), Some(11.0), Some(12.0)]);
        let points = compute(&obs, 5);
        assert_eq!(points.len(), 3);
        assert!(points
            .iter()
            .all(|p| p.moving_average == MovingAverage::Warmup));
    }

    #[test]
    fn average_defined_from_window_minus_one() {
        let obs = series(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let points = compute(&obs, 3);
        assert_eq!(points[0].moving_average, MovingAverage::Warmup);
        assert_eq!(points[1].moving_average, MovingAverage::Warmup);
        assert_eq!(points[2].moving_average, MovingAverage::Value(2.0));
        assert_eq!(points[3].moving_average, MovingAverage::Value(3.0));
    }

    #[test]
    fn average_matches_hand_computed_mean() {
        let obs = series(&[Some(10.0), Some(12.0), Some(14.0), Some(20.0), Some(24.0)]);
        let points = compute(&obs, 5);
        let avg = points[4].moving_average.value().unwrap();
        assert!((avg - 16.0).abs() < 1e-12, "expected 16.0, got {avg}");
    }

    #[test]
    fn missing_close_inside_window_marks_gap() {
        let obs = series(&[Some(1.0), None, Some(3.0), Some(4.0)]);
        let points = compute(&obs, 3);
        // Windows ending at index 2 and 3 both contain the hole at index 1
        assert_eq!(points[2].moving_average, MovingAverage::Gap);
        assert_eq!(points[3].moving_average, MovingAverage::Gap);
    }

    #[test]
    fn gap_clears_once_window_slides_past_hole() {
        let obs = series(&[None, Some(2.0), Some(4.0), Some(6.0)]);
        let points = compute(&obs, 3);
        assert_eq!(points[2].moving_average, MovingAverage::Gap);
        assert_eq!(points[3].moving_average, MovingAverage::Value(4.0));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(compute(&[], 5).is_empty());
    }

    #[test]
    fn window_of_one_is_the_close_itself() {
        let obs = series(&[Some(7.5), Some(8.5)]);
        let points = compute(&obs, 1);
        assert_eq!(points[0].moving_average, MovingAverage::Value(7.5));
        assert_eq!(points[1].moving_average, MovingAverage::Value(8.5));
    }
}
