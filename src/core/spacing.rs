use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Timeframe used when an axis has no positive spacing to learn from.
pub const FALLBACK_TIMEFRAME: f64 = 1.0;

/// Non-fatal notice that consecutive x values are not evenly spaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrregularSpacingWarning {
    /// Modal spacing that will be used as the timeframe.
    pub timeframe: f64,
    /// Number of distinct spacings observed between consecutive values.
    pub distinct_spacings: usize,
}

/// Spacing statistics of an x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingReport {
    pub timeframe: f64,
    pub warning: Option<IrregularSpacingWarning>,
}

/// Detects the modal spacing between consecutive axis values.
///
/// Non-finite values are dropped before differencing, so a gap in the axis
/// does not hide the spacing around it. Only positive differences vote for
/// the timeframe; ties resolve to the smallest spacing. Irregularity is judged
/// over every distinct difference.
#[must_use]
pub fn detect_spacing(values: &[f64]) -> SpacingReport {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let mut distinct: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for pair in finite.windows(2) {
        let diff = pair[1] - pair[0];
        if diff.is_finite() {
            *distinct.entry(OrderedFloat(diff)).or_default() += 1;
        }
    }

    let mut timeframe = FALLBACK_TIMEFRAME;
    let mut best_count = 0;
    for (spacing, count) in distinct.range(OrderedFloat(0.0)..) {
        // Ascending iteration keeps the smallest spacing on ties.
        if spacing.0 > 0.0 && *count > best_count {
            best_count = *count;
            timeframe = spacing.0;
        }
    }

    let warning = (distinct.len() > 1).then_some(IrregularSpacingWarning {
        timeframe,
        distinct_spacings: distinct.len(),
    });

    SpacingReport { timeframe, warning }
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_TIMEFRAME, detect_spacing};

    #[test]
    fn regular_axis_has_no_warning() {
        let report = detect_spacing(&[0.0, 60.0, 120.0, 180.0]);
        assert_eq!(report.timeframe, 60.0);
        assert!(report.warning.is_none());
    }

    #[test]
    fn modal_spacing_wins_and_warns() {
        let report = detect_spacing(&[0.0, 60.0, 120.0, 300.0, 360.0]);
        assert_eq!(report.timeframe, 60.0);
        let warning = report.warning.expect("irregular spacing");
        assert_eq!(warning.distinct_spacings, 2);
    }

    #[test]
    fn ties_prefer_the_smallest_spacing() {
        let report = detect_spacing(&[0.0, 10.0, 15.0, 25.0, 30.0]);
        assert_eq!(report.timeframe, 5.0);
    }

    #[test]
    fn non_finite_values_are_dropped_before_differencing() {
        let report = detect_spacing(&[0.0, f64::NAN, 20.0, 30.0]);
        assert_eq!(report.timeframe, 10.0);
        let warning = report.warning.expect("diffs 20 and 10");
        assert_eq!(warning.distinct_spacings, 2);

        let report = detect_spacing(&[0.0, 10.0, f64::INFINITY, 20.0, 30.0]);
        assert_eq!(report.timeframe, 10.0);
        assert!(report.warning.is_none());
    }

    #[test]
    fn repeated_values_count_as_irregular_and_single_value_falls_back() {
        let report = detect_spacing(&[0.0, 10.0, 10.0, 20.0]);
        assert_eq!(report.timeframe, 10.0);
        assert_eq!(report.warning.map(|w| w.distinct_spacings), Some(2));

        assert_eq!(detect_spacing(&[42.0]).timeframe, FALLBACK_TIMEFRAME);
        assert!(detect_spacing(&[42.0]).warning.is_none());
    }
}
