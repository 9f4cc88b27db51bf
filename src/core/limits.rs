use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Default fraction of the data span added above and below auto limits.
pub const DEFAULT_MARGIN_RATIO: f64 = 0.05;

/// Closed numeric interval used for y-axis limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimit {
    pub min: f64,
    pub max: f64,
}

impl AxisLimit {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "axis limits must be finite".to_owned(),
            ));
        }
        if min >= max {
            return Err(ChartError::InvalidData(
                "axis limit min must be < max".to_owned(),
            ));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Maps a value to `[0, 1]` where 0 is `min`.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    #[must_use]
    pub fn denormalize(self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }
}

/// Computes padded limits over the finite values of every slice.
///
/// Returns `None` when no slice holds a finite value. A flat series is padded
/// by `margin_ratio` of its magnitude (or by 1 around zero) so the limit keeps
/// a positive span.
#[must_use]
pub fn visible_limit<'a, I>(slices: I, margin_ratio: f64) -> Option<AxisLimit>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for slice in slices {
        for value in slice.iter().copied().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * margin_ratio
    } else if min != 0.0 && margin_ratio > 0.0 {
        min.abs() * margin_ratio
    } else {
        1.0
    };
    Some(AxisLimit {
        min: min - pad,
        max: max + pad,
    })
}
