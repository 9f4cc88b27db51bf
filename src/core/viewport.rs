use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::formatter::ValueFormatter;
use crate::core::spacing::{IrregularSpacingWarning, detect_spacing};
use crate::core::types::VisibleWindow;
use crate::error::{ChartError, ChartResult};

/// Lifecycle phase of a viewport once it exists.
///
/// The uninitialized phase is represented by the owner holding no viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportPhase {
    Initialized,
    Scrolling,
}

/// Shared, scrollable window over the figure-wide x-axis (the "dragger").
///
/// The axis buffer is never reallocated after initialization: replacements
/// must keep the element count, so handles and slices given to a renderer for
/// one frame stay meaningful for the next.
///
/// Only `initialize` builds a viewport, so it is serializable for debugging
/// but never deserialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    axis: Vec<f64>,
    visible_count: usize,
    update_step: usize,
    cursor: usize,
    timeframe: f64,
    formatter: ValueFormatter,
    spacing_warning: Option<IrregularSpacingWarning>,
    phase: ViewportPhase,
}

impl Viewport {
    /// Creates a viewport over `axis_values` with the cursor at the last element.
    ///
    /// `visible_count == 0` shows the full axis; `update_step == 0` disables
    /// step-based scrolling.
    pub fn initialize(
        axis_values: &[f64],
        visible_count: usize,
        update_step: usize,
    ) -> ChartResult<Self> {
        if axis_values.is_empty() {
            return Err(ChartError::InvalidData(
                "shared x-axis needs at least one value".to_owned(),
            ));
        }

        let report = detect_spacing(axis_values);
        if let Some(warning) = report.warning {
            warn!(
                timeframe = warning.timeframe,
                distinct_spacings = warning.distinct_spacings,
                "x-axis spacing is irregular; using the most frequent spacing"
            );
        }
        debug!(
            len = axis_values.len(),
            visible_count,
            update_step,
            timeframe = report.timeframe,
            "initialize viewport"
        );

        Ok(Self {
            axis: axis_values.to_vec(),
            visible_count,
            update_step,
            cursor: axis_values.len() - 1,
            timeframe: report.timeframe,
            formatter: ValueFormatter::default(),
            spacing_warning: report.warning,
            phase: ViewportPhase::Initialized,
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Number of elements actually on screen, bounded by the axis length.
    #[must_use]
    pub fn effective_visible_count(&self) -> usize {
        if self.visible_count == 0 {
            self.len()
        } else {
            self.visible_count.min(self.len())
        }
    }

    #[must_use]
    pub fn update_step(&self) -> usize {
        self.update_step
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn timeframe(&self) -> f64 {
        self.timeframe
    }

    #[must_use]
    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    #[must_use]
    pub fn spacing_warning(&self) -> Option<IrregularSpacingWarning> {
        self.spacing_warning
    }

    #[must_use]
    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn set_formatter(&mut self, formatter: ValueFormatter) {
        self.formatter = formatter;
    }

    pub fn set_timeframe(&mut self, timeframe: f64) -> ChartResult<()> {
        if !timeframe.is_finite() || timeframe <= 0.0 {
            return Err(ChartError::InvalidData(
                "timeframe must be finite and > 0".to_owned(),
            ));
        }
        self.timeframe = timeframe;
        Ok(())
    }

    /// Lowest cursor position that still fills the visible window.
    #[must_use]
    pub fn min_cursor(&self) -> usize {
        self.effective_visible_count().saturating_sub(1)
    }

    #[must_use]
    pub fn max_cursor(&self) -> usize {
        self.len() - 1
    }

    #[must_use]
    pub fn clamp_position(&self, position: usize) -> usize {
        position.clamp(self.min_cursor(), self.max_cursor())
    }

    /// Visible slice of the axis ending at the cursor.
    #[must_use]
    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow {
            start: self.cursor + 1 - self.effective_visible_count(),
            end: self.cursor,
        }
    }

    #[must_use]
    pub fn visible_axis(&self) -> &[f64] {
        &self.axis[self.visible_window().as_range()]
    }

    /// X range covered on screen, padded by half a timeframe on both sides.
    #[must_use]
    pub fn x_limit(&self) -> (f64, f64) {
        let window = self.visible_window();
        let half = self.timeframe / 2.0;
        (self.axis[window.start] - half, self.axis[window.end] + half)
    }

    /// Replaces the shared axis values in place.
    ///
    /// The length must match; the previous values are kept on error.
    pub fn set_axis(&mut self, values: &[f64]) -> ChartResult<()> {
        if values.len() != self.axis.len() {
            return Err(ChartError::LengthMismatch {
                expected: self.axis.len(),
                actual: values.len(),
            });
        }
        self.axis.copy_from_slice(values);
        trace!(len = values.len(), "replace shared x-axis");
        Ok(())
    }

    /// Checks that a newly plotted artist uses exactly the shared axis.
    pub fn ensure_shared(&self, xdata: &[f64]) -> ChartResult<()> {
        if xdata.len() != self.axis.len() {
            return Err(ChartError::LengthMismatch {
                expected: self.axis.len(),
                actual: xdata.len(),
            });
        }
        match self
            .axis
            .iter()
            .zip(xdata)
            .position(|(shared, candidate)| shared.to_bits() != candidate.to_bits())
        {
            Some(index) => Err(ChartError::AxisAlreadyDiverged { index }),
            None => Ok(()),
        }
    }

    /// Moves the right edge of the visible window to `position` (clamped).
    pub fn advance_to(&mut self, position: usize) -> VisibleWindow {
        self.cursor = self.clamp_position(position);
        self.phase = ViewportPhase::Scrolling;
        let window = self.visible_window();
        trace!(cursor = self.cursor, start = window.start, "advance viewport");
        window
    }

    /// Re-applies the current cursor, e.g. after data replacement.
    pub fn update(&mut self) -> VisibleWindow {
        self.advance_to(self.cursor)
    }

    /// Pans by `steps * update_step` elements; positive steps move back in time.
    ///
    /// Returns `None` when scrolling is disabled or the cursor did not move.
    pub fn pan_by_steps(&mut self, steps: i64) -> Option<VisibleWindow> {
        if self.update_step == 0 || steps == 0 {
            return None;
        }
        let delta = steps.saturating_mul(self.update_step as i64);
        let target = (self.cursor as i64).saturating_sub(delta).max(0) as usize;
        let target = self.clamp_position(target);
        if target == self.cursor {
            return None;
        }
        Some(self.advance_to(target))
    }

    /// Moves the cursor one element forward, if possible.
    pub fn step_forward(&mut self) -> Option<VisibleWindow> {
        (self.cursor < self.max_cursor()).then(|| self.advance_to(self.cursor + 1))
    }

    /// Moves the cursor one element back, if possible.
    pub fn step_backward(&mut self) -> Option<VisibleWindow> {
        (self.cursor > self.min_cursor()).then(|| self.advance_to(self.cursor - 1))
    }

    /// Maps a fractional position inside the visible window to an x value.
    ///
    /// Returns the axis index under the position and the interpolated value,
    /// extrapolating by the timeframe between samples.
    #[must_use]
    pub fn x_at_fraction(&self, fraction: f64) -> (usize, f64) {
        let window = self.visible_window();
        let offset = (fraction.clamp(0.0, 1.0) * window.len() as f64).min(window.len() as f64 - 1.0);
        let index = window.start + offset.floor() as usize;
        let value = self.axis[index] + offset.fract() * self.timeframe;
        (index, value)
    }
}
