use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[cfg(feature = "parallel-limits")]
use rayon::prelude::*;

use crate::core::{
    DataFrame, FormatterKind, LayoutMetrics, MosaicLayout, PixelRect, ValueFormatter, Viewport,
    VisibleWindow,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{AxesHitBox, InputEvent, InteractionContext, InteractionState, PanIntent};
use crate::render::LegendPosition;

use super::artist::{Artist, ArtistData, ArtistId};
use super::axes::Axes;
use super::figure_config::FigureConfig;

/// Lifecycle of a figure window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FigureState {
    /// No render loop started yet.
    Open,
    /// A render loop is running.
    Showing,
    /// The window was closed; every mutating call fails with `WindowClosed`.
    Closed,
}

/// A window made of mosaic-laid-out axes sharing one scrollable x-axis.
///
/// The shared axis (the viewport) does not exist until the first artist with
/// x data is plotted; every later artist must use exactly the same x values.
#[derive(Debug)]
pub struct Figure {
    layout: MosaicLayout,
    config: FigureConfig,
    axes: Vec<Axes>,
    rects: Vec<PixelRect>,
    viewport: Option<Viewport>,
    title: Option<String>,
    show_cursors: bool,
    interaction: InteractionState,
    state: FigureState,
}

impl Figure {
    /// Resolves `mosaic` and creates one axes per label in first-appearance
    /// order.
    pub fn new(mosaic: &str, config: FigureConfig) -> ChartResult<Self> {
        let layout = MosaicLayout::parse(mosaic)?;
        Self::from_layout(layout, config)
    }

    pub fn from_layout(layout: MosaicLayout, config: FigureConfig) -> ChartResult<Self> {
        config.validate()?;
        let rects = layout.pixel_rects(metrics(&config, false))?;
        let axes = layout
            .labels()
            .enumerate()
            .map(|(index, label)| Axes::new(index, label))
            .collect();

        debug!(
            rows = layout.rows(),
            cols = layout.cols(),
            axes = layout.len(),
            width = config.size.width,
            height = config.size.height,
            "create figure"
        );
        Ok(Self {
            layout,
            config,
            axes,
            rects,
            viewport: None,
            title: None,
            show_cursors: false,
            interaction: InteractionState::default(),
            state: FigureState::Open,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &MosaicLayout {
        &self.layout
    }

    #[must_use]
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Pixel rectangle of every axes, in axes order.
    #[must_use]
    pub fn rects(&self) -> &[PixelRect] {
        &self.rects
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn cursors_shown(&self) -> bool {
        self.show_cursors
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    #[must_use]
    pub fn state(&self) -> FigureState {
        self.state
    }

    #[must_use]
    pub fn is_window_closed(&self) -> bool {
        self.state == FigureState::Closed
    }

    pub(crate) fn ensure_open(&self) -> ChartResult<()> {
        if self.is_window_closed() {
            return Err(ChartError::WindowClosed);
        }
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: FigureState) {
        debug!(from = ?self.state, to = ?state, "figure state change");
        self.state = state;
    }

    #[must_use]
    pub fn axes_count(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self, index: usize) -> ChartResult<&Axes> {
        self.axes.get(index).ok_or(ChartError::UnknownAxes(index))
    }

    pub fn axes_mut(&mut self, index: usize) -> ChartResult<&mut Axes> {
        self.ensure_open()?;
        self.axes.get_mut(index).ok_or(ChartError::UnknownAxes(index))
    }

    #[must_use]
    pub fn axes_by_label(&self, label: char) -> Option<&Axes> {
        self.layout
            .index_of(label)
            .and_then(|index| self.axes.get(index))
    }

    pub fn axes_by_label_mut(&mut self, label: char) -> ChartResult<&mut Axes> {
        self.ensure_open()?;
        let index = self
            .layout
            .index_of(label)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown axes label '{label}'")))?;
        self.axes_mut(index)
    }

    pub fn artist(&self, id: ArtistId) -> ChartResult<&Artist> {
        self.axes(id.axes)?.artist(id.index)
    }

    /// Plots `artist` on axes `axes`.
    ///
    /// The first artist carrying x data establishes the shared axis using the
    /// configured visible count, update step and x formatter. Later artists
    /// must match it: a different length fails with `LengthMismatch`, the
    /// same length with other values fails with `AxisAlreadyDiverged`.
    pub fn plot(&mut self, axes: usize, artist: impl Into<Artist>) -> ChartResult<ArtistId> {
        self.ensure_open()?;
        if axes >= self.axes.len() {
            return Err(ChartError::UnknownAxes(axes));
        }
        let mut artist = artist.into();
        artist.validate()?;

        let new_viewport = match (artist.xdata(), &self.viewport) {
            (Some(xdata), Some(viewport)) => {
                viewport.ensure_shared(xdata)?;
                None
            }
            (Some(xdata), None) => Some(
                Viewport::initialize(xdata, self.config.visible_count, self.config.update_step)?
                    .with_formatter(self.config.x_formatter.clone()),
            ),
            (None, _) if artist.row_count() > 0 => {
                return Err(ChartError::InvalidData(
                    "artist holds data but no x coordinates".to_owned(),
                ));
            }
            (None, _) => None,
        };
        let axis_len = new_viewport
            .as_ref()
            .or(self.viewport.as_ref())
            .map(Viewport::len);
        if let Some(expected) = axis_len.filter(|_| artist.row_count() > 0) {
            if artist.row_count() != expected {
                return Err(ChartError::LengthMismatch {
                    expected,
                    actual: artist.row_count(),
                });
            }
        }

        artist.take_xdata();
        let index = self.axes[axes].push_artist(artist)?;
        if let Some(viewport) = new_viewport {
            self.viewport = Some(viewport);
        }
        debug!(axes, index, "plot artist");
        self.refresh_limits();
        Ok(ArtistId { axes, index })
    }

    /// Replaces the shared x-axis values in place; the length must not change.
    pub fn set_xdata(&mut self, values: &[f64]) -> ChartResult<()> {
        self.ensure_open()?;
        let viewport = self.viewport.as_mut().ok_or(ChartError::NoSharedAxis)?;
        viewport.set_axis(values)?;
        debug!(len = values.len(), "set shared x data");
        Ok(())
    }

    /// Replaces one artist's data from `frame` and refreshes limits.
    pub fn replace_artist_data(&mut self, id: ArtistId, frame: &DataFrame) -> ChartResult<()> {
        self.ensure_open()?;
        self.axes
            .get_mut(id.axes)
            .ok_or(ChartError::UnknownAxes(id.axes))?
            .artist_mut(id.index)?
            .replace_data(frame)?;
        self.refresh_limits();
        Ok(())
    }

    pub(crate) fn apply_artist_buffer(&mut self, id: ArtistId, buffer: Vec<f64>) -> ChartResult<()> {
        self.axes
            .get_mut(id.axes)
            .ok_or(ChartError::UnknownAxes(id.axes))?
            .artist_mut(id.index)?
            .apply_replacement(buffer);
        Ok(())
    }

    /// Scrolls so the visible window ends at `position` (clamped).
    pub fn update_from_position(&mut self, position: usize) -> ChartResult<VisibleWindow> {
        self.ensure_open()?;
        let viewport = self.viewport.as_mut().ok_or(ChartError::NoSharedAxis)?;
        let window = viewport.advance_to(position);
        self.refresh_limits();
        Ok(window)
    }

    /// Refreshes the visible window and limits at the current cursor.
    pub fn update(&mut self) -> ChartResult<VisibleWindow> {
        self.ensure_open()?;
        let viewport = self.viewport.as_mut().ok_or(ChartError::NoSharedAxis)?;
        let window = viewport.update();
        self.refresh_limits();
        Ok(window)
    }

    /// Sets the x formatter; `Null` takes no template, the others need one.
    pub fn set_xformatter(&mut self, kind: FormatterKind, format: Option<&str>) -> ChartResult<()> {
        self.ensure_open()?;
        let formatter = ValueFormatter::new(kind, format)?;
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.set_formatter(formatter.clone());
        }
        self.config.x_formatter = formatter;
        Ok(())
    }

    pub fn set_timeframe(&mut self, timeframe: f64) -> ChartResult<()> {
        self.ensure_open()?;
        self.viewport
            .as_mut()
            .ok_or(ChartError::NoSharedAxis)?
            .set_timeframe(timeframe)
    }

    /// Sets the figure title; axes move down to make room for it.
    pub fn set_title(&mut self, title: &str) -> ChartResult<()> {
        self.ensure_open()?;
        let rects = self.layout.pixel_rects(metrics(&self.config, true))?;
        self.rects = rects;
        self.title = Some(title.to_owned());
        Ok(())
    }

    pub fn show_cursors(&mut self, show: bool) -> ChartResult<()> {
        self.ensure_open()?;
        self.show_cursors = show;
        Ok(())
    }

    /// Shows the legend of every axes at `position`.
    pub fn show_legend(&mut self, position: LegendPosition) -> ChartResult<()> {
        self.ensure_open()?;
        for axes in &mut self.axes {
            axes.show_legend(position);
        }
        Ok(())
    }

    /// Applies one input event. Returns the new window when the view moved.
    ///
    /// Navigation is only active when the figure has a shared axis and a
    /// non-zero update step; the pointer position is always tracked.
    pub fn handle_input(&mut self, event: InputEvent) -> ChartResult<Option<VisibleWindow>> {
        self.ensure_open()?;
        let hit_boxes: Vec<AxesHitBox> = self
            .rects
            .iter()
            .zip(&self.axes)
            .map(|(rect, axes)| AxesHitBox {
                rect: *rect,
                active: axes.has_artists(),
            })
            .collect();
        let (x_span, timeframe) = self.viewport.as_ref().map_or((0.0, 0.0), |viewport| {
            let (min, max) = viewport.x_limit();
            (max - min, viewport.timeframe())
        });
        let context = InteractionContext {
            axes: &hit_boxes,
            x_span,
            timeframe,
        };
        let intent = self.interaction.on_event(event, &context);

        let Some(viewport) = self.viewport.as_mut() else {
            return Ok(None);
        };
        if viewport.update_step() == 0 {
            return Ok(None);
        }
        let moved = match intent {
            Some(PanIntent::Steps(steps)) => viewport.pan_by_steps(steps),
            Some(PanIntent::StepForward) => viewport.step_forward(),
            Some(PanIntent::StepBackward) => viewport.step_backward(),
            None => None,
        };
        if let Some(window) = moved {
            trace!(?event, start = window.start, end = window.end, "input moved view");
            self.refresh_limits();
        }
        Ok(moved)
    }

    fn refresh_limits(&mut self) {
        let Some(window) = self.viewport.as_ref().map(Viewport::visible_window) else {
            return;
        };
        let margin = self.config.ylim_margin_ratio;

        #[cfg(feature = "parallel-limits")]
        {
            self.axes
                .par_iter_mut()
                .for_each(|axes| axes.refresh_limits(window, margin));
        }

        #[cfg(not(feature = "parallel-limits"))]
        {
            for axes in &mut self.axes {
                axes.refresh_limits(window, margin);
            }
        }
    }
}

fn metrics(config: &FigureConfig, has_title: bool) -> LayoutMetrics {
    LayoutMetrics {
        size: config.size,
        border_percentage: config.border_percentage,
        font_size: config.font_size,
        has_title,
    }
}
