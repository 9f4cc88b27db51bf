use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::formatter::{DEFAULT_LINEAR_FORMAT, ValueFormatter};
use crate::core::{AxisLimit, PixelRect, VisibleWindow, visible_limit};
use crate::error::{ChartError, ChartResult};
use crate::render::{AxesFrame, Color, LegendPosition, palette_color};

use super::artist::{Artist, ArtistData, LineArtist};

const GRID_COLOR: Color = Color::rgba(0.5, 0.5, 0.5, 0.5);

/// Y-limit mode of an axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum YLimit {
    /// Recomputed from the visible data; `None` until some data is visible.
    Auto(Option<AxisLimit>),
    /// Fixed by the caller.
    Static(AxisLimit),
}

impl YLimit {
    #[must_use]
    pub fn current(self) -> Option<AxisLimit> {
        match self {
            Self::Auto(limit) => limit,
            Self::Static(limit) => Some(limit),
        }
    }
}

/// One subplot region of a figure, owning its artists.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    index: usize,
    label: char,
    title: Option<String>,
    facecolor: Color,
    ylim: YLimit,
    y_formatter: ValueFormatter,
    show_cursor: bool,
    legend: Option<LegendPosition>,
    artists: Vec<Artist>,
    next_palette: usize,
}

impl Axes {
    pub(crate) fn new(index: usize, label: char) -> Self {
        Self {
            index,
            label,
            title: None,
            facecolor: Color::WHITE,
            ylim: YLimit::Auto(None),
            y_formatter: ValueFormatter::Linear(DEFAULT_LINEAR_FORMAT.to_owned()),
            show_cursor: false,
            legend: None,
            artists: Vec::new(),
            next_palette: 0,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn label(&self) -> char {
        self.label
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    #[must_use]
    pub fn facecolor(&self) -> Color {
        self.facecolor
    }

    pub fn set_facecolor(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.facecolor = color;
        Ok(())
    }

    #[must_use]
    pub fn ylim(&self) -> YLimit {
        self.ylim
    }

    #[must_use]
    pub fn y_limit(&self) -> Option<AxisLimit> {
        self.ylim.current()
    }

    /// Fixes the y-limit; automatic limits stay off until `clear_ylim`.
    pub fn set_ylim(&mut self, min: f64, max: f64) -> ChartResult<()> {
        self.ylim = YLimit::Static(AxisLimit::new(min, max)?);
        Ok(())
    }

    pub fn clear_ylim(&mut self) {
        self.ylim = YLimit::Auto(None);
    }

    #[must_use]
    pub fn y_formatter(&self) -> &ValueFormatter {
        &self.y_formatter
    }

    pub fn set_y_formatter(&mut self, formatter: ValueFormatter) {
        self.y_formatter = formatter;
    }

    #[must_use]
    pub fn cursor_shown(&self) -> bool {
        self.show_cursor
    }

    pub fn show_cursor(&mut self, show: bool) {
        self.show_cursor = show;
    }

    #[must_use]
    pub fn legend(&self) -> Option<LegendPosition> {
        self.legend
    }

    pub fn show_legend(&mut self, position: LegendPosition) {
        self.legend = Some(position);
    }

    pub fn hide_legend(&mut self) {
        self.legend = None;
    }

    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    #[must_use]
    pub fn has_artists(&self) -> bool {
        !self.artists.is_empty()
    }

    /// Adds a horizontal guide line at `ypos` (fraction of the height).
    pub fn h_line(&mut self, ypos: f64) -> ChartResult<usize> {
        let line = LineArtist::horizontal(ypos)?;
        self.push_artist(line.into())
    }

    /// Adds a vertical guide line at `xpos` (fraction of the width).
    pub fn v_line(&mut self, xpos: f64) -> ChartResult<usize> {
        let line = LineArtist::vertical(xpos)?;
        self.push_artist(line.into())
    }

    /// Splits the axes into `xlen` by `ylen` cells with guide lines.
    pub fn grid(&mut self, xlen: usize, ylen: usize) -> ChartResult<()> {
        if xlen == 0 || ylen == 0 {
            return Err(ChartError::InvalidData(
                "grid cell counts must be > 0".to_owned(),
            ));
        }
        for i in 1..xlen {
            let line = LineArtist::vertical(i as f64 / xlen as f64)?.with_color(GRID_COLOR);
            self.push_artist(line.into())?;
        }
        for j in 1..ylen {
            let line = LineArtist::horizontal(j as f64 / ylen as f64)?.with_color(GRID_COLOR);
            self.push_artist(line.into())?;
        }
        Ok(())
    }

    pub(crate) fn artist_mut(&mut self, index: usize) -> ChartResult<&mut Artist> {
        let axes = self.index;
        self.artists
            .get_mut(index)
            .ok_or(ChartError::UnknownArtist { axes, index })
    }

    pub(crate) fn artist(&self, index: usize) -> ChartResult<&Artist> {
        self.artists.get(index).ok_or(ChartError::UnknownArtist {
            axes: self.index,
            index,
        })
    }

    /// Stores a validated artist, assigning the next palette color to lines
    /// without one.
    pub(crate) fn push_artist(&mut self, mut artist: Artist) -> ChartResult<usize> {
        artist.validate()?;
        if let Artist::Line(line) = &mut artist {
            if line.color().is_none() {
                line.assign_default_color(palette_color(self.next_palette));
                self.next_palette += 1;
            }
        }
        self.artists.push(artist);
        trace!(axes = self.index, artists = self.artists.len(), "push artist");
        Ok(self.artists.len() - 1)
    }

    /// Recomputes automatic limits over the visible part of every artist
    /// that takes part in y-limits.
    pub(crate) fn refresh_limits(&mut self, window: VisibleWindow, margin_ratio: f64) {
        if let YLimit::Auto(_) = self.ylim {
            let limit = visible_limit(
                self.artists
                    .iter()
                    .filter(|artist| artist.consider_ylim())
                    .flat_map(|artist| artist.visible_columns(window)),
                margin_ratio,
            );
            self.ylim = YLimit::Auto(limit);
        }
    }

    pub(crate) fn frame<'a>(
        &'a self,
        rect: PixelRect,
        window: Option<VisibleWindow>,
        show_cursors: bool,
    ) -> AxesFrame<'a> {
        AxesFrame {
            label: self.label,
            rect,
            title: self.title.as_deref(),
            facecolor: self.facecolor,
            y_limit: self.y_limit(),
            legend: self.legend,
            show_cursor: show_cursors || self.show_cursor,
            artists: self
                .artists
                .iter()
                .map(|artist| artist.render_descriptor(window))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Axes, YLimit};
    use crate::api::artist::{Artist, LineArtist};
    use crate::core::{Series, VisibleWindow};
    use crate::render::palette_color;

    #[test]
    fn lines_cycle_palette_colors() {
        let mut axes = Axes::new(0, 'a');
        let series = Series::from_values(Some("y"), vec![1.0, 2.0]);
        for _ in 0..2 {
            axes.push_artist(LineArtist::from_series(&series).into())
                .expect("push");
        }
        let colors: Vec<_> = axes
            .artists()
            .iter()
            .map(|artist| match artist {
                Artist::Line(line) => line.color(),
                Artist::Candle(_) => None,
            })
            .collect();
        assert_eq!(colors, vec![Some(palette_color(0)), Some(palette_color(1))]);
    }

    #[test]
    fn static_limits_survive_refresh() {
        let mut axes = Axes::new(0, 'a');
        let series = Series::from_values(Some("y"), vec![1.0, 5.0, 3.0]);
        axes.push_artist(LineArtist::from_series(&series).into())
            .expect("push");

        let window = VisibleWindow { start: 0, end: 2 };
        axes.refresh_limits(window, 0.0);
        let auto = axes.y_limit().expect("auto limit");
        assert_eq!((auto.min, auto.max), (1.0, 5.0));

        axes.set_ylim(-1.0, 1.0).expect("static");
        axes.refresh_limits(window, 0.0);
        assert!(matches!(axes.ylim(), YLimit::Static(limit) if limit.max == 1.0));

        axes.clear_ylim();
        assert_eq!(axes.y_limit(), None);
    }

    #[test]
    fn grid_adds_guide_lines_ignored_by_limits() {
        let mut axes = Axes::new(0, 'a');
        axes.grid(4, 2).expect("grid");
        assert_eq!(axes.artists().len(), 4);
        axes.refresh_limits(VisibleWindow { start: 0, end: 0 }, 0.05);
        assert_eq!(axes.y_limit(), None);
        assert!(axes.grid(0, 1).is_err());
    }
}
