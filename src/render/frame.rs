use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AxisLimit, FigureSize, PixelRect, ValueFormatter, VisibleWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Corner of an axes where its legend is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Geometry of a line artist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    /// Connected samples along the shared x-axis.
    Segmented,
    /// Line across the whole axes at a fraction of its height.
    Horizontal(f64),
    /// Line across the whole axes at a fraction of its width.
    Vertical(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArtistKind {
    Line(LineKind),
    Candle,
}

/// Render-side view of one artist.
///
/// `columns` borrow the visible part of each data column (one for lines,
/// open/high/low/close for candles); fractional lines carry no columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistDescriptor<'a> {
    pub kind: ArtistKind,
    pub columns: SmallVec<[&'a [f64]; 4]>,
    pub colors: SmallVec<[Color; 2]>,
    pub thickness: f64,
    pub consider_ylim: bool,
    pub label: Option<&'a str>,
}

impl ArtistDescriptor<'_> {
    fn validate(&self, expected_len: Option<usize>) -> ChartResult<()> {
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(ChartError::InvalidData(
                "artist thickness must be finite and > 0".to_owned(),
            ));
        }
        for color in &self.colors {
            color.validate()?;
        }
        match self.kind {
            ArtistKind::Line(LineKind::Horizontal(pos) | LineKind::Vertical(pos)) => {
                if !(0.0..=1.0).contains(&pos) {
                    return Err(ChartError::InvalidData(
                        "fractional line position must be in [0, 1]".to_owned(),
                    ));
                }
            }
            ArtistKind::Line(LineKind::Segmented) | ArtistKind::Candle => {
                if let Some(expected) = expected_len {
                    if self.columns.iter().any(|column| column.len() != expected) {
                        return Err(ChartError::InvalidData(
                            "artist column does not match the visible window".to_owned(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Shared x-axis state handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggerDescriptor<'a> {
    pub len: usize,
    pub window: VisibleWindow,
    pub visible_axis: &'a [f64],
    pub update_step: usize,
    pub timeframe: f64,
    pub x_limit: (f64, f64),
    pub formatter: &'a ValueFormatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxesFrame<'a> {
    pub label: char,
    pub rect: PixelRect,
    pub title: Option<&'a str>,
    pub facecolor: Color,
    pub y_limit: Option<AxisLimit>,
    pub legend: Option<LegendPosition>,
    pub show_cursor: bool,
    pub artists: Vec<ArtistDescriptor<'a>>,
}

/// Backend-agnostic description of one figure draw pass.
///
/// Data is borrowed from the figure for the duration of the frame; no raw
/// addresses cross this boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    pub size: FigureSize,
    pub background: Color,
    pub window_title: Option<&'a str>,
    pub title: Option<&'a str>,
    pub font_size: u32,
    pub font_spacing: u32,
    pub show_cursors: bool,
    pub dragger: Option<DraggerDescriptor<'a>>,
    pub axes: Vec<AxesFrame<'a>>,
    pub tooltip: Option<String>,
}

impl RenderFrame<'_> {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.size.is_valid() {
            return Err(ChartError::InvalidFigureSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.background.validate()?;

        let expected_len = self.dragger.as_ref().map(|dragger| dragger.window.len());
        for axes in &self.axes {
            axes.facecolor.validate()?;
            for artist in &axes.artists {
                artist.validate(expected_len)?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn artist_count(&self) -> usize {
        self.axes.iter().map(|axes| axes.artists.len()).sum()
    }
}
