use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::{DataFrame, Series, VisibleWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::{ArtistDescriptor, ArtistKind, Color, LineKind};

pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
pub const DEFAULT_CANDLE_WIDTH: f64 = 1.0;
pub const CANDLE_COLUMN_COUNT: usize = 4;

/// Candle color when close < open.
pub const DEFAULT_DOWN_COLOR: [u8; 4] = [255, 0, 0, 255];
/// Candle color when close >= open.
pub const DEFAULT_UP_COLOR: [u8; 4] = [44, 160, 44, 255];

/// Stable address of an artist inside a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistId {
    pub axes: usize,
    pub index: usize,
}

/// Capability shared by every artist kind.
///
/// Replacement is split into a validating `prepare_replacement` and an
/// infallible `apply_replacement` so batch updates can check every artist
/// before touching any buffer.
pub trait ArtistData {
    /// Names of the frame columns this artist reads on replacement.
    fn data_columns(&self) -> SmallVec<[&str; 4]>;

    /// Number of samples per data column.
    fn row_count(&self) -> usize;

    fn consider_ylim(&self) -> bool;

    /// Visible part of each data column.
    fn visible_columns(&self, window: VisibleWindow) -> SmallVec<[&[f64]; 4]>;

    fn render_descriptor(&self, window: Option<VisibleWindow>) -> ArtistDescriptor<'_>;

    /// Validates `frame` and returns the buffer that would replace the data.
    fn prepare_replacement(&self, frame: &DataFrame) -> ChartResult<Vec<f64>>;

    /// Installs a buffer returned by `prepare_replacement`.
    fn apply_replacement(&mut self, buffer: Vec<f64>);

    fn replace_data(&mut self, frame: &DataFrame) -> ChartResult<()> {
        let buffer = self.prepare_replacement(frame)?;
        self.apply_replacement(buffer);
        Ok(())
    }
}

fn validate_width(width: f64) -> ChartResult<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(ChartError::InvalidData(
            "artist width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

fn validate_fraction(position: f64) -> ChartResult<()> {
    if !position.is_finite() || !(0.0..=1.0).contains(&position) {
        return Err(ChartError::InvalidData(
            "fractional line position must be in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

/// Line plotted along the shared axis, or a horizontal/vertical guide line
/// at a fraction of its axes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineArtist {
    kind: LineKind,
    xdata: Option<Vec<f64>>,
    ydata: Vec<f64>,
    source: Option<String>,
    label: Option<String>,
    color: Option<Color>,
    width: f64,
    consider_ylim: bool,
}

impl LineArtist {
    /// Segmented line over the series values; the series index becomes its
    /// x data.
    #[must_use]
    pub fn from_series(series: &Series) -> Self {
        Self {
            kind: LineKind::Segmented,
            xdata: Some(series.index().to_vec()),
            ydata: series.values().to_vec(),
            source: series.name().map(str::to_owned),
            label: None,
            color: None,
            width: DEFAULT_LINE_WIDTH,
            consider_ylim: true,
        }
    }

    /// Horizontal line at `ypos` (fraction of the axes height).
    pub fn horizontal(ypos: f64) -> ChartResult<Self> {
        validate_fraction(ypos)?;
        Ok(Self::guide(LineKind::Horizontal(ypos)))
    }

    /// Vertical line at `xpos` (fraction of the axes width).
    pub fn vertical(xpos: f64) -> ChartResult<Self> {
        validate_fraction(xpos)?;
        Ok(Self::guide(LineKind::Vertical(xpos)))
    }

    fn guide(kind: LineKind) -> Self {
        Self {
            kind,
            xdata: None,
            ydata: Vec::new(),
            source: None,
            label: None,
            color: None,
            width: DEFAULT_LINE_WIDTH,
            consider_ylim: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    /// Uses the source series name as legend label.
    #[must_use]
    pub fn label_from_data(mut self) -> Self {
        self.label = self.source.clone();
        self
    }

    #[must_use]
    pub fn with_ylim_consider(mut self, consider: bool) -> Self {
        self.consider_ylim = consider;
        self
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    #[must_use]
    pub fn ydata(&self) -> &[f64] {
        &self.ydata
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    pub(crate) fn assign_default_color(&mut self, color: Color) {
        self.color.get_or_insert(color);
    }
}

impl ArtistData for LineArtist {
    fn data_columns(&self) -> SmallVec<[&str; 4]> {
        match (self.kind, self.source.as_deref()) {
            (LineKind::Segmented, Some(source)) => smallvec![source],
            _ => SmallVec::new(),
        }
    }

    fn row_count(&self) -> usize {
        self.ydata.len()
    }

    fn consider_ylim(&self) -> bool {
        self.consider_ylim && self.kind == LineKind::Segmented
    }

    fn visible_columns(&self, window: VisibleWindow) -> SmallVec<[&[f64]; 4]> {
        match self.kind {
            LineKind::Segmented => window.slice(&self.ydata).into_iter().collect(),
            LineKind::Horizontal(_) | LineKind::Vertical(_) => SmallVec::new(),
        }
    }

    fn render_descriptor(&self, window: Option<VisibleWindow>) -> ArtistDescriptor<'_> {
        let columns = match window {
            Some(window) => self.visible_columns(window),
            None => SmallVec::new(),
        };
        ArtistDescriptor {
            kind: ArtistKind::Line(self.kind),
            columns,
            colors: self.color.into_iter().collect(),
            thickness: self.width,
            consider_ylim: self.consider_ylim(),
            label: self.label.as_deref(),
        }
    }

    fn prepare_replacement(&self, frame: &DataFrame) -> ChartResult<Vec<f64>> {
        let source = match (self.kind, self.source.as_deref()) {
            (LineKind::Segmented, Some(source)) => source,
            (LineKind::Segmented, None) => {
                return Err(ChartError::InvalidData(
                    "line has no source column to replace from".to_owned(),
                ));
            }
            _ => {
                return Err(ChartError::InvalidData(
                    "horizontal and vertical lines hold no data".to_owned(),
                ));
            }
        };
        let values = frame
            .column(source)
            .ok_or_else(|| ChartError::MissingColumns(vec![source.to_owned()]))?;
        if values.len() != self.ydata.len() {
            return Err(ChartError::LengthMismatch {
                expected: self.ydata.len(),
                actual: values.len(),
            });
        }
        Ok(values.to_vec())
    }

    fn apply_replacement(&mut self, buffer: Vec<f64>) {
        if buffer.len() == self.ydata.len() {
            self.ydata.copy_from_slice(&buffer);
        }
    }
}

/// Candlestick artist over an open/high/low/close table.
///
/// The four columns live in one column-major buffer of `4 * len` values.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleArtist {
    xdata: Option<Vec<f64>>,
    data: Vec<f64>,
    len: usize,
    columns: [String; CANDLE_COLUMN_COUNT],
    label: Option<String>,
    up_color: Color,
    down_color: Color,
    width: f64,
    consider_ylim: bool,
}

impl CandleArtist {
    /// Builds a candle artist from a frame with exactly four columns, read
    /// as open, high, low and close in column order.
    pub fn from_frame(frame: &DataFrame) -> ChartResult<Self> {
        if frame.column_count() != CANDLE_COLUMN_COUNT {
            return Err(ChartError::ColumnCount {
                expected: CANDLE_COLUMN_COUNT,
                actual: frame.column_count(),
            });
        }
        let names: Vec<&str> = frame.column_names().collect();
        let columns = [0, 1, 2, 3].map(|i| names[i].to_owned());

        let mut data = Vec::with_capacity(CANDLE_COLUMN_COUNT * frame.len());
        for name in &names {
            if let Some(values) = frame.column(name) {
                data.extend_from_slice(values);
            }
        }

        let [down_r, down_g, down_b, down_a] = DEFAULT_DOWN_COLOR;
        let [up_r, up_g, up_b, up_a] = DEFAULT_UP_COLOR;
        Ok(Self {
            xdata: Some(frame.index().to_vec()),
            data,
            len: frame.len(),
            columns,
            label: None,
            up_color: Color::from_rgba8(up_r, up_g, up_b, up_a),
            down_color: Color::from_rgba8(down_r, down_g, down_b, down_a),
            width: DEFAULT_CANDLE_WIDTH,
            consider_ylim: true,
        })
    }

    #[must_use]
    pub fn with_colors(mut self, up: Color, down: Color) -> Self {
        self.up_color = up;
        self.down_color = down;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_owned());
        self
    }

    /// Labels the artist `Candlestick(o,h,l,c)` from its column names.
    #[must_use]
    pub fn label_from_data(mut self) -> Self {
        self.label = Some(format!("Candlestick({})", self.columns.join(",")));
        self
    }

    #[must_use]
    pub fn with_ylim_consider(mut self, consider: bool) -> Self {
        self.consider_ylim = consider;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full column `index` (0 = open .. 3 = close).
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        (index < CANDLE_COLUMN_COUNT).then(|| &self.data[index * self.len..(index + 1) * self.len])
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn colors(&self) -> (Color, Color) {
        (self.up_color, self.down_color)
    }
}

impl ArtistData for CandleArtist {
    fn data_columns(&self) -> SmallVec<[&str; 4]> {
        self.columns.iter().map(String::as_str).collect()
    }

    fn row_count(&self) -> usize {
        self.len
    }

    fn consider_ylim(&self) -> bool {
        self.consider_ylim
    }

    fn visible_columns(&self, window: VisibleWindow) -> SmallVec<[&[f64]; 4]> {
        (0..CANDLE_COLUMN_COUNT)
            .filter_map(|index| self.column(index).and_then(|column| window.slice(column)))
            .collect()
    }

    fn render_descriptor(&self, window: Option<VisibleWindow>) -> ArtistDescriptor<'_> {
        let columns = match window {
            Some(window) => self.visible_columns(window),
            None => SmallVec::new(),
        };
        ArtistDescriptor {
            kind: ArtistKind::Candle,
            columns,
            colors: smallvec![self.up_color, self.down_color],
            thickness: self.width,
            consider_ylim: self.consider_ylim,
            label: self.label.as_deref(),
        }
    }

    fn prepare_replacement(&self, frame: &DataFrame) -> ChartResult<Vec<f64>> {
        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|name| !frame.contains_column(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ChartError::MissingColumns(missing));
        }
        if frame.len() != self.len {
            return Err(ChartError::LengthMismatch {
                expected: self.len,
                actual: frame.len(),
            });
        }

        let mut buffer = Vec::with_capacity(self.data.len());
        for name in &self.columns {
            if let Some(values) = frame.column(name) {
                buffer.extend_from_slice(values);
            }
        }
        Ok(buffer)
    }

    fn apply_replacement(&mut self, buffer: Vec<f64>) {
        if buffer.len() == self.data.len() {
            self.data.copy_from_slice(&buffer);
        }
    }
}

/// Closed set of artist kinds an axes can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line(LineArtist),
    Candle(CandleArtist),
}

impl Artist {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Line(line) => line.label(),
            Self::Candle(candle) => candle.label(),
        }
    }

    pub(crate) fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Line(line) => {
                validate_width(line.width)?;
                if let Some(color) = line.color {
                    color.validate()?;
                }
                if let Some(xdata) = &line.xdata {
                    if xdata.len() != line.ydata.len() {
                        return Err(ChartError::LengthMismatch {
                            expected: xdata.len(),
                            actual: line.ydata.len(),
                        });
                    }
                }
                Ok(())
            }
            Self::Candle(candle) => {
                validate_width(candle.width)?;
                if let Some(xdata) = &candle.xdata {
                    if xdata.len() != candle.len {
                        return Err(ChartError::LengthMismatch {
                            expected: xdata.len(),
                            actual: candle.len,
                        });
                    }
                }
                candle.up_color.validate()?;
                candle.down_color.validate()
            }
        }
    }

    /// X coordinates not yet merged into a figure's shared axis.
    pub(crate) fn xdata(&self) -> Option<&[f64]> {
        match self {
            Self::Line(line) => line.xdata.as_deref(),
            Self::Candle(candle) => candle.xdata.as_deref(),
        }
    }

    pub(crate) fn take_xdata(&mut self) -> Option<Vec<f64>> {
        match self {
            Self::Line(line) => line.xdata.take(),
            Self::Candle(candle) => candle.xdata.take(),
        }
    }

    fn inner(&self) -> &dyn ArtistData {
        match self {
            Self::Line(line) => line,
            Self::Candle(candle) => candle,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ArtistData {
        match self {
            Self::Line(line) => line,
            Self::Candle(candle) => candle,
        }
    }
}

impl From<LineArtist> for Artist {
    fn from(value: LineArtist) -> Self {
        Self::Line(value)
    }
}

impl From<CandleArtist> for Artist {
    fn from(value: CandleArtist) -> Self {
        Self::Candle(value)
    }
}

impl ArtistData for Artist {
    fn data_columns(&self) -> SmallVec<[&str; 4]> {
        self.inner().data_columns()
    }

    fn row_count(&self) -> usize {
        self.inner().row_count()
    }

    fn consider_ylim(&self) -> bool {
        self.inner().consider_ylim()
    }

    fn visible_columns(&self, window: VisibleWindow) -> SmallVec<[&[f64]; 4]> {
        self.inner().visible_columns(window)
    }

    fn render_descriptor(&self, window: Option<VisibleWindow>) -> ArtistDescriptor<'_> {
        self.inner().render_descriptor(window)
    }

    fn prepare_replacement(&self, frame: &DataFrame) -> ChartResult<Vec<f64>> {
        self.inner().prepare_replacement(frame)
    }

    fn apply_replacement(&mut self, buffer: Vec<f64>) {
        self.inner_mut().apply_replacement(buffer);
    }
}
