use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_MARGIN_RATIO, FigureSize, ValueFormatter};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Public figure bootstrap configuration.
///
/// This type is serializable so host applications can persist and reload a
/// figure setup. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    #[serde(default)]
    pub size: FigureSize,
    #[serde(default)]
    pub window_title: Option<String>,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_border_percentage")]
    pub border_percentage: f64,
    /// Elements shown at once; `0` shows the full axis.
    #[serde(default)]
    pub visible_count: usize,
    /// Elements moved per pan step; `0` disables interactive scrolling.
    #[serde(default)]
    pub update_step: usize,
    /// Target frames per second of the render loop; `0` renders unthrottled.
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_spacing")]
    pub font_spacing: u32,
    #[serde(default = "default_ylim_margin_ratio")]
    pub ylim_margin_ratio: f64,
    #[serde(default)]
    pub x_formatter: ValueFormatter,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            size: FigureSize::default(),
            window_title: None,
            background: default_background(),
            border_percentage: default_border_percentage(),
            visible_count: 0,
            update_step: 0,
            fps: default_fps(),
            font_size: default_font_size(),
            font_spacing: default_font_spacing(),
            ylim_margin_ratio: default_ylim_margin_ratio(),
            x_formatter: ValueFormatter::default(),
        }
    }
}

impl FigureConfig {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: FigureSize::new(width, height),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_window_title(mut self, title: &str) -> Self {
        self.window_title = Some(title.to_owned());
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_border_percentage(mut self, border_percentage: f64) -> Self {
        self.border_percentage = border_percentage;
        self
    }

    /// Sets the visible element count and the pan step size.
    #[must_use]
    pub fn with_scrolling(mut self, visible_count: usize, update_step: usize) -> Self {
        self.visible_count = visible_count;
        self.update_step = update_step;
        self
    }

    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font_size: u32, font_spacing: u32) -> Self {
        self.font_size = font_size;
        self.font_spacing = font_spacing;
        self
    }

    #[must_use]
    pub fn with_ylim_margin_ratio(mut self, ratio: f64) -> Self {
        self.ylim_margin_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_x_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.x_formatter = formatter;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.size.is_valid() {
            return Err(ChartError::InvalidFigureSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.background.validate()?;
        if !self.border_percentage.is_finite() || !(0.0..1.0).contains(&self.border_percentage) {
            return Err(ChartError::InvalidData(
                "border percentage must be finite and in [0, 1)".to_owned(),
            ));
        }
        if self.font_size == 0 {
            return Err(ChartError::InvalidData("font size must be > 0".to_owned()));
        }
        if !self.ylim_margin_ratio.is_finite() || self.ylim_margin_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "y-limit margin ratio must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse figure config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize figure config: {e}")))
    }
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_border_percentage() -> f64 {
    0.01
}

fn default_fps() -> u32 {
    30
}

fn default_font_size() -> u32 {
    20
}

fn default_font_spacing() -> u32 {
    2
}

fn default_ylim_margin_ratio() -> f64 {
    DEFAULT_MARGIN_RATIO
}
