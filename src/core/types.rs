use serde::{Deserialize, Serialize};

/// Figure dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for FigureSize {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Inclusive index range into the shared x-axis that is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    #[must_use]
    pub fn len(self) -> usize {
        self.end + 1 - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Returns the window as a half-open range usable for slicing.
    #[must_use]
    pub fn as_range(self) -> std::ops::Range<usize> {
        self.start..self.end + 1
    }

    /// Borrows the visible part of a buffer laid out along the shared axis.
    ///
    /// Returns `None` when the buffer is shorter than the window.
    #[must_use]
    pub fn slice(self, values: &[f64]) -> Option<&[f64]> {
        values.get(self.as_range())
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Strict containment, matching how pointer hits are resolved on axes borders.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }
}
