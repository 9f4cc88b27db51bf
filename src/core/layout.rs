use crate::core::mosaic::MosaicLayout;
use crate::core::types::{FigureSize, PixelRect};
use crate::error::{ChartError, ChartResult};

/// Inputs that shape the pixel layout of a figure besides its mosaic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub size: FigureSize,
    pub border_percentage: f64,
    pub font_size: u32,
    pub has_title: bool,
}

impl MosaicLayout {
    /// Maps every slot to a pixel rectangle, in slot order.
    ///
    /// One font line is reserved at the bottom for the tooltip, and one more
    /// at the top when a title is shown. Borders are split evenly around each
    /// axes.
    pub fn pixel_rects(&self, metrics: LayoutMetrics) -> ChartResult<Vec<PixelRect>> {
        let size = metrics.size;
        if !size.is_valid() {
            return Err(ChartError::InvalidFigureSize {
                width: size.width,
                height: size.height,
            });
        }

        let title_lines = if metrics.has_title { 2.0 } else { 1.0 };
        let font = f64::from(metrics.font_size);
        let available_height = f64::from(size.height) - font * title_lines;
        if available_height <= 0.0 {
            return Err(ChartError::InvalidFigureSize {
                width: size.width,
                height: size.height,
            });
        }

        let width = f64::from(size.width);
        let cols = self.cols() as f64;
        let rows = self.rows() as f64;
        let cell_width = width / cols;
        let cell_height = available_height / rows;
        let border_x = metrics.border_percentage * width / (cols + 1.0);
        let border_y = metrics.border_percentage * available_height / (rows + 1.0);
        let title_offset = if metrics.has_title { font } else { 0.0 };

        Ok(self
            .slots()
            .iter()
            .map(|slot| {
                let rect = slot.rect;
                PixelRect {
                    x: cell_width * rect.col as f64 + border_x / 2.0,
                    y: cell_height * rect.row as f64 + title_offset + border_y / 2.0,
                    width: (cell_width * rect.width as f64 - border_x).max(0.0),
                    height: (cell_height * rect.height as f64 - border_y).max(0.0),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::LayoutMetrics;
    use crate::core::mosaic::MosaicLayout;
    use crate::core::types::FigureSize;

    fn metrics(has_title: bool) -> LayoutMetrics {
        LayoutMetrics {
            size: FigureSize::new(1000, 520),
            border_percentage: 0.0,
            font_size: 20,
            has_title,
        }
    }

    #[test]
    fn grid_cells_split_width_and_available_height() {
        let layout = MosaicLayout::parse("aab\ncdd").expect("mosaic");
        let rects = layout.pixel_rects(metrics(false)).expect("rects");
        assert_eq!(rects.len(), 4);
        assert_relative_eq!(rects[0].width, 2000.0 / 3.0);
        assert_relative_eq!(rects[0].height, 250.0);
        assert_relative_eq!(rects[3].x, 1000.0 / 3.0);
        assert_relative_eq!(rects[3].y, 250.0);
    }

    #[test]
    fn title_shifts_axes_down() {
        let layout = MosaicLayout::parse("a").expect("mosaic");
        let rects = layout.pixel_rects(metrics(true)).expect("rects");
        assert_relative_eq!(rects[0].y, 20.0);
        assert_relative_eq!(rects[0].height, 480.0);
    }

    #[test]
    fn borders_shrink_each_axes() {
        let layout = MosaicLayout::parse("ab").expect("mosaic");
        let rects = layout
            .pixel_rects(LayoutMetrics {
                border_percentage: 0.03,
                ..metrics(false)
            })
            .expect("rects");
        assert_relative_eq!(rects[0].x, 5.0);
        assert_relative_eq!(rects[0].width, 490.0);
        assert_relative_eq!(rects[1].x, 505.0);
    }

    #[test]
    fn too_small_figure_is_rejected() {
        let layout = MosaicLayout::parse("a").expect("mosaic");
        let tiny = LayoutMetrics {
            size: FigureSize::new(100, 30),
            ..metrics(true)
        };
        assert!(layout.pixel_rects(tiny).is_err());
    }
}
