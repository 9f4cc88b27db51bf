use super::figure::Figure;

impl Figure {
    /// Status line for a pointer at `(x, y)` in figure pixels.
    ///
    /// Over an axes with artists this reads
    /// `"{visible} [{index}/{last}] timeframe={t} x={x} y={y}"`; elsewhere it
    /// shows the last x value. `None` until the shared axis exists.
    #[must_use]
    pub fn tooltip(&self, x: f64, y: f64) -> Option<String> {
        let viewport = self.viewport()?;
        let formatter = viewport.formatter();
        let last = viewport.len() - 1;

        let hovered = self
            .rects()
            .iter()
            .enumerate()
            .find(|(_, rect)| rect.contains(x, y))
            .and_then(|(index, rect)| self.axes(index).ok().map(|axes| (axes, *rect)))
            .filter(|(axes, _)| axes.has_artists());

        let Some((axes, rect)) = hovered else {
            return Some(format!("Xindex[-1]={}", formatter.format(viewport.axis()[last])));
        };

        let window = viewport.visible_window();
        let fraction = (x - rect.x) / rect.width;
        let (index, x_value) = viewport.x_at_fraction(fraction);
        let y_text = match axes.y_limit() {
            Some(limit) => axes
                .y_formatter()
                .format(limit.denormalize(1.0 - (y - rect.y) / rect.height)),
            None => axes.y_formatter().format(f64::NAN),
        };
        Some(format!(
            "{} [{index}/{last}] timeframe={} x={} y={y_text}",
            window.len(),
            viewport.timeframe(),
            formatter.format(x_value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{Figure, FigureConfig};
    use crate::api::artist::LineArtist;
    use crate::core::{FormatterKind, Series};

    fn figure() -> Figure {
        let config = FigureConfig::new(400, 220)
            .with_border_percentage(0.0)
            .with_ylim_margin_ratio(0.0)
            .with_scrolling(4, 1);
        let mut figure = Figure::new("a\nb", config).expect("figure");
        let series = Series::new(
            Some("y"),
            vec![0.0, 10.0, 20.0, 30.0, 40.0],
            vec![0.0, 100.0, 50.0, 100.0, 0.0],
        )
        .expect("series");
        figure.plot(0, LineArtist::from_series(&series)).expect("plot");
        figure
            .set_xformatter(FormatterKind::Linear, Some("%.1f"))
            .expect("formatter");
        figure
    }

    #[test]
    fn tooltip_over_axes_reports_index_and_values() {
        let figure = figure();
        // Axes 'a' spans y in [0, 100); the visible window is indices 1..=4.
        let text = figure.tooltip(150.0, 50.0).expect("tooltip");
        assert_eq!(text, "4 [2/4] timeframe=10 x=25.0 y=50.00");
    }

    #[test]
    fn tooltip_elsewhere_reports_last_x() {
        let figure = figure();
        assert_eq!(figure.tooltip(150.0, 150.0).as_deref(), Some("Xindex[-1]=40.0"));
    }
}
