pub mod formatter;
pub mod frame;
pub mod layout;
pub mod limits;
pub mod mosaic;
pub mod primitives;
pub mod spacing;
pub mod types;
pub mod viewport;

pub use formatter::{FormatterKind, ValueFormatter};
pub use frame::{DataFrame, OHLC_COLUMNS, Series};
pub use layout::LayoutMetrics;
pub use limits::{AxisLimit, DEFAULT_MARGIN_RATIO, visible_limit};
pub use mosaic::{GridRect, MosaicLayout, MosaicSlot};
pub use spacing::{IrregularSpacingWarning, SpacingReport, detect_spacing};
pub use types::{FigureSize, PixelRect, VisibleWindow};
pub use viewport::{Viewport, ViewportPhase};
