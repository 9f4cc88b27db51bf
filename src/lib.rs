//! chart-mosaic: mosaic-laid-out figures sharing one scrollable time axis.
//!
//! A textual mosaic (`"aab\ncdd"`) names the subplot regions of a figure.
//! All artists plotted on the figure share a single x-axis, scrolled through
//! a visible window, and are handed to a pluggable `Renderer` each frame.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Figure, FigureConfig};
pub use error::{ChartError, ChartResult};
