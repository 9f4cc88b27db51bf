mod frame;
mod null_renderer;
mod primitives;

pub use frame::{
    ArtistDescriptor, ArtistKind, AxesFrame, DraggerDescriptor, LegendPosition, LineKind,
    RenderFrame,
};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, TABLEAU_10, palette_color};

use crate::error::ChartResult;
use crate::interaction::InputEvent;

/// What the backend reports after drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The user closed the window; the render loop stops.
    Closed,
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` that borrows the
/// figure's data, so drawing code stays isolated from figure and interaction
/// logic. Input is collected between frames through `poll_input`.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<FrameOutcome>;

    fn poll_input(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}
