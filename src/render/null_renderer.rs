use std::collections::VecDeque;

use crate::error::ChartResult;
use crate::interaction::InputEvent;
use crate::render::{FrameOutcome, RenderFrame, Renderer};

/// Headless renderer used by tests and scripted sessions.
///
/// It validates every frame, records what it saw, replays a script of input
/// batches (one batch per `poll_input`) and reports the window as closed once
/// `close_after` frames were drawn.
#[derive(Debug)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_axes_count: usize,
    pub last_artist_count: usize,
    pub last_visible_len: Option<usize>,
    pub last_cursor: Option<usize>,
    pub last_tooltip: Option<String>,
    close_after: Option<usize>,
    input_script: VecDeque<Vec<InputEvent>>,
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::closing_after(1)
    }
}

impl NullRenderer {
    /// Renderer whose window closes after `frames` frames.
    #[must_use]
    pub fn closing_after(frames: usize) -> Self {
        Self {
            frames_rendered: 0,
            last_axes_count: 0,
            last_artist_count: 0,
            last_visible_len: None,
            last_cursor: None,
            last_tooltip: None,
            close_after: Some(frames),
            input_script: VecDeque::new(),
        }
    }

    /// Renderer that never closes on its own; the loop ends only through
    /// `FigureHandle::close`.
    #[must_use]
    pub fn never_closing() -> Self {
        Self {
            close_after: None,
            ..Self::closing_after(0)
        }
    }

    #[must_use]
    pub fn with_input_script(mut self, batches: Vec<Vec<InputEvent>>) -> Self {
        self.input_script = batches.into();
        self
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<FrameOutcome> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_axes_count = frame.axes.len();
        self.last_artist_count = frame.artist_count();
        self.last_visible_len = frame.dragger.as_ref().map(|dragger| dragger.window.len());
        self.last_cursor = frame.dragger.as_ref().map(|dragger| dragger.window.end);
        self.last_tooltip.clone_from(&frame.tooltip);

        let closed = self
            .close_after
            .is_some_and(|limit| self.frames_rendered >= limit);
        Ok(if closed {
            FrameOutcome::Closed
        } else {
            FrameOutcome::Continue
        })
    }

    fn poll_input(&mut self) -> Vec<InputEvent> {
        self.input_script.pop_front().unwrap_or_default()
    }
}
