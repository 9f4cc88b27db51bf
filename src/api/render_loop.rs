use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};
use crate::render::{DraggerDescriptor, FrameOutcome, RenderFrame, Renderer};

use super::figure::{Figure, FigureState};

impl Figure {
    /// Builds the frame a backend draws for the current figure state.
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame<'_> {
        let viewport = self.viewport();
        let window = viewport.map(|viewport| viewport.visible_window());
        let dragger = viewport.map(|viewport| DraggerDescriptor {
            len: viewport.len(),
            window: viewport.visible_window(),
            visible_axis: viewport.visible_axis(),
            update_step: viewport.update_step(),
            timeframe: viewport.timeframe(),
            x_limit: viewport.x_limit(),
            formatter: viewport.formatter(),
        });
        let axes = self
            .rects()
            .iter()
            .enumerate()
            .filter_map(|(index, rect)| {
                self.axes(index)
                    .ok()
                    .map(|axes| axes.frame(*rect, window, self.cursors_shown()))
            })
            .collect();
        let tooltip = self
            .interaction()
            .pointer()
            .and_then(|(x, y)| self.tooltip(x, y));

        let config = self.config();
        RenderFrame {
            size: config.size,
            background: config.background,
            window_title: config.window_title.as_deref(),
            title: self.title(),
            font_size: config.font_size,
            font_spacing: config.font_spacing,
            show_cursors: self.cursors_shown(),
            dragger,
            axes,
            tooltip,
        }
    }

    /// Applies pending input, then draws one frame.
    pub fn render_once<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> ChartResult<FrameOutcome> {
        self.ensure_open()?;
        for event in renderer.poll_input() {
            self.handle_input(event)?;
        }
        let frame = self.render_frame();
        renderer.render(&frame)
    }

    /// Runs the render loop on the calling thread until the window closes.
    ///
    /// The figure is `Closed` afterwards, also when the backend failed.
    pub fn show<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> ChartResult<()> {
        if self.state() != FigureState::Open {
            return Err(ChartError::AlreadyShown);
        }
        self.set_state(FigureState::Showing);
        debug!(fps = self.config().fps, "render loop start");

        let fps = self.config().fps;
        let mut frames = 0_usize;
        let result = loop {
            let started = Instant::now();
            match self.render_once(renderer) {
                Ok(FrameOutcome::Continue) => {
                    frames += 1;
                    pace(started, fps);
                }
                Ok(FrameOutcome::Closed) => break Ok(frames + 1),
                Err(err) => break Err(err),
            }
        };

        self.set_state(FigureState::Closed);
        match result {
            Ok(frames) => {
                debug!(frames, "render loop stop");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "render loop aborted");
                Err(err)
            }
        }
    }

    /// Runs the render loop on a dedicated thread.
    ///
    /// The returned handle serializes access to the figure with the render
    /// thread; each frame holds the lock only while it is built and drawn.
    pub fn show_in_background<R>(mut self, renderer: R) -> ChartResult<FigureHandle>
    where
        R: Renderer + Send + 'static,
    {
        if self.state() != FigureState::Open {
            return Err(ChartError::AlreadyShown);
        }
        self.set_state(FigureState::Showing);

        let shared = Arc::new(Mutex::new(self));
        let thread_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("figure-render".to_owned())
            .spawn(move || render_thread(&thread_shared, renderer))
            .map_err(|e| ChartError::RenderThread(format!("failed to spawn render thread: {e}")))?;

        Ok(FigureHandle {
            figure: shared,
            thread,
        })
    }
}

fn render_thread<R: Renderer>(figure: &Mutex<Figure>, mut renderer: R) -> ChartResult<()> {
    let fps = lock(figure)?.config().fps;
    debug!(fps, "background render loop start");
    let mut frames = 0_usize;
    loop {
        let started = Instant::now();
        let outcome = {
            let mut guard = lock(figure)?;
            if guard.is_window_closed() {
                debug!(frames, "background render loop stopped by handle");
                return Ok(());
            }
            let outcome = guard.render_once(&mut renderer);
            if !matches!(outcome, Ok(FrameOutcome::Continue)) {
                guard.set_state(FigureState::Closed);
            }
            outcome
        };
        frames += 1;
        match outcome {
            Ok(FrameOutcome::Continue) => pace(started, fps),
            Ok(FrameOutcome::Closed) => {
                debug!(frames, "background render loop stop");
                return Ok(());
            }
            Err(err) => {
                warn!(error = %err, "background render loop aborted");
                return Err(err);
            }
        }
    }
}

fn lock(figure: &Mutex<Figure>) -> ChartResult<MutexGuard<'_, Figure>> {
    figure
        .lock()
        .map_err(|_| ChartError::RenderThread("figure lock poisoned".to_owned()))
}

/// Sleeps out the rest of the frame budget; `fps == 0` never sleeps.
fn pace(started: Instant, fps: u32) {
    if fps == 0 {
        return;
    }
    let budget = Duration::from_secs_f64(1.0 / f64::from(fps));
    if let Some(remaining) = budget.checked_sub(started.elapsed()) {
        thread::sleep(remaining);
    }
}

/// Caller-side handle to a figure whose render loop runs in the background.
#[derive(Debug)]
pub struct FigureHandle {
    figure: Arc<Mutex<Figure>>,
    thread: JoinHandle<ChartResult<()>>,
}

impl FigureHandle {
    /// Runs `f` on the figure while the render thread is paused.
    ///
    /// Fails with `WindowClosed` once the window was closed.
    pub fn with<T>(&self, f: impl FnOnce(&mut Figure) -> ChartResult<T>) -> ChartResult<T> {
        let mut guard = lock(&self.figure)?;
        guard.ensure_open()?;
        f(&mut guard)
    }

    #[must_use]
    pub fn is_window_closed(&self) -> bool {
        lock(&self.figure).map_or(true, |figure| figure.is_window_closed())
    }

    /// Closes the window; the render thread exits before its next frame.
    pub fn close(&self) -> ChartResult<()> {
        lock(&self.figure)?.set_state(FigureState::Closed);
        Ok(())
    }

    /// Waits for the render thread and returns its result.
    pub fn join(self) -> ChartResult<()> {
        self.thread
            .join()
            .map_err(|_| ChartError::RenderThread("render thread panicked".to_owned()))?
    }
}
