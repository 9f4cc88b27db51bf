use std::thread;

use chart_mosaic::api::{CandleArtist, FigureState};
use chart_mosaic::core::DataFrame;
use chart_mosaic::error::{ChartError, ChartResult, ErrorClass};
use chart_mosaic::interaction::{InputEvent, Key};
use chart_mosaic::render::{FrameOutcome, NullRenderer, RenderFrame, Renderer};
use chart_mosaic::{Figure, FigureConfig};

fn figure() -> Figure {
    let len = 50;
    let index: Vec<f64> = (0..len).map(|i| f64::from(i) * 60.0).collect();
    let close: Vec<f64> = (0..len).map(|i| 10.0 + f64::from(i % 5)).collect();
    let frame = DataFrame::new(index)
        .with_column("o", close.clone())
        .and_then(|f| f.with_column("h", close.iter().map(|c| c + 1.0).collect()))
        .and_then(|f| f.with_column("l", close.iter().map(|c| c - 1.0).collect()))
        .and_then(|f| f.with_column("c", close))
        .expect("frame");

    let config = FigureConfig::new(640, 480).with_scrolling(10, 1).with_fps(0);
    let mut figure = Figure::new("a", config).expect("figure");
    figure
        .plot(0, CandleArtist::from_frame(&frame).expect("candle"))
        .expect("plot");
    figure
}

#[test]
fn blocking_show_runs_until_the_window_closes() {
    let mut figure = figure();
    let mut renderer = NullRenderer::closing_after(3).with_input_script(vec![
        vec![InputEvent::Key(Key::Left)],
        vec![InputEvent::PointerMove { x: 320.0, y: 200.0 }],
    ]);

    figure.show(&mut renderer).expect("show");
    assert_eq!(renderer.frames_rendered, 3);
    assert_eq!(renderer.last_visible_len, Some(10));
    assert_eq!(renderer.last_cursor, Some(39));
    assert_eq!(renderer.last_artist_count, 1);
    assert!(renderer.last_tooltip.is_some());

    assert_eq!(figure.state(), FigureState::Closed);
    let err = figure.update_from_position(5).expect_err("closed");
    assert!(matches!(err, ChartError::WindowClosed));
    assert_eq!(err.class(), ErrorClass::StaleHandle);
    assert!(matches!(
        figure.show(&mut NullRenderer::default()),
        Err(ChartError::AlreadyShown)
    ));
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _frame: &RenderFrame<'_>) -> ChartResult<FrameOutcome> {
        Err(ChartError::InvalidData("backend lost its surface".to_owned()))
    }
}

#[test]
fn backend_failure_closes_the_figure() {
    let mut figure = figure();
    assert!(figure.show(&mut FailingRenderer).is_err());
    assert!(figure.is_window_closed());
}

#[test]
fn background_loop_serializes_caller_mutation() {
    let handle = figure()
        .show_in_background(NullRenderer::never_closing())
        .expect("spawn");
    assert!(!handle.is_window_closed());

    let window = handle
        .with(|figure| figure.update_from_position(20))
        .expect("scroll while showing");
    assert_eq!(window.end, 20);
    let state = handle.with(|figure| Ok(figure.state())).expect("state");
    assert_eq!(state, FigureState::Showing);

    handle.close().expect("close");
    assert!(handle.is_window_closed());
    assert!(matches!(
        handle.with(|figure| figure.update()),
        Err(ChartError::WindowClosed)
    ));
    handle.join().expect("render thread");
}

#[test]
fn background_loop_stops_when_the_renderer_closes() {
    let handle = figure()
        .show_in_background(NullRenderer::closing_after(2))
        .expect("spawn");
    while !handle.is_window_closed() {
        thread::yield_now();
    }
    handle.join().expect("render thread");
}

#[test]
fn render_frame_borrows_visible_slices() {
    let figure = figure();
    let frame = figure.render_frame();
    frame.validate().expect("valid frame");
    let dragger = frame.dragger.as_ref().expect("dragger");
    assert_eq!(dragger.visible_axis.len(), 10);
    assert_eq!(frame.axes[0].artists[0].columns.len(), 4);
    assert!(frame.axes[0].artists[0]
        .columns
        .iter()
        .all(|column| column.len() == 10));
    assert!(frame.tooltip.is_none());
}
