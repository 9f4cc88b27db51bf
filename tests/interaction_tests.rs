use chart_mosaic::api::LineArtist;
use chart_mosaic::core::{Series, VisibleWindow};
use chart_mosaic::interaction::{InputEvent, InteractionMode, Key};
use chart_mosaic::{Figure, FigureConfig};

/// 100 samples one second apart on a single 1000x500 axes.
fn figure(visible: usize, step: usize) -> Figure {
    let config = FigureConfig::new(1000, 520)
        .with_border_percentage(0.0)
        .with_scrolling(visible, step);
    let mut figure = Figure::new("a\nb", config).expect("figure");
    let series = Series::new(
        Some("y"),
        (0..100).map(f64::from).collect(),
        (0..100).map(|i| f64::from(i % 7)).collect(),
    )
    .expect("series");
    figure.plot(0, LineArtist::from_series(&series)).expect("plot");
    figure
}

fn cursor(figure: &Figure) -> usize {
    figure.viewport().expect("viewport").cursor()
}

#[test]
fn arrow_keys_pan_ten_steps() {
    let mut figure = figure(10, 5);
    let moved = figure
        .handle_input(InputEvent::Key(Key::Left))
        .expect("left");
    assert_eq!(moved, Some(VisibleWindow { start: 40, end: 49 }));
    figure
        .handle_input(InputEvent::Key(Key::Right))
        .expect("right");
    assert_eq!(cursor(&figure), 99);
    assert_eq!(
        figure
            .handle_input(InputEvent::Key(Key::Right))
            .expect("right at end"),
        None
    );
}

#[test]
fn step_keys_move_one_element() {
    let mut figure = figure(10, 5);
    figure
        .handle_input(InputEvent::Key(Key::StepBackward))
        .expect("h");
    assert_eq!(cursor(&figure), 98);
    figure
        .handle_input(InputEvent::Key(Key::StepForward))
        .expect("l");
    assert_eq!(cursor(&figure), 99);
}

#[test]
fn horizontal_wheel_pans_and_vertical_wheel_is_ignored() {
    let mut figure = figure(10, 2);
    figure
        .handle_input(InputEvent::Wheel { dx: 1.0, dy: 0.0 })
        .expect("wheel");
    assert_eq!(cursor(&figure), 79);
    figure
        .handle_input(InputEvent::Wheel { dx: 1.0, dy: -1.0 })
        .expect("wheel");
    assert_eq!(cursor(&figure), 79);
}

#[test]
fn zero_update_step_disables_navigation() {
    let mut figure = figure(10, 0);
    for event in [
        InputEvent::Key(Key::Left),
        InputEvent::Key(Key::StepBackward),
        InputEvent::Wheel { dx: 3.0, dy: 0.0 },
    ] {
        assert_eq!(figure.handle_input(event).expect("event"), None);
    }
    assert_eq!(cursor(&figure), 99);
}

#[test]
fn drag_pans_once_a_timeframe_is_accumulated() {
    let mut figure = figure(10, 5);
    // Visible x span is 10 timeframes over 1000 px: 100 px per timeframe.
    figure
        .handle_input(InputEvent::PointerDown { x: 500.0, y: 100.0 })
        .expect("down");
    assert_eq!(figure.interaction().mode(), InteractionMode::Panning);
    assert_eq!(
        figure
            .handle_input(InputEvent::PointerMove { x: 560.0, y: 100.0 })
            .expect("small move"),
        None
    );
    let moved = figure
        .handle_input(InputEvent::PointerMove { x: 650.0, y: 100.0 })
        .expect("large move");
    assert_eq!(moved.map(|window| window.end), Some(94));

    figure.handle_input(InputEvent::PointerUp).expect("up");
    assert_eq!(figure.interaction().mode(), InteractionMode::Idle);
}

#[test]
fn dragging_out_of_the_axes_waits_for_release() {
    let mut figure = figure(10, 5);
    figure
        .handle_input(InputEvent::PointerDown { x: 500.0, y: 100.0 })
        .expect("down");
    figure
        .handle_input(InputEvent::PointerMove { x: 500.0, y: 400.0 })
        .expect("leave");
    assert_eq!(figure.interaction().mode(), InteractionMode::WaitingRelease);
    assert_eq!(
        figure
            .handle_input(InputEvent::PointerMove { x: 900.0, y: 100.0 })
            .expect("back"),
        None
    );
    assert_eq!(cursor(&figure), 99);
}
