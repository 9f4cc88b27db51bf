use approx::assert_relative_eq;
use chart_mosaic::core::{Viewport, ViewportPhase, VisibleWindow, detect_spacing};
use chart_mosaic::error::{ChartError, ErrorClass};

#[test]
fn trailing_window_after_advance() {
    let mut viewport = Viewport::initialize(&[0.0, 10.0, 20.0, 30.0], 2, 0).expect("viewport");
    assert_eq!(viewport.phase(), ViewportPhase::Initialized);
    assert_eq!(viewport.advance_to(3), VisibleWindow { start: 2, end: 3 });
    assert_eq!(viewport.visible_axis(), &[20.0, 30.0]);
    assert_eq!(viewport.phase(), ViewportPhase::Scrolling);
}

#[test]
fn failed_set_axis_keeps_previous_values() {
    let mut viewport = Viewport::initialize(&[0.0, 10.0, 20.0, 30.0], 2, 0).expect("viewport");
    let err = viewport.set_axis(&[0.0, 10.0, 20.0]).expect_err("short axis");
    assert_eq!(err.class(), ErrorClass::AxisMismatch);
    assert!(matches!(
        err,
        ChartError::LengthMismatch {
            expected: 4,
            actual: 3
        }
    ));
    assert_eq!(viewport.axis(), &[0.0, 10.0, 20.0, 30.0]);
}

#[test]
fn irregular_spacing_is_reported_but_not_fatal() {
    let axis = [0.0, 60.0, 120.0, 300.0, 360.0];
    let report = detect_spacing(&axis);
    assert_relative_eq!(report.timeframe, 60.0);
    let warning = report.warning.expect("warning");
    assert_eq!(warning.distinct_spacings, 2);

    let viewport = Viewport::initialize(&axis, 0, 1).expect("viewport");
    assert_relative_eq!(viewport.timeframe(), 60.0);
    assert!(viewport.spacing_warning().is_some());
}

#[test]
fn update_keeps_the_cursor() {
    let axis: Vec<f64> = (0..20).map(f64::from).collect();
    let mut viewport = Viewport::initialize(&axis, 5, 2).expect("viewport");
    viewport.advance_to(9);
    assert_eq!(viewport.update(), VisibleWindow { start: 5, end: 9 });
    assert_eq!(viewport.cursor(), 9);
}

#[test]
fn x_limit_is_padded_by_half_a_timeframe() {
    let axis: Vec<f64> = (0..10).map(|i| f64::from(i) * 60.0).collect();
    let mut viewport = Viewport::initialize(&axis, 4, 1).expect("viewport");
    viewport.advance_to(5);
    let (min, max) = viewport.x_limit();
    assert_relative_eq!(min, 90.0);
    assert_relative_eq!(max, 330.0);
}
