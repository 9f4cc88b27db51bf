use chart_mosaic::api::{Artist, ArtistId, CandleArtist, Collector, LineArtist};
use chart_mosaic::core::{DataFrame, VisibleWindow};
use chart_mosaic::error::{ChartError, ErrorClass};
use chart_mosaic::{Figure, FigureConfig};

fn frame(len: usize, offset: f64) -> DataFrame {
    let index: Vec<f64> = (0..len).map(|i| offset + i as f64 * 60.0).collect();
    let close: Vec<f64> = (0..len).map(|i| offset + i as f64).collect();
    DataFrame::new(index)
        .with_column("o", close.clone())
        .and_then(|f| f.with_column("h", close.iter().map(|c| c + 1.0).collect()))
        .and_then(|f| f.with_column("l", close.iter().map(|c| c - 1.0).collect()))
        .and_then(|f| f.with_column("c", close.clone()))
        .and_then(|f| f.with_column("rsi", vec![50.0; len]))
        .expect("frame")
}

fn setup() -> (Figure, Vec<ArtistId>) {
    let mut figure = Figure::new(
        "a\nb",
        FigureConfig::default().with_scrolling(4, 1),
    )
    .expect("figure");
    let data = frame(10, 0.0);
    let candles = CandleArtist::from_frame(&data.select(&["o", "h", "l", "c"]).expect("ohlc"))
        .expect("candle");
    let rsi = LineArtist::from_series(&data.series("rsi").expect("rsi"));
    let ids = vec![
        figure.plot(0, candles).expect("candle plot"),
        figure.plot(1, rsi).expect("rsi plot"),
    ];
    figure.update_from_position(6).expect("scroll");
    (figure, ids)
}

fn artists(figure: &Figure, ids: &[ArtistId]) -> Vec<Artist> {
    ids.iter()
        .map(|id| figure.artist(*id).expect("artist").clone())
        .collect()
}

#[test]
fn collector_unions_artist_columns() {
    let (figure, ids) = setup();
    let collector = Collector::new(&figure, &ids).expect("collector");
    assert_eq!(
        collector.columns().collect::<Vec<_>>(),
        vec!["o", "h", "l", "c", "rsi"]
    );
}

#[test]
fn update_replaces_buffers_and_axis_at_the_same_cursor() {
    let (mut figure, ids) = setup();
    let collector = Collector::new(&figure, &ids).expect("collector");
    let next = frame(10, 1_000.0);

    let window = collector.update(&mut figure, &next).expect("update");
    assert_eq!(window, VisibleWindow { start: 3, end: 6 });
    assert_eq!(
        figure.viewport().expect("viewport").axis(),
        next.index()
    );
    match figure.artist(ids[0]).expect("candle") {
        Artist::Candle(candle) => assert_eq!(candle.column(3), next.column("c")),
        Artist::Line(_) => panic!("expected candles"),
    }
    let limit = figure.axes(0).expect("axes").y_limit().expect("limit");
    assert!(limit.min > 1_000.0);
}

#[test]
fn missing_columns_leave_every_buffer_identical() {
    let (mut figure, ids) = setup();
    let collector = Collector::new(&figure, &ids).expect("collector");
    let before = artists(&figure, &ids);
    let axis_before = figure.viewport().expect("viewport").axis().to_vec();

    let partial = frame(10, 500.0).select(&["o", "h", "c"]).expect("partial");
    let err = collector.update(&mut figure, &partial).expect_err("missing");
    assert!(matches!(&err, ChartError::MissingColumns(names) if names == &["l", "rsi"]));
    assert_eq!(err.class(), ErrorClass::DataShape);

    assert_eq!(artists(&figure, &ids), before);
    assert_eq!(figure.viewport().expect("viewport").axis(), axis_before.as_slice());
}

#[test]
fn length_change_is_rejected_before_any_mutation() {
    let (mut figure, ids) = setup();
    let collector = Collector::new(&figure, &ids).expect("collector");
    let before = artists(&figure, &ids);

    let err = collector
        .update(&mut figure, &frame(11, 0.0))
        .expect_err("longer frame");
    assert!(matches!(
        err,
        ChartError::LengthMismatch {
            expected: 10,
            actual: 11
        }
    ));
    assert_eq!(artists(&figure, &ids), before);
}

#[test]
fn guide_lines_cannot_be_collected() {
    let (mut figure, _) = setup();
    let index = figure.axes_mut(1).expect("axes").h_line(0.3).expect("hline");
    let err = Collector::new(&figure, &[ArtistId { axes: 1, index }]).expect_err("guide");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(matches!(
        Collector::new(&figure, &[ArtistId { axes: 0, index: 9 }]),
        Err(ChartError::UnknownArtist { axes: 0, index: 9 })
    ));
}
