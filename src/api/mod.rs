mod artist;
mod axes;
mod collector;
mod figure;
mod figure_config;
mod render_loop;
mod snapshot;
mod tooltip;

pub use artist::{
    Artist, ArtistData, ArtistId, CANDLE_COLUMN_COUNT, CandleArtist, DEFAULT_DOWN_COLOR,
    DEFAULT_UP_COLOR, LineArtist,
};
pub use axes::{Axes, YLimit};
pub use collector::Collector;
pub use figure::{Figure, FigureState};
pub use figure_config::FigureConfig;
pub use render_loop::FigureHandle;
pub use snapshot::{
    AxesSnapshot, FIGURE_SNAPSHOT_JSON_SCHEMA_V1, FigureSnapshot, FigureSnapshotJsonContractV1,
    ViewportSnapshot,
};
