use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Failures raised while resolving a textual subplot mosaic.
///
/// Rows and columns are zero-based and refer to the mosaic after fully blank
/// rows were dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MosaicError {
    #[error("mosaic has no labelled rows")]
    EmptySpec,

    #[error("mosaic row {row} has {actual} column(s), expected {expected}")]
    RaggedSpec {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("label '{label}' is not rectangular: unexpected cell at row {row}, col {col}")]
    NonRectangularLabel { label: char, row: usize, col: usize },

    #[error("separator at row {row}, col {col} does not span the whole grid")]
    InconsistentSeparator { row: usize, col: usize },

    #[error("reserved character at row {row}, col {col} cannot be a label")]
    ReservedCharacter { row: usize, col: usize },
}

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Mosaic text is malformed; figure construction aborts.
    MalformedSpec,
    /// Length or value mismatch against the shared x-axis.
    AxisMismatch,
    /// Operation attempted after the figure window closed.
    StaleHandle,
    /// Wrong column count or length on artist construction or update.
    DataShape,
    /// Any other rejected argument.
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("malformed mosaic: {0}")]
    Mosaic(#[from] MosaicError),

    #[error("invalid figure size: width={width}, height={height}")]
    InvalidFigureSize { width: u32, height: u32 },

    #[error("axis length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("x data diverges from the shared axis at index {index}")]
    AxisAlreadyDiverged { index: usize },

    #[error("figure has no shared x-axis yet; plot an artist with x data first")]
    NoSharedAxis,

    #[error("missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("expected {expected} column(s), got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("column `{column}` has {actual} value(s), expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown axes index {0}")]
    UnknownAxes(usize),

    #[error("unknown artist {index} on axes {axes}")]
    UnknownArtist { axes: usize, index: usize },

    #[error("figure window is already closed")]
    WindowClosed,

    #[error("figure render loop was already started")]
    AlreadyShown,

    #[error("render thread failure: {0}")]
    RenderThread(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Mosaic(_) => ErrorClass::MalformedSpec,
            Self::LengthMismatch { .. } | Self::AxisAlreadyDiverged { .. } | Self::NoSharedAxis => {
                ErrorClass::AxisMismatch
            }
            Self::WindowClosed => ErrorClass::StaleHandle,
            Self::MissingColumns(_) | Self::ColumnCount { .. } | Self::ColumnLength { .. } => {
                ErrorClass::DataShape
            }
            Self::InvalidFigureSize { .. }
            | Self::UnknownAxes(_)
            | Self::UnknownArtist { .. }
            | Self::AlreadyShown
            | Self::RenderThread(_)
            | Self::InvalidData(_) => ErrorClass::InvalidInput,
        }
    }
}
