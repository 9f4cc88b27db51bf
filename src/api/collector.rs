use indexmap::IndexSet;
use tracing::debug;

use crate::core::{DataFrame, VisibleWindow};
use crate::error::{ChartError, ChartResult};

use super::artist::{ArtistData, ArtistId};
use super::figure::Figure;

/// Replaces the data of several artists and the shared x-axis in one step.
///
/// Every check runs before any buffer is touched, so a failed update leaves
/// the figure exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collector {
    artists: Vec<ArtistId>,
    columns: IndexSet<String>,
}

impl Collector {
    /// Collects `artists` of `figure`; each must read at least one column.
    pub fn new(figure: &Figure, artists: &[ArtistId]) -> ChartResult<Self> {
        let mut columns = IndexSet::new();
        for id in artists {
            let artist = figure.artist(*id)?;
            let names = artist.data_columns();
            if names.is_empty() {
                return Err(ChartError::InvalidData(format!(
                    "artist {} on axes {} has no data column to collect",
                    id.index, id.axes
                )));
            }
            columns.extend(names.into_iter().map(str::to_owned));
        }
        Ok(Self {
            artists: artists.to_vec(),
            columns,
        })
    }

    #[must_use]
    pub fn artists(&self) -> &[ArtistId] {
        &self.artists
    }

    /// Union of the column names of every collected artist, in first-seen
    /// order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(String::as_str)
    }

    /// Replaces every collected artist's data and the shared axis from `frame`,
    /// then refreshes the view at the current cursor.
    pub fn update(&self, figure: &mut Figure, frame: &DataFrame) -> ChartResult<VisibleWindow> {
        figure.ensure_open()?;
        let axis_len = figure.viewport().ok_or(ChartError::NoSharedAxis)?.len();
        if frame.len() != axis_len {
            return Err(ChartError::LengthMismatch {
                expected: axis_len,
                actual: frame.len(),
            });
        }

        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|name| !frame.contains_column(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ChartError::MissingColumns(missing));
        }

        let mut buffers = Vec::with_capacity(self.artists.len());
        for id in &self.artists {
            buffers.push((*id, figure.artist(*id)?.prepare_replacement(frame)?));
        }

        for (id, buffer) in buffers {
            figure.apply_artist_buffer(id, buffer)?;
        }
        figure.set_xdata(frame.index())?;
        let window = figure.update()?;
        debug!(
            artists = self.artists.len(),
            columns = self.columns.len(),
            rows = frame.len(),
            "collector update"
        );
        Ok(window)
    }
}
