use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Column names of the open/high/low/close table consumed by candle artists.
pub const OHLC_COLUMNS: [&str; 4] = ["o", "h", "l", "c"];

/// One named numeric column aligned to an x index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRecord")]
pub struct Series {
    name: Option<String>,
    index: Vec<f64>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(name: Option<&str>, index: Vec<f64>, values: Vec<f64>) -> ChartResult<Self> {
        if index.len() != values.len() {
            return Err(ChartError::ColumnLength {
                column: name.unwrap_or("<unnamed>").to_owned(),
                expected: index.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            name: name.map(str::to_owned),
            index,
            values,
        })
    }

    /// Builds a series indexed by position (`0, 1, 2, ...`).
    #[must_use]
    pub fn from_values(name: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            name: name.map(str::to_owned),
            index: (0..values.len()).map(|i| i as f64).collect(),
            values,
        }
    }

    /// Builds a series from timestamped decimal samples.
    pub fn from_decimal_samples(
        name: Option<&str>,
        samples: &[(DateTime<Utc>, Decimal)],
    ) -> ChartResult<Self> {
        let field = name.unwrap_or("value");
        let mut index = Vec::with_capacity(samples.len());
        let mut values = Vec::with_capacity(samples.len());
        for (time, value) in samples {
            index.push(datetime_to_unix_seconds(*time));
            values.push(decimal_to_f64(*value, field)?);
        }
        Self::new(name, index, values)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
}

#[derive(Deserialize)]
struct SeriesRecord {
    name: Option<String>,
    index: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<SeriesRecord> for Series {
    type Error = ChartError;

    fn try_from(record: SeriesRecord) -> ChartResult<Self> {
        Self::new(record.name.as_deref(), record.index, record.values)
    }
}

/// Ordered table of equal-length numeric columns sharing one x index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DataFrameRecord")]
pub struct DataFrame {
    index: Vec<f64>,
    columns: IndexMap<String, Vec<f64>>,
}

/// Unchecked wire form of a frame; every column is re-inserted on load.
#[derive(Deserialize)]
struct DataFrameRecord {
    index: Vec<f64>,
    #[serde(default)]
    columns: IndexMap<String, Vec<f64>>,
}

impl TryFrom<DataFrameRecord> for DataFrame {
    type Error = ChartError;

    fn try_from(record: DataFrameRecord) -> ChartResult<Self> {
        let mut frame = Self::new(record.index);
        for (name, values) in record.columns {
            frame.insert_column(&name, values)?;
        }
        Ok(frame)
    }
}

impl DataFrame {
    #[must_use]
    pub fn new(index: Vec<f64>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_datetime_index(index: &[DateTime<Utc>]) -> Self {
        Self::new(index.iter().copied().map(datetime_to_unix_seconds).collect())
    }

    /// Adds or replaces a column; its length must match the index.
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> ChartResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> ChartResult<()> {
        if values.len() != self.index.len() {
            return Err(ChartError::ColumnLength {
                column: name.to_owned(),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name.to_owned(), values);
        Ok(())
    }

    /// Adds a series as a column, using its name or `fallback_name`.
    pub fn insert_series(&mut self, series: &Series, fallback_name: &str) -> ChartResult<()> {
        if series.index() != self.index.as_slice() {
            return Err(ChartError::InvalidData(
                "series index does not match frame index".to_owned(),
            ));
        }
        let name = series.name().unwrap_or(fallback_name);
        self.insert_column(name, series.values().to_vec())
    }

    #[must_use]
    pub fn index(&self) -> &[f64] {
        &self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Returns a column as a named series sharing the frame index.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<Series> {
        self.columns.get(name).map(|values| Series {
            name: Some(name.to_owned()),
            index: self.index.clone(),
            values: values.clone(),
        })
    }

    /// Projects the frame onto `names`, preserving the requested order.
    pub fn select(&self, names: &[&str]) -> ChartResult<Self> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.columns.contains_key(**name))
            .map(|name| (*name).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(ChartError::MissingColumns(missing));
        }

        let columns = names
            .iter()
            .filter_map(|name| {
                self.columns
                    .get(*name)
                    .map(|values| ((*name).to_owned(), values.clone()))
            })
            .collect();
        Ok(Self {
            index: self.index.clone(),
            columns,
        })
    }

    /// Renames columns in place, applying `renames` in order.
    ///
    /// Renaming onto a column that exists at that point of the batch is
    /// rejected, including a target produced by an earlier rename. Nothing is
    /// renamed when any entry fails.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) -> ChartResult<()> {
        let mut names: IndexSet<&str> = self.columns.keys().map(String::as_str).collect();
        for (from, to) in renames {
            let Some(position) = names.get_index_of(*from) else {
                return Err(ChartError::MissingColumns(vec![(*from).to_owned()]));
            };
            if from == to {
                continue;
            }
            if names.contains(*to) {
                return Err(ChartError::InvalidData(format!(
                    "cannot rename `{from}` to existing column `{to}`"
                )));
            }
            names.shift_remove_index(position);
            names.shift_insert(position, *to);
        }

        for (from, to) in renames {
            if let Some(position) = self.columns.get_index_of(*from) {
                if let Some((_, values)) = self.columns.shift_remove_index(position) {
                    self.columns.shift_insert(position, (*to).to_owned(), values);
                }
            }
        }
        Ok(())
    }

    /// Copies rows `[start, end)` into a new frame.
    pub fn slice_rows(&self, start: usize, end: usize) -> ChartResult<Self> {
        if start > end || end > self.len() {
            return Err(ChartError::InvalidData(format!(
                "row range {start}..{end} is out of bounds for {} row(s)",
                self.len()
            )));
        }
        Ok(Self {
            index: self.index[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
                .collect(),
        })
    }
}
