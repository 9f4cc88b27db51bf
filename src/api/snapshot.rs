use serde::{Deserialize, Serialize};

use crate::core::{AxisLimit, GridRect, PixelRect, ViewportPhase, VisibleWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::LegendPosition;

use super::axes::YLimit;
use super::figure::{Figure, FigureState};

pub const FIGURE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesSnapshot {
    pub label: char,
    pub grid: GridRect,
    pub rect: PixelRect,
    pub title: Option<String>,
    pub y_limit: Option<AxisLimit>,
    pub static_ylim: bool,
    pub legend: Option<LegendPosition>,
    pub artist_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub len: usize,
    pub visible_count: usize,
    pub update_step: usize,
    pub cursor: usize,
    pub window: VisibleWindow,
    pub timeframe: f64,
    pub x_limit: (f64, f64),
    pub phase: ViewportPhase,
}

/// Serializable figure state used by regression tests and debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub state: FigureState,
    pub title: Option<String>,
    pub viewport: Option<ViewportSnapshot>,
    pub axes: Vec<AxesSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: FigureSnapshot,
}

impl Figure {
    #[must_use]
    pub fn snapshot(&self) -> FigureSnapshot {
        let viewport = self.viewport().map(|viewport| ViewportSnapshot {
            len: viewport.len(),
            visible_count: viewport.visible_count(),
            update_step: viewport.update_step(),
            cursor: viewport.cursor(),
            window: viewport.visible_window(),
            timeframe: viewport.timeframe(),
            x_limit: viewport.x_limit(),
            phase: viewport.phase(),
        });
        let axes = self
            .layout()
            .slots()
            .iter()
            .zip(self.rects())
            .enumerate()
            .filter_map(|(index, (slot, rect))| {
                let axes = self.axes(index).ok()?;
                Some(AxesSnapshot {
                    label: slot.label,
                    grid: slot.rect,
                    rect: *rect,
                    title: axes.title().map(str::to_owned),
                    y_limit: axes.y_limit(),
                    static_ylim: matches!(axes.ylim(), YLimit::Static(_)),
                    legend: axes.legend(),
                    artist_count: axes.artists().len(),
                })
            })
            .collect();

        FigureSnapshot {
            rows: self.layout().rows(),
            cols: self.layout().cols(),
            state: self.state(),
            title: self.title().map(str::to_owned),
            viewport,
            axes,
        }
    }

    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        let payload = FigureSnapshotJsonContractV1 {
            schema_version: FIGURE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.snapshot(),
        };
        serde_json::to_string_pretty(&payload)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize figure snapshot: {e}")))
    }
}

impl FigureSnapshot {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let payload: FigureSnapshotJsonContractV1 = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse figure snapshot: {e}")))?;
        if payload.schema_version != FIGURE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
