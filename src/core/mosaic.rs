use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MosaicError;

/// Characters that separate regions and never name a subplot.
pub const SEPARATORS: [char; 2] = [' ', '\t'];

/// Character that may not appear in a label position.
pub const RESERVED_LABEL: char = '\0';

#[must_use]
pub fn is_separator(ch: char) -> bool {
    SEPARATORS.contains(&ch)
}

/// Rectangle in grid units, after separator columns were removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub col: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

impl GridRect {
    #[must_use]
    pub const fn new(col: usize, row: usize, width: usize, height: usize) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    #[must_use]
    pub fn area(self) -> usize {
        self.width * self.height
    }
}

/// One labelled subplot region of a resolved mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicSlot {
    pub label: char,
    pub rect: GridRect,
}

/// Normalized grid assignment produced from a textual mosaic.
///
/// Slots are ordered by first appearance (row-major). The layout is immutable
/// once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicLayout {
    rows: usize,
    cols: usize,
    slots: Vec<MosaicSlot>,
}

impl MosaicLayout {
    /// Resolves newline-separated mosaic text.
    pub fn parse(spec: &str) -> Result<Self, MosaicError> {
        let rows: Vec<&str> = spec.lines().collect();
        Self::resolve(&rows)
    }

    /// Resolves an ordered sequence of text rows.
    ///
    /// Fully blank rows are dropped before any validation. Columns made only
    /// of separators are removed from the output coordinates.
    pub fn resolve<S: AsRef<str>>(rows: &[S]) -> Result<Self, MosaicError> {
        let grid: Vec<Vec<char>> = rows
            .iter()
            .map(|row| row.as_ref().chars().collect::<Vec<char>>())
            .filter(|row| !row.is_empty() && !row.iter().all(|ch| is_separator(*ch)))
            .collect();

        let Some(first) = grid.first() else {
            return Err(MosaicError::EmptySpec);
        };
        let width = first.len();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != width {
                return Err(MosaicError::RaggedSpec {
                    row,
                    expected: width,
                    actual: cells.len(),
                });
            }
        }

        let separator_columns: Vec<bool> = first.iter().map(|ch| is_separator(*ch)).collect();
        for (row, cells) in grid.iter().enumerate().skip(1) {
            for (col, ch) in cells.iter().enumerate() {
                if is_separator(*ch) != separator_columns[col] {
                    return Err(MosaicError::InconsistentSeparator { row, col });
                }
            }
        }

        let trackers = scan_labels(&grid)?;

        let mut compact_columns = Vec::with_capacity(width);
        let mut cols = 0;
        for is_sep in &separator_columns {
            compact_columns.push(cols);
            if !is_sep {
                cols += 1;
            }
        }

        let slots = trackers
            .into_iter()
            .map(|(label, tracker)| MosaicSlot {
                label,
                rect: GridRect {
                    col: compact_columns[tracker.rect.col],
                    ..tracker.rect
                },
            })
            .collect();

        Ok(Self {
            rows: grid.len(),
            cols,
            slots,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn slots(&self) -> &[MosaicSlot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = char> + '_ {
        self.slots.iter().map(|slot| slot.label)
    }

    #[must_use]
    pub fn index_of(&self, label: char) -> Option<usize> {
        self.slots.iter().position(|slot| slot.label == label)
    }

    #[must_use]
    pub fn rect(&self, label: char) -> Option<GridRect> {
        self.slots
            .iter()
            .find(|slot| slot.label == label)
            .map(|slot| slot.rect)
    }
}

impl FromStr for MosaicLayout {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Growing footprint of one label while scanning, in raw text coordinates.
#[derive(Debug, Clone, Copy)]
struct LabelTracker {
    rect: GridRect,
    last_row: usize,
    last_col: usize,
}

impl LabelTracker {
    fn last_row_complete(self) -> bool {
        self.last_col + 1 == self.rect.col + self.rect.width
    }
}

fn scan_labels(grid: &[Vec<char>]) -> Result<IndexMap<char, LabelTracker>, MosaicError> {
    let mut trackers: IndexMap<char, LabelTracker> = IndexMap::new();

    for (row, cells) in grid.iter().enumerate() {
        for (col, &label) in cells.iter().enumerate() {
            if is_separator(label) {
                continue;
            }
            if label == RESERVED_LABEL {
                return Err(MosaicError::ReservedCharacter { row, col });
            }

            let Some(tracker) = trackers.get_mut(&label) else {
                trackers.insert(
                    label,
                    LabelTracker {
                        rect: GridRect::new(col, row, 1, 1),
                        last_row: row,
                        last_col: col,
                    },
                );
                continue;
            };

            let non_rectangular = MosaicError::NonRectangularLabel { label, row, col };
            if row == tracker.last_row {
                if col != tracker.last_col + 1 {
                    let gap = &cells[tracker.last_col + 1..col];
                    if gap.iter().all(|ch| is_separator(*ch)) {
                        return Err(MosaicError::InconsistentSeparator {
                            row,
                            col: tracker.last_col + 1,
                        });
                    }
                    return Err(non_rectangular);
                }
                if row == tracker.rect.row {
                    tracker.rect.width += 1;
                } else if col >= tracker.rect.col + tracker.rect.width {
                    return Err(non_rectangular);
                }
                tracker.last_col = col;
            } else {
                if row != tracker.last_row + 1 || col != tracker.rect.col {
                    return Err(non_rectangular);
                }
                if !tracker.last_row_complete() {
                    return Err(MosaicError::NonRectangularLabel {
                        label,
                        row: tracker.last_row,
                        col: tracker.last_col + 1,
                    });
                }
                tracker.rect.height += 1;
                tracker.last_row = row;
                tracker.last_col = col;
            }
        }
    }

    for (&label, tracker) in &trackers {
        if !tracker.last_row_complete() {
            return Err(MosaicError::NonRectangularLabel {
                label,
                row: tracker.last_row,
                col: tracker.last_col + 1,
            });
        }
    }

    Ok(trackers)
}
