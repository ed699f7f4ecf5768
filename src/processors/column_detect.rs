//! Column layout inference from boundary positions.
//!
//! Question numbers line up at the left edge of their column, so the
//! distinct x-positions of accepted boundaries reveal the column layout: a
//! sufficiently wide gap between neighboring positions is a column break.

use crate::core::config::StructureConfig;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// One column of the page.
///
/// Ranges are contiguous, non-overlapping, ordered by `start_x`, and
/// together cover `[0, page_width)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    /// 0-based index, ascending by `start_x`.
    pub column_index: usize,
    /// Inclusive left edge.
    pub start_x: f32,
    /// Exclusive right edge.
    pub end_x: f32,
}

impl ColumnRange {
    /// Whether an x-coordinate falls inside this column.
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.start_x && x < self.end_x
    }
}

/// Partitions the page into columns from accepted boundary x-positions.
///
/// Zero or one distinct position yields a single column spanning the page.
/// Otherwise neighboring positions are clustered: a gap wider than the
/// adaptive threshold splits columns at the gap midpoint, unless the gap
/// exceeds the noise ceiling, in which case it is a measurement anomaly
/// and is ignored. Deterministic and total.
pub fn detect_columns(
    boundary_xs: &[f32],
    page_width: f32,
    config: &StructureConfig,
) -> Vec<ColumnRange> {
    let mut xs: Vec<f32> = boundary_xs.iter().copied().filter(|x| x.is_finite()).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs.dedup();

    if xs.len() <= 1 {
        return vec![ColumnRange {
            column_index: 0,
            start_x: 0.0,
            end_x: page_width,
        }];
    }

    let threshold = (page_width * config.column_gap_ratio).max(config.column_gap_floor);
    let ceiling = page_width * config.column_noise_ceiling_ratio;

    let mut splits = Vec::new();
    for (left, right) in xs.iter().tuple_windows() {
        let gap = right - left;
        if gap > threshold && gap <= ceiling {
            splits.push(left + gap / 2.0);
        }
    }

    let mut ranges = Vec::with_capacity(splits.len() + 1);
    let mut start_x = 0.0;
    for split in splits {
        ranges.push(ColumnRange {
            column_index: ranges.len(),
            start_x,
            end_x: split,
        });
        start_x = split;
    }
    ranges.push(ColumnRange {
        column_index: ranges.len(),
        start_x,
        end_x: page_width,
    });

    debug!(columns = ranges.len(), threshold, "detected column layout");
    ranges
}

/// The index of the column containing an x-coordinate.
///
/// Coordinates left of the page clamp to the first column; coordinates at
/// or beyond the page width clamp to the last.
pub fn column_of(columns: &[ColumnRange], x: f32) -> usize {
    columns
        .iter()
        .find(|range| range.contains(x))
        .map(|range| range.column_index)
        .unwrap_or_else(|| {
            if columns.first().is_some_and(|first| x < first.start_x) {
                0
            } else {
                columns.len().saturating_sub(1)
            }
        })
}
