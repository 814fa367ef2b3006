// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure geometry helpers: clamping, column width resolution, prefix sums, and
//! binary searches over column offsets.

use alloc::vec::Vec;

use crate::ColumnDef;

/// Width used for columns that declare neither `width` nor `min_width`.
pub const DEFAULT_COLUMN_WIDTH: f64 = 160.0;

/// Number of extra columns realized on each side of the strictly visible span.
pub const COLUMN_VIRTUALIZATION_BUFFER: usize = 2;

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: NaN resolves to `min`, and when
/// `min > max` the lower bound wins.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max.max(min)
    } else {
        value
    }
}

/// Returns `zoom` if it is a usable scale factor, `1.0` otherwise.
#[must_use]
pub fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    }
}

/// Converts a non-negative float count to `usize`, saturating.
///
/// Negative and NaN inputs become `0`.
#[must_use]
pub(crate) fn to_count(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Value is non-negative and float-to-int casts saturate"
    )]
    {
        value as usize
    }
}

/// Lossy `usize` to `f64` conversion used for pixel math.
#[must_use]
pub(crate) fn to_f64(value: usize) -> f64 {
    value as f64
}

/// Resolves the rendered width of `column` at `zoom`, using [`DEFAULT_COLUMN_WIDTH`].
#[must_use]
pub fn resolve_width(column: &ColumnDef, zoom: f64) -> f64 {
    resolve_width_with_default(column, zoom, DEFAULT_COLUMN_WIDTH)
}

/// Resolves the rendered width of `column` at `zoom`.
///
/// The base width is `width`, else `min_width`, else `default_width`; it is
/// clamped into `[min_width, max_width]` (each bound defaulting to the base)
/// and scaled by `zoom`. Non-finite results fall back to
/// `default_width * zoom`, and negative results are clamped to `0.0`.
#[must_use]
pub fn resolve_width_with_default(column: &ColumnDef, zoom: f64, default_width: f64) -> f64 {
    let zoom = sanitize_zoom(zoom);
    let base = column.width.or(column.min_width).unwrap_or(default_width);
    let min = column.min_width.unwrap_or(base);
    let max = column.max_width.unwrap_or(base);
    let scaled = min.max(max.min(base)) * zoom;
    let width = if scaled.is_finite() {
        scaled
    } else {
        default_width * zoom
    };
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}

/// Prefix sums over a run of column widths.
///
/// Invariants:
/// - `widths.len() == offsets.len()`,
/// - `offsets[0] == 0` when non-empty,
/// - `offsets[i] + widths[i] <= offsets[i + 1]`,
/// - `total_width == offsets[last] + widths[last]` (or `0` when empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnWidthMetrics {
    /// Resolved width of every column in order.
    pub widths: Vec<f64>,
    /// Start offset of every column in order.
    pub offsets: Vec<f64>,
    /// Sum of all widths.
    pub total_width: f64,
}

impl ColumnWidthMetrics {
    /// Creates empty metrics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            widths: Vec::new(),
            offsets: Vec::new(),
            total_width: 0.0,
        }
    }

    /// Builds metrics from already-resolved widths.
    ///
    /// Negative and non-finite widths are treated as `0.0`.
    pub fn from_widths<I>(widths: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut metrics = Self::new();
        for width in widths {
            metrics.push(width);
        }
        metrics
    }

    /// Appends a column of the given width.
    pub fn push(&mut self, width: f64) {
        debug_assert!(
            !width.is_nan(),
            "column widths must not be NaN; got {width:?}"
        );
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            0.0
        };
        self.offsets.push(self.total_width);
        self.widths.push(width);
        self.total_width += width;
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Returns `true` if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Mean column width, or `None` when there are no columns.
    #[must_use]
    pub fn average_width(&self) -> Option<f64> {
        if self.widths.is_empty() {
            None
        } else {
            Some(self.total_width / to_f64(self.widths.len()))
        }
    }

    /// Start offset of column `index`, or `total_width` past the end.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> f64 {
        self.offsets.get(index).copied().unwrap_or(self.total_width)
    }

    /// First column whose span ends at or after `scroll_left`.
    ///
    /// See [`find_first_visible`].
    #[must_use]
    pub fn first_visible(&self, scroll_left: f64) -> usize {
        find_first_visible(scroll_left, &self.widths, &self.offsets)
    }

    /// Last column whose start is at or before `scroll_right`.
    ///
    /// See [`find_last_visible`].
    #[must_use]
    pub fn last_visible(&self, scroll_right: f64) -> Option<usize> {
        find_last_visible(scroll_right, &self.widths, &self.offsets)
    }
}

/// Resolves every column at `zoom` and accumulates prefix sums in one pass.
pub fn accumulate<'a, I>(columns: I, zoom: f64) -> ColumnWidthMetrics
where
    I: IntoIterator<Item = &'a ColumnDef>,
{
    ColumnWidthMetrics::from_widths(columns.into_iter().map(|c| resolve_width(c, zoom)))
}

/// Binary search for the smallest index whose `[offset, offset + width)` span
/// ends at or after `scroll_left`.
///
/// Returns `widths.len()` when every column ends before `scroll_left`.
#[must_use]
pub fn find_first_visible(scroll_left: f64, widths: &[f64], offsets: &[f64]) -> usize {
    let len = widths.len().min(offsets.len());
    let mut low = 0;
    let mut high = len;
    // Invariant: every index below `low` ends before `scroll_left`, every
    // index at or above `high` ends at or after it.
    while low < high {
        let mid = low + (high - low) / 2;
        if offsets[mid] + widths[mid] >= scroll_left {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    low
}

/// Binary search for the largest index whose start is at or before `scroll_right`.
///
/// Returns `None` when every column starts after `scroll_right`.
#[must_use]
pub fn find_last_visible(scroll_right: f64, widths: &[f64], offsets: &[f64]) -> Option<usize> {
    let len = widths.len().min(offsets.len());
    let count = offsets[..len].partition_point(|&start| start <= scroll_right);
    count.checked_sub(1)
}

/// Inputs for [`calculate_visible_columns`] besides scroll and container size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleColumnsOptions {
    /// Extra columns realized on each side of the visible span.
    pub buffer: usize,
    /// Width taken by left-pinned columns.
    pub pinned_left_width: f64,
    /// Width taken by right-pinned columns.
    pub pinned_right_width: f64,
}

impl Default for VisibleColumnsOptions {
    fn default() -> Self {
        Self {
            buffer: COLUMN_VIRTUALIZATION_BUFFER,
            pinned_left_width: 0.0,
            pinned_right_width: 0.0,
        }
    }
}

/// Realized window over the scrollable columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisibleColumnRange {
    /// First realized column (inclusive).
    pub start_index: usize,
    /// One past the last realized column.
    pub end_index: usize,
    /// Width of the columns before `start_index`.
    pub left_padding: f64,
    /// Width of the columns from `end_index` on.
    pub right_padding: f64,
    /// Width of all scrollable columns.
    pub total_width: f64,
}

impl VisibleColumnRange {
    /// Width of the realized columns.
    #[must_use]
    pub fn realized_width(&self) -> f64 {
        (self.total_width - (self.left_padding + self.right_padding)).max(0.0)
    }
}

/// Computes which scrollable columns to realize for a horizontal scroll position.
///
/// When all columns fit into the space left over by pinned columns, the full
/// range is returned without padding. Otherwise the scroll position is shifted
/// by the left-pinned width, both ends are located by binary search, the span is
/// widened by `options.buffer` columns on each side, and the unrendered columns
/// are reported as pixel padding.
#[must_use]
pub fn calculate_visible_columns(
    scroll_left: f64,
    container_width: f64,
    metrics: &ColumnWidthMetrics,
    options: VisibleColumnsOptions,
) -> VisibleColumnRange {
    let len = metrics.len();
    let total_width = metrics.total_width;
    if len == 0 {
        return VisibleColumnRange {
            total_width,
            ..VisibleColumnRange::default()
        };
    }

    let container_width = if container_width.is_finite() {
        container_width
    } else {
        0.0
    };
    let effective_viewport =
        (container_width - options.pinned_left_width - options.pinned_right_width).max(0.0);
    if total_width <= effective_viewport {
        return VisibleColumnRange {
            start_index: 0,
            end_index: len,
            left_padding: 0.0,
            right_padding: 0.0,
            total_width,
        };
    }

    let scroll_left = if scroll_left.is_finite() {
        scroll_left
    } else {
        0.0
    };
    let effective_scroll_left = (scroll_left - options.pinned_left_width).max(0.0);
    let scroll_right = effective_scroll_left + effective_viewport;

    let first = metrics.first_visible(effective_scroll_left);
    let last_end = metrics.last_visible(scroll_right).map_or(0, |i| i + 1);

    let start_index = first.saturating_sub(options.buffer).min(len);
    let end_index = last_end
        .saturating_add(options.buffer)
        .min(len)
        .max(start_index);

    let left_padding = metrics.offset_of(start_index);
    let right_padding = (total_width - metrics.offset_of(end_index)).max(0.0);

    VisibleColumnRange {
        start_index,
        end_index,
        left_padding,
        right_padding,
        total_width,
    }
}

/// Returns the smallest scroll offset change that brings `[item_start, item_start + item_extent)`
/// fully into a viewport of `viewport_extent` starting at `current`.
///
/// Offsets already showing the item are returned unchanged.
#[must_use]
pub fn scroll_offset_into_view(
    item_start: f64,
    item_extent: f64,
    viewport_extent: f64,
    current: f64,
) -> f64 {
    let item_end = item_start + item_extent;
    let view_end = current + viewport_extent;
    if item_start < current {
        item_start
    } else if item_end > view_end {
        (item_end - viewport_extent).max(0.0)
    } else {
        current
    }
}
