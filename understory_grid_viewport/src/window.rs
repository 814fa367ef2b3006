// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The realized set of columns for one update.

use alloc::vec::Vec;
use core::ops::Range;

use understory_virtual_grid::{
    AxisState, ColumnLayout, ColumnMetric, HorizontalPayload, PinnedColumns,
};

/// Columns to render after an update, pinned runs included.
///
/// Paddings stand in for the scrollable columns outside
/// [`ColumnWindow::scrollable_range`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnWindow {
    /// Left-pinned columns.
    pub pinned_left: PinnedColumns,
    /// Right-pinned columns.
    pub pinned_right: PinnedColumns,
    /// Realized scrollable columns.
    pub visible_scrollable: Vec<ColumnMetric>,
    /// `pinned_left`, then `visible_scrollable`, then `pinned_right`.
    pub visible: Vec<ColumnMetric>,
    /// Smallest source index among `visible`.
    pub visible_start: usize,
    /// One past the largest source index among `visible`.
    pub visible_end: usize,
    /// Realized positions within the scrollable run.
    pub scrollable_range: Range<usize>,
    /// Width of scrollable columns before the realized range.
    pub left_padding: f64,
    /// Width of scrollable columns after the realized range.
    pub right_padding: f64,
    /// Width of every scrollable column.
    pub total_scrollable_width: f64,
    /// Width of the realized scrollable columns.
    pub visible_scrollable_width: f64,
    /// Width of the left-pinned run.
    pub pinned_left_width: f64,
    /// Width of the right-pinned run.
    pub pinned_right_width: f64,
}

impl ColumnWindow {
    /// Assembles the window for the horizontal `state` over `layout`.
    ///
    /// Paddings are taken from the prefix sums of the realized range so they
    /// always agree with `visible_scrollable`.
    #[must_use]
    pub fn build(layout: &ColumnLayout, state: &AxisState<HorizontalPayload>) -> Self {
        let scrollable = layout.scrollable();
        let start = state.start_index.min(scrollable.len());
        let end = state.end_index.clamp(start, scrollable.len());
        let metrics = layout.metrics();

        let visible_scrollable = scrollable[start..end].to_vec();
        let mut visible = Vec::with_capacity(
            layout.pinned_left().len() + visible_scrollable.len() + layout.pinned_right().len(),
        );
        visible.extend_from_slice(layout.pinned_left());
        visible.extend_from_slice(&visible_scrollable);
        visible.extend_from_slice(layout.pinned_right());

        let (visible_start, visible_end) = visible
            .iter()
            .map(|metric| metric.index)
            .fold(None, |span: Option<(usize, usize)>, index| match span {
                None => Some((index, index + 1)),
                Some((lo, hi)) => Some((lo.min(index), hi.max(index + 1))),
            })
            .unwrap_or((0, 0));

        let total_scrollable_width = metrics.total_width;
        let left_padding = metrics.offset_of(start);
        let right_padding = (total_scrollable_width - metrics.offset_of(end)).max(0.0);

        Self {
            pinned_left: layout.pinned_left().iter().cloned().collect(),
            pinned_right: layout.pinned_right().iter().cloned().collect(),
            visible_scrollable,
            visible,
            visible_start,
            visible_end,
            scrollable_range: start..end,
            left_padding,
            right_padding,
            total_scrollable_width,
            visible_scrollable_width: (total_scrollable_width - left_padding - right_padding)
                .max(0.0),
            pinned_left_width: layout.pinned_left_width(),
            pinned_right_width: layout.pinned_right_width(),
        }
    }

    /// Returns `true` if the column with source index `index` is realized.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        self.visible.iter().any(|metric| metric.index == index)
    }

    /// Keys of the realized columns in render order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(|metric| &*metric.key)
    }
}
