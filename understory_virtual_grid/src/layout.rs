// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning of a column list into pinned and scrollable runs.

use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::geometry::{ColumnWidthMetrics, resolve_width_with_default, sanitize_zoom};
use crate::{ColumnDef, ColumnMetric, ColumnPin};

/// Inline capacity for pinned runs; grids rarely pin more than a few columns.
pub type PinnedColumns = SmallVec<[ColumnMetric; 4]>;

/// Column geometry for one layout pass.
///
/// Built wholesale from the host's column list; a new layout replaces the old
/// one whenever columns or zoom change.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    zoom: f64,
    pinned_left: PinnedColumns,
    pinned_right: PinnedColumns,
    pinned_left_width: f64,
    pinned_right_width: f64,
    scrollable: Vec<ColumnMetric>,
    metrics: ColumnWidthMetrics,
    widths_by_key: HashMap<Arc<str>, f64>,
    scrollable_by_key: HashMap<Arc<str>, usize>,
}

impl ColumnLayout {
    /// Resolves widths and pins for `columns` at `zoom`.
    ///
    /// Prefix sums in [`ColumnLayout::metrics`] cover the scrollable columns
    /// only, in their original relative order.
    #[must_use]
    pub fn build(columns: &[ColumnDef], zoom: f64, default_width: f64) -> Self {
        let zoom = sanitize_zoom(zoom);
        let mut layout = Self {
            zoom,
            ..Self::default()
        };
        layout.widths_by_key.reserve(columns.len());

        for (index, column) in columns.iter().enumerate() {
            let width = resolve_width_with_default(column, zoom, default_width);
            let pin = column.resolve_pin();
            let metric = ColumnMetric {
                key: Arc::clone(&column.key),
                index,
                width,
                pin,
            };
            layout.widths_by_key.insert(Arc::clone(&column.key), width);
            match pin {
                ColumnPin::Left => {
                    layout.pinned_left_width += width;
                    layout.pinned_left.push(metric);
                }
                ColumnPin::Right => {
                    layout.pinned_right_width += width;
                    layout.pinned_right.push(metric);
                }
                ColumnPin::None => {
                    layout
                        .scrollable_by_key
                        .insert(Arc::clone(&column.key), layout.scrollable.len());
                    layout.metrics.push(width);
                    layout.scrollable.push(metric);
                }
            }
        }
        layout
    }

    /// Zoom factor the widths were resolved at.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Columns pinned to the left edge, in source order.
    #[must_use]
    pub fn pinned_left(&self) -> &[ColumnMetric] {
        &self.pinned_left
    }

    /// Columns pinned to the right edge, in source order.
    #[must_use]
    pub fn pinned_right(&self) -> &[ColumnMetric] {
        &self.pinned_right
    }

    /// Combined width of left-pinned columns.
    #[must_use]
    pub fn pinned_left_width(&self) -> f64 {
        self.pinned_left_width
    }

    /// Combined width of right-pinned columns.
    #[must_use]
    pub fn pinned_right_width(&self) -> f64 {
        self.pinned_right_width
    }

    /// Number of columns, pinned and scrollable.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pinned_left.len() + self.scrollable.len() + self.pinned_right.len()
    }

    /// Returns `true` if the layout has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scrollable columns, in source order.
    #[must_use]
    pub fn scrollable(&self) -> &[ColumnMetric] {
        &self.scrollable
    }

    /// Number of scrollable columns.
    #[must_use]
    pub fn scrollable_len(&self) -> usize {
        self.scrollable.len()
    }

    /// Prefix sums over the scrollable columns.
    #[must_use]
    pub fn metrics(&self) -> &ColumnWidthMetrics {
        &self.metrics
    }

    /// Resolved width of every column, keyed by column key.
    #[must_use]
    pub fn widths_by_key(&self) -> &HashMap<Arc<str>, f64> {
        &self.widths_by_key
    }

    /// Resolved width of the column with `key`.
    #[must_use]
    pub fn width_of(&self, key: &str) -> Option<f64> {
        self.widths_by_key.get(key).copied()
    }

    /// Position of `key` within the scrollable run, if it scrolls.
    #[must_use]
    pub fn scrollable_position(&self, key: &str) -> Option<usize> {
        self.scrollable_by_key.get(key).copied()
    }

    /// Pin of the column with `key`, if it exists.
    #[must_use]
    pub fn pin_of(&self, key: &str) -> Option<ColumnPin> {
        if self.scrollable_by_key.contains_key(key) {
            return Some(ColumnPin::None);
        }
        if self.pinned_left.iter().any(|m| &*m.key == key) {
            return Some(ColumnPin::Left);
        }
        if self.pinned_right.iter().any(|m| &*m.key == key) {
            return Some(ColumnPin::Right);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnLayout;
    use crate::{ColumnDef, ColumnFlags, ColumnPin, DEFAULT_COLUMN_WIDTH};

    fn columns() -> [ColumnDef; 5] {
        [
            ColumnDef::new("#").with_width(40.0).with_flags(ColumnFlags::SYSTEM),
            ColumnDef::new("a").with_width(100.0),
            ColumnDef::new("total").with_width(80.0).pinned(ColumnPin::Right),
            ColumnDef::new("b").with_width(120.0),
            ColumnDef::new("c"),
        ]
    }

    #[test]
    fn partitions_pinned_and_scrollable() {
        let layout = ColumnLayout::build(&columns(), 1.0, DEFAULT_COLUMN_WIDTH);

        assert_eq!(layout.len(), 5);
        assert_eq!(layout.pinned_left().len(), 1);
        assert_eq!(layout.pinned_right().len(), 1);
        assert_eq!(layout.pinned_left_width(), 40.0);
        assert_eq!(layout.pinned_right_width(), 80.0);

        let indices: alloc::vec::Vec<usize> =
            layout.scrollable().iter().map(|m| m.index).collect();
        assert_eq!(indices, [1, 3, 4]);
        assert_eq!(layout.metrics().offsets, [0.0, 100.0, 220.0]);
        assert_eq!(layout.metrics().total_width, 220.0 + DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn key_lookups_cover_every_column() {
        let layout = ColumnLayout::build(&columns(), 2.0, DEFAULT_COLUMN_WIDTH);
        assert_eq!(layout.width_of("#"), Some(80.0));
        assert_eq!(layout.width_of("total"), Some(160.0));
        assert_eq!(layout.width_of("b"), Some(240.0));
        assert_eq!(layout.width_of("missing"), None);

        assert_eq!(layout.scrollable_position("b"), Some(1));
        assert_eq!(layout.scrollable_position("#"), None);
        assert_eq!(layout.pin_of("#"), Some(ColumnPin::Left));
        assert_eq!(layout.pin_of("total"), Some(ColumnPin::Right));
        assert_eq!(layout.pin_of("c"), Some(ColumnPin::None));
        assert_eq!(layout.pin_of("missing"), None);
    }

    #[test]
    fn empty_column_list_yields_empty_layout() {
        let layout = ColumnLayout::build(&[], 1.0, DEFAULT_COLUMN_WIDTH);
        assert!(layout.is_empty());
        assert_eq!(layout.scrollable_len(), 0);
        assert!(layout.metrics().is_empty());
        assert_eq!(layout.pinned_left_width(), 0.0);
    }
}
