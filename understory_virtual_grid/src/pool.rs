// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot-stable row pools.

use alloc::vec::Vec;

use crate::geometry::to_f64;

/// A row as supplied by the host, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow<T> {
    /// Host row payload.
    pub row: T,
    /// Position of the row in the unsorted, unfiltered dataset.
    pub original_index: usize,
}

impl<T> SourceRow<T> {
    /// Wraps `row` with its original dataset index.
    pub const fn new(row: T, original_index: usize) -> Self {
        Self {
            row,
            original_index,
        }
    }
}

/// A realized row together with its position in the current view.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow<T> {
    /// Host row payload.
    pub row: T,
    /// Position of the row in the unsorted, unfiltered dataset.
    pub original_index: usize,
    /// Position of the row in the current (sorted, filtered) view.
    pub display_index: usize,
}

impl<T> VisibleRow<T> {
    /// Top edge of this row for uniform `row_height`.
    #[must_use]
    pub fn offset(&self, row_height: f64) -> f64 {
        to_f64(self.display_index) * row_height
    }
}

/// Fixed-capacity slots backing the realized row window.
///
/// Slot `i` holds the row at display index `start + i`, or `None` past the end
/// of the dataset, so renderers can keep one stable child per slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPool<T> {
    start: usize,
    slots: Vec<Option<VisibleRow<T>>>,
}

impl<T> Default for RowPool<T> {
    fn default() -> Self {
        Self {
            start: 0,
            slots: Vec::new(),
        }
    }
}

impl<T: Clone> RowPool<T> {
    /// Builds a pool of exactly `pool_size` slots starting at `start`.
    #[must_use]
    pub fn build(rows: &[SourceRow<T>], start: usize, pool_size: usize) -> Self {
        let mut pool = Self::default();
        pool.rebuild(rows, start, pool_size);
        pool
    }

    /// Refills the pool in place, reusing its allocation.
    pub fn rebuild(&mut self, rows: &[SourceRow<T>], start: usize, pool_size: usize) {
        self.start = start;
        self.slots.clear();
        self.slots.reserve(pool_size);
        self.slots.extend((0..pool_size).map(|slot| {
            let display_index = start.checked_add(slot)?;
            rows.get(display_index).map(|source| VisibleRow {
                row: source.row.clone(),
                original_index: source.original_index,
                display_index,
            })
        }));
    }
}

impl<T> RowPool<T> {
    /// Display index of slot `0`.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of slots, occupied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots, with `None` for placeholders.
    #[must_use]
    pub fn slots(&self) -> &[Option<VisibleRow<T>>] {
        &self.slots
    }

    /// Row in `slot`, if the slot exists and is occupied.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&VisibleRow<T>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots in display order.
    pub fn rows(&self) -> impl Iterator<Item = &VisibleRow<T>> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.rows().count()
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        self.start = 0;
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{RowPool, SourceRow};

    fn source(count: usize) -> Vec<SourceRow<&'static str>> {
        ["a", "b", "c", "d", "e"]
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, row)| SourceRow::new(row, 100 + i))
            .collect()
    }

    #[test]
    fn placeholders_fill_slots_past_the_end() {
        let pool = RowPool::build(&source(3), 1, 5);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.start(), 1);

        let rows: Vec<_> = pool.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, "b");
        assert_eq!(rows[0].display_index, 1);
        assert_eq!(rows[0].original_index, 101);
        assert_eq!(rows[1].display_index, 2);

        assert!(pool.get(1).is_some());
        assert!(pool.slots()[2..].iter().all(Option::is_none));
        assert_eq!(pool.occupied(), 2);
    }

    #[test]
    fn empty_pool_for_zero_size() {
        let pool = RowPool::build(&source(3), 0, 0);
        assert!(pool.is_empty());
        assert_eq!(pool.rows().count(), 0);
    }

    #[test]
    fn rebuild_replaces_contents() {
        let rows = source(5);
        let mut pool = RowPool::build(&rows, 0, 3);
        pool.rebuild(&rows, 2, 3);
        let names: Vec<_> = pool.rows().map(|r| r.row).collect();
        assert_eq!(names, ["c", "d", "e"]);
        assert_eq!(pool.get(0).map(|r| r.offset(24.0)), Some(48.0));

        pool.clear();
        assert!(pool.is_empty());
    }
}
