// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Virtual Grid: dual-axis virtualization primitives.
//!
//! This crate computes which part of a large two-dimensional grid must be
//! materialized for a given scroll position and viewport. Rows and columns are
//! windowed independently:
//!
//! - [`AxisVirtualizer`]: a generic per-axis engine. Each update derives how
//!   many items fill the viewport, sizes a pool with leading and trailing
//!   overscan, clamps the scroll offset, and normalizes the realized range so
//!   it always lies inside `0..total_count`.
//! - [`AxisStrategy`]: the windowing policy plugged into the engine. Two are
//!   provided:
//!   - [`VerticalStrategy`] for uniform row heights,
//!   - [`HorizontalStrategy`] for variable column widths with pinned columns.
//! - [`ColumnLayout`]: partitions [`ColumnDef`]s into pinned-left, scrollable
//!   and pinned-right runs and keeps prefix sums over the scrollable ones.
//! - [`RowPool`]: a slot-stable pool of realized rows with placeholders past
//!   the end of the dataset.
//! - Geometry helpers such as [`calculate_visible_columns`],
//!   [`find_first_visible`] and [`find_last_visible`].
//!
//! The engine never fails. Degenerate inputs (no rows, no columns, a zero
//! viewport, non-finite measurements) produce an empty or minimal window.
//!
//! Host integration (measuring surfaces, writing scroll offsets back, frame
//! scheduling) lives in `understory_grid_viewport`.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_virtual_grid::{
//!     Axis, AxisContext, AxisVirtualizer, RowPool, SourceRow, VerticalMeta, VerticalStrategy,
//! };
//!
//! let rows: Vec<SourceRow<u32>> = (0..1000).map(|i| SourceRow::new(i, i as usize)).collect();
//! let meta = VerticalMeta::default();
//! let mut rows_axis = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
//!
//! // 240px viewport, 24px rows, scrolled to 500px, 15 rows of overscan.
//! let context = AxisContext::new(240.0, 500.0, 24.0, rows.len(), &meta).with_overscan(15.0);
//! let state = rows_axis.update(&context);
//! assert_eq!(state.visible_count, 10);
//! assert_eq!(state.pool_size, 25);
//!
//! let pool = RowPool::build(&rows, state.start_index, state.pool_size);
//! assert_eq!(pool.len(), 25);
//! assert_eq!(pool.rows().next().map(|r| r.display_index), Some(state.start_index));
//! ```
//!
//! ## Columns
//!
//! ```rust
//! use understory_virtual_grid::{
//!     Axis, AxisContext, AxisVirtualizer, ColumnDef, ColumnLayout, ColumnPin, HorizontalMeta,
//!     HorizontalStrategy, DEFAULT_COLUMN_WIDTH,
//! };
//!
//! let mut columns: Vec<ColumnDef> = (0..50)
//!     .map(|i| ColumnDef::new(format!("col{i}")).with_width(120.0))
//!     .collect();
//! columns[0] = ColumnDef::new("id").with_width(60.0).pinned(ColumnPin::Left);
//!
//! let layout = ColumnLayout::build(&columns, 1.0, DEFAULT_COLUMN_WIDTH);
//! let meta = HorizontalMeta::new(layout, 800.0);
//! let average = meta.layout.metrics().average_width().unwrap_or(DEFAULT_COLUMN_WIDTH);
//! let mut columns_axis = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
//!
//! let context = AxisContext::new(800.0, 1200.0, average, meta.layout.scrollable_len(), &meta);
//! let state = columns_axis.update(&context);
//! assert!(state.start_index > 0);
//! assert!(state.payload.left_padding > 0.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod axis;
mod column;
mod geometry;
mod horizontal;
mod layout;
mod pool;
mod vertical;

pub use axis::{
    Axis, AxisContext, AxisPlan, AxisRange, AxisState, AxisStrategy, AxisVirtualizer,
    NativeExtent, SCROLL_EDGE_PADDING,
};
pub use column::{ColumnDef, ColumnFlags, ColumnMetric, ColumnPin};
pub use geometry::{
    COLUMN_VIRTUALIZATION_BUFFER, ColumnWidthMetrics, DEFAULT_COLUMN_WIDTH, VisibleColumnRange,
    VisibleColumnsOptions, accumulate, calculate_visible_columns, clamp, find_first_visible,
    find_last_visible, resolve_width, resolve_width_with_default, sanitize_zoom,
    scroll_offset_into_view,
};
pub use horizontal::{HorizontalMeta, HorizontalPayload, HorizontalStrategy};
pub use layout::{ColumnLayout, PinnedColumns};
pub use pool::{RowPool, SourceRow, VisibleRow};
pub use vertical::{VerticalMeta, VerticalStrategy};
