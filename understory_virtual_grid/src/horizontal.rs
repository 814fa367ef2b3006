// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variable-width, pin-aware column windowing.

use crate::axis::{
    AxisContext, AxisPlan, AxisRange, AxisStrategy, NativeExtent, SCROLL_EDGE_PADDING,
    clamp_to_max,
};
use crate::geometry::{
    COLUMN_VIRTUALIZATION_BUFFER, VisibleColumnsOptions, calculate_visible_columns, to_count,
    to_f64,
};
use crate::layout::ColumnLayout;

/// Per-update inputs of [`HorizontalStrategy`].
#[derive(Debug, Clone, Default)]
pub struct HorizontalMeta {
    /// Column geometry for this pass.
    pub layout: ColumnLayout,
    /// Native horizontal extent of the host surface, if reported.
    pub native: Option<NativeExtent>,
    /// Width available to columns, pinned ones included.
    pub container_width: f64,
}

impl HorizontalMeta {
    /// Creates metadata for `layout` inside a container of `container_width`.
    #[must_use]
    pub fn new(layout: ColumnLayout, container_width: f64) -> Self {
        Self {
            layout,
            native: None,
            container_width,
        }
    }

    /// Sets the native extent used as clamp fallback.
    #[must_use]
    pub fn with_native(mut self, native: Option<NativeExtent>) -> Self {
        self.native = native;
        self
    }

    /// Container width minus both pinned runs, never negative.
    #[must_use]
    pub fn effective_viewport(&self) -> f64 {
        let container = if self.container_width.is_finite() {
            self.container_width
        } else {
            0.0
        };
        (container - self.layout.pinned_left_width() - self.layout.pinned_right_width()).max(0.0)
    }
}

/// Column window data carried in the horizontal [`AxisState`](crate::AxisState).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizontalPayload {
    /// First scrollable column intersecting the viewport (buffer included).
    pub visible_start: usize,
    /// One past the last scrollable column intersecting the viewport.
    pub visible_end: usize,
    /// Width of scrollable columns before the realized range.
    pub left_padding: f64,
    /// Width of scrollable columns after the realized range.
    pub right_padding: f64,
    /// Width of all scrollable columns.
    pub total_scrollable_width: f64,
    /// Width of the realized scrollable columns.
    pub visible_scrollable_width: f64,
}

/// Scrollable columns of varying width, with pinned runs excluded from
/// scrolling.
///
/// `buffer` whole columns are realized on each side of the strictly visible
/// span; the plan's overscan adds further columns on top of that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalStrategy {
    buffer: usize,
    edge_padding: f64,
}

impl Default for HorizontalStrategy {
    fn default() -> Self {
        Self::new(COLUMN_VIRTUALIZATION_BUFFER, SCROLL_EDGE_PADDING)
    }
}

impl HorizontalStrategy {
    /// Creates a strategy with a custom column buffer and edge padding.
    #[must_use]
    pub const fn new(buffer: usize, edge_padding: f64) -> Self {
        Self {
            buffer,
            edge_padding,
        }
    }

    /// Extra columns realized on each side of the visible span.
    #[must_use]
    pub const fn buffer(&self) -> usize {
        self.buffer
    }

    /// Largest scroll offset for `plan`.
    #[must_use]
    pub fn max_scroll(&self, plan: &AxisPlan<'_, HorizontalMeta>) -> f64 {
        let meta = plan.meta();
        let metrics = meta.layout.metrics();
        let Some(average) = metrics.average_width() else {
            return 0.0;
        };
        let viewport = meta.effective_viewport();
        if !plan.virtualization_enabled {
            return meta.native.map_or_else(
                || (metrics.total_width - viewport).max(0.0),
                |extent| extent.max_scroll(),
            );
        }

        let buffer_px = to_f64(self.buffer) * average;
        let trailing_gap = (viewport - metrics.total_width).max(0.0);
        let base = (metrics.total_width - viewport).max(0.0);
        let extended = base + buffer_px + trailing_gap + self.edge_padding;
        let limit = meta.native.map_or(base, |extent| extent.max_scroll());
        base.max(extended.min(limit))
    }
}

impl AxisStrategy for HorizontalStrategy {
    type Meta = HorizontalMeta;
    type Payload = HorizontalPayload;

    fn visible_count(&self, context: &AxisContext<'_, HorizontalMeta>) -> usize {
        let metrics = context.meta.layout.metrics();
        let Some(average) = metrics.average_width() else {
            return 0;
        };
        if !average.is_finite() || average <= 0.0 {
            return metrics.len();
        }
        let viewport = context.meta.effective_viewport();
        if viewport <= 0.0 {
            return 1;
        }
        to_count(libm::ceil(viewport / average)).max(1)
    }

    fn clamp_scroll(&self, value: f64, plan: &AxisPlan<'_, HorizontalMeta>) -> f64 {
        clamp_to_max(value, self.max_scroll(plan))
    }

    fn compute_range(
        &self,
        offset: f64,
        plan: &AxisPlan<'_, HorizontalMeta>,
    ) -> AxisRange<HorizontalPayload> {
        let meta = plan.meta();
        let layout = &meta.layout;
        let metrics = layout.metrics();
        let len = metrics.len();
        if len == 0 {
            return AxisRange {
                start: 0,
                end: 0,
                payload: HorizontalPayload::default(),
            };
        }
        if !plan.virtualization_enabled {
            return AxisRange {
                start: 0,
                end: len,
                payload: HorizontalPayload {
                    visible_start: 0,
                    visible_end: len,
                    left_padding: 0.0,
                    right_padding: 0.0,
                    total_scrollable_width: metrics.total_width,
                    visible_scrollable_width: metrics.total_width,
                },
            };
        }

        let visible = calculate_visible_columns(
            offset,
            meta.container_width,
            metrics,
            VisibleColumnsOptions {
                buffer: self.buffer,
                pinned_left_width: layout.pinned_left_width(),
                pinned_right_width: layout.pinned_right_width(),
            },
        );
        let start = visible
            .start_index
            .saturating_sub(plan.overscan_leading)
            .min(plan.max_pool_start());
        let end = visible
            .end_index
            .saturating_add(plan.overscan_trailing)
            .min(len)
            .max(start);

        let left_padding = metrics.offset_of(start);
        let right_padding = (metrics.total_width - metrics.offset_of(end)).max(0.0);
        AxisRange {
            start,
            end,
            payload: HorizontalPayload {
                visible_start: visible.start_index,
                visible_end: visible.end_index,
                left_padding,
                right_padding,
                total_scrollable_width: metrics.total_width,
                visible_scrollable_width: (metrics.total_width - left_padding - right_padding)
                    .max(0.0),
            },
        }
    }

    fn offset_for_index(&self, index: usize, plan: &AxisPlan<'_, HorizontalMeta>) -> f64 {
        let offsets = &plan.meta().layout.metrics().offsets;
        match offsets.len() {
            0 => 0.0,
            len => offsets[index.min(len - 1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{HorizontalMeta, HorizontalStrategy};
    use crate::axis::{Axis, AxisContext, AxisVirtualizer, NativeExtent};
    use crate::{ColumnDef, ColumnFlags, ColumnLayout, ColumnPin, DEFAULT_COLUMN_WIDTH};

    fn meta(widths: &[f64], container_width: f64) -> HorizontalMeta {
        let columns: Vec<ColumnDef> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| ColumnDef::new(alloc::format!("c{i}")).with_width(w))
            .collect();
        HorizontalMeta::new(
            ColumnLayout::build(&columns, 1.0, DEFAULT_COLUMN_WIDTH),
            container_width,
        )
    }

    fn context(meta: &HorizontalMeta, offset: f64) -> AxisContext<'_, HorizontalMeta> {
        let average = meta.layout.metrics().average_width().unwrap_or(60.0);
        AxisContext::new(
            meta.container_width,
            offset,
            average,
            meta.layout.scrollable_len(),
            meta,
        )
    }

    #[test]
    fn narrow_dataset_realizes_every_column() {
        let meta = meta(&[100.0; 5], 250.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
        let state = engine.update(&context(&meta, 0.0));
        assert_eq!((state.start_index, state.end_index), (0, 5));
        assert_eq!(state.payload.left_padding, 0.0);
        assert_eq!(state.payload.right_padding, 0.0);
        assert_eq!(state.payload.total_scrollable_width, 500.0);
    }

    #[test]
    fn scrolled_window_reports_gutters() {
        let meta = meta(&[100.0; 20], 300.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::new(1, 1.0));
        let state = engine.update(&context(&meta, 1000.0));
        assert_eq!((state.start_index, state.end_index), (8, 15));
        assert_eq!(state.payload.visible_start, 8);
        assert_eq!(state.payload.visible_end, 15);
        assert_eq!(state.payload.left_padding, 800.0);
        assert_eq!(state.payload.right_padding, 500.0);
        assert_eq!(state.payload.visible_scrollable_width, 700.0);
    }

    #[test]
    fn overscan_widens_the_column_window() {
        let meta = meta(&[100.0; 20], 300.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::new(0, 1.0));
        let state = engine.update(&context(&meta, 1000.0).with_overscan(2.0));
        // Visible 9..14, then one extra column on each side.
        assert_eq!((state.start_index, state.end_index), (8, 15));
        assert_eq!(state.payload.visible_start, 9);
        assert_eq!(state.payload.left_padding, 800.0);
    }

    #[test]
    fn pinned_columns_shrink_the_viewport() {
        let mut columns: Vec<ColumnDef> = (0..10)
            .map(|i| ColumnDef::new(alloc::format!("c{i}")).with_width(100.0))
            .collect();
        columns.insert(
            0,
            ColumnDef::new("#")
                .with_width(50.0)
                .with_flags(ColumnFlags::SYSTEM),
        );
        columns.push(
            ColumnDef::new("sum")
                .with_width(50.0)
                .pinned(ColumnPin::Right),
        );
        let layout = ColumnLayout::build(&columns, 1.0, DEFAULT_COLUMN_WIDTH);
        let meta = HorizontalMeta::new(layout, 400.0);
        assert_eq!(meta.effective_viewport(), 300.0);

        let engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
        let plan = engine.plan(&context(&meta, 0.0));
        assert_eq!(plan.total_count(), 10);
        assert_eq!(plan.visible_count, 3);

        // 1000 - 300 + 2 * 100 + 0 + 1, capped by the plain maximum without a
        // native extent.
        assert_eq!(engine.clamp_scroll(1.0e9, &context(&meta, 0.0)), 700.0);
        let roomy = meta.clone().with_native(Some(NativeExtent::new(5000.0, 400.0)));
        assert_eq!(engine.clamp_scroll(1.0e9, &context(&roomy, 0.0)), 901.0);
    }

    #[test]
    fn offsets_come_from_prefix_sums() {
        let meta = meta(&[50.0, 150.0, 75.0], 100.0);
        let engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
        let context = context(&meta, 0.0);
        assert_eq!(engine.offset_for_index(0, &context), 0.0);
        assert_eq!(engine.offset_for_index(2, &context), 200.0);
        assert_eq!(engine.offset_for_index(9, &context), 200.0);
    }

    #[test]
    fn no_columns_yields_empty_window() {
        let meta = meta(&[], 300.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
        let state = engine.update(&context(&meta, 50.0));
        assert!(state.is_empty());
        assert_eq!(state.offset, 0.0);
        assert_eq!(state.payload.total_scrollable_width, 0.0);
    }

    #[test]
    fn disabled_virtualization_passes_everything_through() {
        let meta = meta(&[100.0; 20], 300.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
        let state = engine.update(&context(&meta, 900.0).with_virtualization(false));
        assert_eq!((state.start_index, state.end_index), (0, 20));
        assert_eq!(state.payload.visible_scrollable_width, 2000.0);
        assert_eq!(state.offset, 900.0);

        let state = engine.update(&context(&meta, 5000.0).with_virtualization(false));
        assert_eq!(state.offset, 1700.0);
    }

    #[test]
    fn window_at_the_end_keeps_a_full_pool_and_matching_gutters() {
        let mut widths = [10.0; 20];
        widths[18] = 500.0;
        widths[19] = 500.0;
        let meta = meta(&widths, 300.0);
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::new(2, 1.0));
        let state = engine.update(&context(&meta, 1.0e9));
        assert_eq!(state.offset, 880.0);
        // Six columns of average width fill the pool, so it starts at 14.
        assert_eq!(state.pool_size, 6);
        assert_eq!((state.start_index, state.end_index), (14, 20));
        assert_eq!(state.payload.left_padding, 140.0);
        assert_eq!(state.payload.right_padding, 0.0);
        assert_eq!(state.payload.visible_scrollable_width, 1040.0);
    }
}
