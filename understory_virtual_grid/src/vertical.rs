// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed row height windowing.

use crate::axis::{
    AxisContext, AxisPlan, AxisRange, AxisStrategy, NativeExtent, SCROLL_EDGE_PADDING,
    clamp_to_max,
};
use crate::geometry::{sanitize_zoom, to_count, to_f64};

/// Per-update inputs of [`VerticalStrategy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMeta {
    /// Native vertical extent of the host surface, if the host can report it.
    pub native: Option<NativeExtent>,
    /// Zoom factor applied to the grid.
    pub zoom: f64,
}

impl Default for VerticalMeta {
    fn default() -> Self {
        Self {
            native: None,
            zoom: 1.0,
        }
    }
}

/// Uniform rows of `estimated_item_size` pixels.
///
/// The scroll maximum is extended past `rows * row_height - viewport` by the
/// trailing overscan, the unused tail of the viewport, and
/// [`SCROLL_EDGE_PADDING`], but never beyond what the host itself allows unless
/// the host allows less than the plain content maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStrategy {
    edge_padding: f64,
}

impl Default for VerticalStrategy {
    fn default() -> Self {
        Self::new(SCROLL_EDGE_PADDING)
    }
}

impl VerticalStrategy {
    /// Creates a strategy with a custom edge padding.
    #[must_use]
    pub const fn new(edge_padding: f64) -> Self {
        Self { edge_padding }
    }

    /// Pixel slack added past the last row.
    #[must_use]
    pub const fn edge_padding(&self) -> f64 {
        self.edge_padding
    }

    /// Largest scroll offset for `plan`.
    #[must_use]
    pub fn max_scroll(&self, plan: &AxisPlan<'_, VerticalMeta>) -> f64 {
        let context = &plan.context;
        let native = context.meta.native;
        let row_height = context.estimated_item_size;
        let base = (to_f64(context.total_count) * row_height - context.viewport_size).max(0.0);
        if !plan.virtualization_enabled {
            return native.map_or(base, |extent| extent.max_scroll());
        }

        let overscan_px = to_f64(plan.overscan_trailing) * row_height;
        let visible_span = to_f64(plan.visible_count.max(1)) * row_height;
        let trailing_gap = (context.viewport_size - visible_span).max(0.0);
        let extended = base + overscan_px + trailing_gap + self.edge_padding;
        let limit = native.map_or(base, |extent| extent.max_scroll());
        base.max(extended.min(limit))
    }
}

impl AxisStrategy for VerticalStrategy {
    type Meta = VerticalMeta;
    type Payload = ();

    fn visible_count(&self, context: &AxisContext<'_, VerticalMeta>) -> usize {
        let zoom = sanitize_zoom(context.meta.zoom);
        let row_height = context.estimated_item_size;
        // Row height is already scaled when zoomed in; zoomed out views need
        // more rows to cover the same surface.
        let adjusted = if zoom >= 1.0 {
            context.viewport_size
        } else {
            context.viewport_size / zoom.max(0.01)
        };
        let span = if adjusted > 0.0 { adjusted } else { row_height };
        to_count(libm::ceil(span / row_height.max(1.0))).max(1)
    }

    fn clamp_scroll(&self, value: f64, plan: &AxisPlan<'_, VerticalMeta>) -> f64 {
        clamp_to_max(value, self.max_scroll(plan))
    }

    fn compute_range(&self, offset: f64, plan: &AxisPlan<'_, VerticalMeta>) -> AxisRange<()> {
        let total = plan.total_count();
        if !plan.virtualization_enabled {
            return AxisRange {
                start: 0,
                end: total,
                payload: (),
            };
        }
        let row_height = plan.context.estimated_item_size.max(1.0);
        let first = to_count(libm::floor(offset / row_height));
        let start = first
            .saturating_sub(plan.overscan_leading)
            .min(plan.max_pool_start());
        let end = total.min(start + plan.pool_size);
        AxisRange {
            start,
            end,
            payload: (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{VerticalMeta, VerticalStrategy};
    use crate::axis::{Axis, AxisContext, AxisStrategy, AxisVirtualizer, NativeExtent};

    fn rows(meta: &VerticalMeta, total: usize, offset: f64) -> AxisContext<'_, VerticalMeta> {
        AxisContext::new(240.0, offset, 24.0, total, meta).with_overscan(15.0)
    }

    #[test]
    fn initial_window_covers_viewport_and_overscan() {
        let meta = VerticalMeta::default();
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let state = engine.update(&rows(&meta, 1000, 0.0));
        assert_eq!(state.visible_count, 10);
        assert_eq!(state.pool_size, 25);
        assert_eq!(state.overscan_leading, 8);
        assert_eq!(state.overscan_trailing, 7);
        assert_eq!((state.start_index, state.end_index), (0, 25));
    }

    #[test]
    fn scrolled_window_subtracts_leading_overscan() {
        let meta = VerticalMeta::default();
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let state = engine.update(&rows(&meta, 1000, 500.0));
        // floor(500 / 24) = 20, minus 8 leading rows.
        assert_eq!(state.offset, 500.0);
        assert_eq!(state.start_index, 12);
        assert_eq!(state.end_index, 37);
        assert!(state.start_index <= 975);
    }

    #[test]
    fn window_sticks_to_the_end() {
        let meta = VerticalMeta::default();
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let state = engine.update(&rows(&meta, 1000, 1.0e9));
        assert_eq!(state.end_index, 1000);
        assert_eq!(state.start_index, 975);
        // Without a native extent the plain content maximum is the limit.
        assert_eq!(state.offset, 23_760.0);
    }

    #[test]
    fn empty_dataset_yields_empty_window() {
        let meta = VerticalMeta::default();
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let state = engine.update(&rows(&meta, 0, 300.0));
        assert_eq!(state.visible_count, 0);
        assert_eq!((state.start_index, state.end_index, state.pool_size), (0, 0, 0));
        assert_eq!(state.offset, 0.0);
    }

    #[test]
    fn zoomed_out_view_realizes_more_rows() {
        let meta = VerticalMeta {
            native: None,
            zoom: 0.5,
        };
        let strategy = VerticalStrategy::default();
        let context = AxisContext::new(240.0, 0.0, 24.0, 1000, &meta);
        assert_eq!(strategy.visible_count(&context), 20);

        // A collapsed viewport still shows one row.
        let collapsed = AxisContext::new(0.0, 0.0, 24.0, 1000, &meta);
        assert_eq!(strategy.visible_count(&collapsed), 1);
    }

    #[test]
    fn native_extent_caps_the_extended_maximum() {
        let tight = VerticalMeta {
            native: Some(NativeExtent::new(24_000.0, 240.0)),
            zoom: 1.0,
        };
        let engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        assert_eq!(engine.clamp_scroll(1.0e9, &rows(&tight, 1000, 0.0)), 23_760.0);

        // A host that lets scrolling go further still cannot exceed the slack:
        // 24000 - 240 + 7 * 24 + 0 + 1.
        let loose = VerticalMeta {
            native: Some(NativeExtent::new(1.0e6, 240.0)),
            zoom: 1.0,
        };
        assert_eq!(engine.clamp_scroll(1.0e9, &rows(&loose, 1000, 0.0)), 23_929.0);

        // A host reporting less than the content maximum never under-clamps.
        let short = VerticalMeta {
            native: Some(NativeExtent::new(500.0, 240.0)),
            zoom: 1.0,
        };
        assert_eq!(engine.clamp_scroll(1.0e9, &rows(&short, 1000, 0.0)), 23_760.0);
    }

    #[test]
    fn clamp_is_identity_inside_the_range() {
        let meta = VerticalMeta::default();
        let engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let context = rows(&meta, 1000, 0.0);
        for value in [0.0, 1.0, 480.5, 12_000.0, 23_760.0] {
            assert_eq!(engine.clamp_scroll(value, &context), value);
        }
        assert_eq!(engine.clamp_scroll(-10.0, &context), 0.0);
        assert_eq!(engine.clamp_scroll(30_000.0, &context), 23_760.0);
        assert_eq!(engine.clamp_scroll(f64::NAN, &context), 0.0);
    }

    #[test]
    fn disabled_virtualization_clamps_to_the_scrollable_extent() {
        let meta = VerticalMeta {
            native: Some(NativeExtent::new(2400.0, 240.0)),
            zoom: 1.0,
        };
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let context = rows(&meta, 100, 5000.0).with_virtualization(false);
        let state = engine.update(&context);
        assert_eq!(state.offset, 2160.0);
        assert_eq!((state.start_index, state.end_index), (0, 100));

        let unmeasured = VerticalMeta::default();
        let state = engine.update(&rows(&unmeasured, 100, 5000.0).with_virtualization(false));
        assert_eq!(state.offset, 2160.0);
        let state = engine.update(&rows(&unmeasured, 100, 500.0).with_virtualization(false));
        assert_eq!(state.offset, 500.0);
    }

    #[test]
    fn repeated_updates_are_identical() {
        let meta = VerticalMeta::default();
        let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
        let first = engine.update(&rows(&meta, 1000, 777.0));
        let second = engine.update(&rows(&meta, 1000, 777.0));
        assert_eq!(first, second);
        assert_eq!(first.offset.to_bits(), second.offset.to_bits());
    }
}
