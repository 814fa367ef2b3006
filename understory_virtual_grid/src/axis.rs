// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic per-axis virtualization engine.

use core::fmt::Debug;
use core::ops::Range;

use crate::geometry::{clamp, to_count, to_f64};

/// Extra pixel of scroll range past the computed maximum on virtualized axes.
pub const SCROLL_EDGE_PADDING: f64 = 1.0;

/// Scrollable extent reported by the host's own scroll surface along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NativeExtent {
    /// Full content size (`scrollHeight`/`scrollWidth`).
    pub content: f64,
    /// Visible client size (`clientHeight`/`clientWidth`).
    pub client: f64,
}

impl NativeExtent {
    /// Creates an extent from content and client sizes.
    #[must_use]
    pub const fn new(content: f64, client: f64) -> Self {
        Self { content, client }
    }

    /// Largest scroll offset the host allows, never negative.
    ///
    /// Non-finite measurements yield `0`.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        let max = self.content - self.client;
        if max.is_finite() { max.max(0.0) } else { 0.0 }
    }
}

/// One of the two independent scroll dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rows, scrolled by `scroll_top`.
    Vertical,
    /// Columns, scrolled by `scroll_left`.
    Horizontal,
}

/// Inputs for a single [`AxisVirtualizer::update`] call.
///
/// Rebuilt by the caller on every update; `meta` carries the axis-specific
/// data a strategy needs (native scroll extents, zoom, column layout).
#[derive(Debug)]
pub struct AxisContext<'a, M> {
    /// Size of the viewport along this axis.
    pub viewport_size: f64,
    /// Requested scroll offset along this axis.
    pub scroll_offset: f64,
    /// Whether the caller wants this axis virtualized.
    pub virtualization_enabled: bool,
    /// Size of one item, or an estimate for variable-size axes.
    pub estimated_item_size: f64,
    /// Number of items along this axis.
    pub total_count: usize,
    /// Requested number of extra items to keep realized.
    pub overscan: f64,
    /// Strategy-specific metadata.
    pub meta: &'a M,
}

impl<M> Clone for AxisContext<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for AxisContext<'_, M> {}

impl<'a, M> AxisContext<'a, M> {
    /// Creates a context with virtualization on and no overscan.
    #[must_use]
    pub fn new(
        viewport_size: f64,
        scroll_offset: f64,
        estimated_item_size: f64,
        total_count: usize,
        meta: &'a M,
    ) -> Self {
        Self {
            viewport_size,
            scroll_offset,
            virtualization_enabled: true,
            estimated_item_size,
            total_count,
            overscan: 0.0,
            meta,
        }
    }

    /// Sets the requested overscan.
    #[must_use]
    pub fn with_overscan(mut self, overscan: f64) -> Self {
        self.overscan = overscan;
        self
    }

    /// Enables or disables virtualization.
    #[must_use]
    pub fn with_virtualization(mut self, enabled: bool) -> Self {
        self.virtualization_enabled = enabled;
        self
    }

    /// Replaces non-finite and negative inputs with safe values.
    ///
    /// Scroll and viewport degrade to `0`, item size to `1`, overscan to `0`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite_or = |value: f64, fallback: f64| {
            if value.is_finite() { value } else { fallback }
        };
        Self {
            viewport_size: finite_or(self.viewport_size, 0.0).max(0.0),
            scroll_offset: finite_or(self.scroll_offset, 0.0),
            estimated_item_size: if self.estimated_item_size.is_finite()
                && self.estimated_item_size > 0.0
            {
                self.estimated_item_size
            } else {
                1.0
            },
            overscan: finite_or(self.overscan, 0.0),
            ..self
        }
    }
}

/// An [`AxisContext`] extended with the pool sizing derived by the engine.
///
/// Built once per update and handed to the strategy's clamp and range steps.
#[derive(Debug)]
pub struct AxisPlan<'a, M> {
    /// The (sanitized) caller context.
    pub context: AxisContext<'a, M>,
    /// Effective virtualization: requested and at least one item.
    pub virtualization_enabled: bool,
    /// Items needed to fill the viewport.
    pub visible_count: usize,
    /// Items realized in total, including overscan.
    pub pool_size: usize,
    /// Overscan items placed before the visible window.
    pub overscan_leading: usize,
    /// Overscan items placed after the visible window.
    pub overscan_trailing: usize,
}

impl<M> Clone for AxisPlan<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for AxisPlan<'_, M> {}

impl<'a, M> AxisPlan<'a, M> {
    /// Metadata of the underlying context.
    #[must_use]
    pub fn meta(&self) -> &'a M {
        self.context.meta
    }

    /// Number of items along this axis.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.context.total_count
    }

    /// Largest valid pool start: `total_count - pool_size`, floored at `0`.
    #[must_use]
    pub fn max_pool_start(&self) -> usize {
        self.context.total_count.saturating_sub(self.pool_size)
    }
}

/// A half-open index range produced by a strategy, plus strategy data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange<P> {
    /// First index (inclusive).
    pub start: usize,
    /// One past the last index.
    pub end: usize,
    /// Strategy-specific payload (for example column paddings).
    pub payload: P,
}

/// Snapshot of one axis after an update.
///
/// Invariants: `start_index <= end_index <= total_count` and
/// `end_index - start_index == pool_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState<P> {
    /// Axis this state belongs to.
    pub axis: Axis,
    /// Clamped scroll offset.
    pub offset: f64,
    /// Viewport size used for the update.
    pub viewport_size: f64,
    /// Number of items along the axis.
    pub total_count: usize,
    /// First realized index (inclusive).
    pub start_index: usize,
    /// One past the last realized index.
    pub end_index: usize,
    /// Items needed to fill the viewport.
    pub visible_count: usize,
    /// Realized items.
    pub pool_size: usize,
    /// Overscan items before the visible window.
    pub overscan_leading: usize,
    /// Overscan items after the visible window.
    pub overscan_trailing: usize,
    /// Strategy-specific payload.
    pub payload: P,
}

impl<P: Default> AxisState<P> {
    /// The state before any update: nothing realized.
    #[must_use]
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            offset: 0.0,
            viewport_size: 0.0,
            total_count: 0,
            start_index: 0,
            end_index: 0,
            visible_count: 0,
            pool_size: 0,
            overscan_leading: 0,
            overscan_trailing: 0,
            payload: P::default(),
        }
    }
}

impl<P> AxisState<P> {
    /// Realized indices.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Returns `true` if nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Returns `true` if `index` is inside the realized window.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index < self.end_index
    }
}

/// Windowing policy for one axis.
///
/// Implementations are closed, internal policies (uniform rows, pinned
/// variable-width columns). They receive sanitized inputs and must return a
/// range with `start <= end`; the engine normalizes it against `total_count`.
pub trait AxisStrategy {
    /// Per-update metadata this strategy consumes.
    type Meta;
    /// Extra data carried alongside the computed range.
    type Payload: Copy + Default + PartialEq + Debug;

    /// Number of items needed to fill the viewport.
    fn visible_count(&self, context: &AxisContext<'_, Self::Meta>) -> usize;

    /// Clamps a raw scroll offset into the range this axis may scroll.
    fn clamp_scroll(&self, value: f64, plan: &AxisPlan<'_, Self::Meta>) -> f64;

    /// Computes the realized range for a clamped offset.
    fn compute_range(
        &self,
        offset: f64,
        plan: &AxisPlan<'_, Self::Meta>,
    ) -> AxisRange<Self::Payload>;

    /// Pixel offset of the start of `index`.
    ///
    /// The default assumes uniform items of `estimated_item_size`.
    fn offset_for_index(&self, index: usize, plan: &AxisPlan<'_, Self::Meta>) -> f64 {
        let context = &plan.context;
        let index = index.min(context.total_count.saturating_sub(1));
        to_f64(index) * context.estimated_item_size
    }
}

/// Generic engine driving an [`AxisStrategy`].
///
/// Each [`AxisVirtualizer::update`] derives pool sizing, clamps the scroll
/// offset, computes and normalizes the realized range, then replaces the
/// stored [`AxisState`] wholesale.
#[derive(Debug, Clone)]
pub struct AxisVirtualizer<S: AxisStrategy> {
    axis: Axis,
    strategy: S,
    state: AxisState<S::Payload>,
}

impl<S: AxisStrategy> AxisVirtualizer<S> {
    /// Creates an engine for `axis` with an empty initial state.
    #[must_use]
    pub fn new(axis: Axis, strategy: S) -> Self {
        Self {
            axis,
            strategy,
            state: AxisState::empty(axis),
        }
    }

    /// Axis this engine drives.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Shared access to the strategy.
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The most recent state.
    #[must_use]
    pub fn state(&self) -> &AxisState<S::Payload> {
        &self.state
    }

    /// Derives pool sizing for `context` without touching the stored state.
    #[must_use]
    pub fn plan<'a>(&self, context: &AxisContext<'a, S::Meta>) -> AxisPlan<'a, S::Meta> {
        let context = context.sanitized();
        let total = context.total_count;
        let enabled = context.virtualization_enabled && total > 0;
        if !enabled {
            return AxisPlan {
                context,
                virtualization_enabled: false,
                visible_count: total,
                pool_size: total,
                overscan_leading: 0,
                overscan_trailing: 0,
            };
        }

        let visible_count = self.strategy.visible_count(&context).max(1);
        let overscan = to_count(libm::round(context.overscan));
        let pool_size = total.min(visible_count.saturating_add(overscan).max(visible_count));

        let available = pool_size.saturating_sub(visible_count);
        let overscan_leading = available.div_ceil(2);
        let overscan_trailing = available - overscan_leading;

        AxisPlan {
            context,
            virtualization_enabled: true,
            visible_count,
            pool_size,
            overscan_leading,
            overscan_trailing,
        }
    }

    /// Recomputes the state for `context` and returns it.
    pub fn update(&mut self, context: &AxisContext<'_, S::Meta>) -> AxisState<S::Payload> {
        let plan = self.plan(context);
        let total = plan.context.total_count;

        let offset = self.strategy.clamp_scroll(plan.context.scroll_offset, &plan);
        let offset = if offset.is_finite() { offset } else { 0.0 };

        let range = self.strategy.compute_range(offset, &plan);
        debug_assert!(
            range.start <= range.end,
            "{:?} strategy returned an inverted range {}..{}",
            self.axis,
            range.start,
            range.end
        );

        let start = range.start.min(plan.max_pool_start());
        let end = total.min(range.end.max(start));

        let state = AxisState {
            axis: self.axis,
            offset,
            viewport_size: plan.context.viewport_size,
            total_count: total,
            start_index: start,
            end_index: end,
            visible_count: plan.visible_count,
            pool_size: end - start,
            overscan_leading: plan.overscan_leading,
            overscan_trailing: plan.overscan_trailing,
            payload: range.payload,
        };
        log::trace!(
            "{:?} window {}..{} of {} (offset {offset}, visible {}, pool {})",
            self.axis,
            start,
            end,
            total,
            state.visible_count,
            state.pool_size
        );
        self.state = state;
        state
    }

    /// Pixel offset of `index` under `context`, clamped to the valid index range.
    #[must_use]
    pub fn offset_for_index(&self, index: usize, context: &AxisContext<'_, S::Meta>) -> f64 {
        let plan = self.plan(context);
        self.strategy.offset_for_index(index, &plan)
    }

    /// Clamps `value` the way the next update with `context` would.
    #[must_use]
    pub fn clamp_scroll(&self, value: f64, context: &AxisContext<'_, S::Meta>) -> f64 {
        let plan = self.plan(context);
        let value = if value.is_finite() { value } else { 0.0 };
        let clamped = self.strategy.clamp_scroll(value, &plan);
        if clamped.is_finite() { clamped } else { 0.0 }
    }

    /// Returns `true` if `index` is realized in the most recent state.
    #[must_use]
    pub fn is_index_visible(&self, index: usize) -> bool {
        self.state.contains(index)
    }
}

/// Clamps `value` into `[0, max_scroll]`, collapsing broken maxima to `0`.
pub(crate) fn clamp_to_max(value: f64, max_scroll: f64) -> f64 {
    if !max_scroll.is_finite() || max_scroll <= 0.0 {
        return 0.0;
    }
    clamp(value, 0.0, max_scroll)
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisContext, AxisPlan, AxisRange, AxisStrategy, AxisVirtualizer};

    /// Realizes exactly the pool starting at `offset` items, overshooting on purpose.
    #[derive(Debug)]
    struct Overshoot;

    impl AxisStrategy for Overshoot {
        type Meta = ();
        type Payload = ();

        fn visible_count(&self, context: &AxisContext<'_, ()>) -> usize {
            super::to_count(libm::ceil(context.viewport_size / context.estimated_item_size))
        }

        fn clamp_scroll(&self, value: f64, _plan: &AxisPlan<'_, ()>) -> f64 {
            value.max(0.0)
        }

        fn compute_range(&self, offset: f64, plan: &AxisPlan<'_, ()>) -> AxisRange<()> {
            let start = super::to_count(offset / plan.context.estimated_item_size);
            AxisRange {
                start,
                end: start + plan.pool_size + 10,
                payload: (),
            }
        }
    }

    #[test]
    fn overscan_splits_with_leading_bias() {
        let engine = AxisVirtualizer::new(Axis::Vertical, Overshoot);
        let plan = engine.plan(&AxisContext::new(100.0, 0.0, 10.0, 1000, &()).with_overscan(5.0));
        assert_eq!(plan.visible_count, 10);
        assert_eq!(plan.pool_size, 15);
        assert_eq!(plan.overscan_leading, 3);
        assert_eq!(plan.overscan_trailing, 2);
    }

    #[test]
    fn normalization_keeps_pool_inside_bounds() {
        let mut engine = AxisVirtualizer::new(Axis::Vertical, Overshoot);
        let state = engine.update(&AxisContext::new(100.0, 5000.0, 10.0, 100, &()));
        // Strategy asked for 500.. but the pool must end at the last item.
        assert_eq!(state.start_index, 90);
        assert_eq!(state.end_index, 100);
        assert_eq!(state.pool_size, 10);
    }

    #[test]
    fn non_finite_inputs_degrade_to_zero() {
        let mut engine = AxisVirtualizer::new(Axis::Vertical, Overshoot);
        let state = engine.update(&AxisContext::new(f64::NAN, f64::INFINITY, f64::NAN, 50, &()));
        assert_eq!(state.offset, 0.0);
        assert_eq!(state.viewport_size, 0.0);
        assert_eq!(state.start_index, 0);
        assert!(state.end_index <= 50);
    }

    #[test]
    fn disabled_virtualization_realizes_everything() {
        let mut engine = AxisVirtualizer::new(Axis::Horizontal, Overshoot);
        let context = AxisContext::new(100.0, 300.0, 10.0, 40, &()).with_virtualization(false);
        let state = engine.update(&context);
        assert_eq!((state.start_index, state.end_index), (0, 40));
        assert_eq!(state.visible_count, 40);
        assert_eq!(state.overscan_leading + state.overscan_trailing, 0);
        assert!(engine.is_index_visible(39));
        assert!(!engine.is_index_visible(40));
    }

    #[test]
    fn default_offset_uses_estimated_size() {
        let engine = AxisVirtualizer::new(Axis::Vertical, Overshoot);
        let context = AxisContext::new(100.0, 0.0, 12.0, 10, &());
        assert_eq!(engine.offset_for_index(3, &context), 36.0);
        assert_eq!(engine.offset_for_index(99, &context), 108.0);
    }
}
