// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-driven grid viewport.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use understory_virtual_grid::{
    Axis, AxisContext, AxisState, AxisVirtualizer, ColumnLayout, ColumnPin, HorizontalMeta,
    HorizontalPayload, HorizontalStrategy, RowPool, VerticalMeta, VerticalStrategy, VisibleRow,
    scroll_offset_into_view,
};

use crate::config::{Capabilities, ViewportConfig};
use crate::fps::FpsMonitor;
use crate::host::{TickSource, ViewportHost, ViewportObserver};
use crate::scheduler::{FrameScheduler, Priority, TaskId};
use crate::window::ColumnWindow;
use crate::zoom::Zoom;

/// Column width used for the horizontal estimate when nothing better exists.
const FALLBACK_COLUMN_WIDTH: f64 = 60.0;

/// Snapshot of the row window and scroll geometry after an update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    /// First display index in the row pool.
    pub start_index: usize,
    /// One past the last display index in the row pool.
    pub end_index: usize,
    /// Rows that fit in the viewport.
    pub visible_count: usize,
    /// Rows in the pool, overscan included.
    pub pool_size: usize,
    /// Rows in the dataset.
    pub total_row_count: usize,
    /// Applied vertical scroll offset.
    pub scroll_top: f64,
    /// Applied horizontal scroll offset.
    pub scroll_left: f64,
    /// Client height minus the header, never below one row.
    pub viewport_height: f64,
    /// Client width.
    pub viewport_width: f64,
    /// Effective row height at the current zoom.
    pub row_height: f64,
    /// `total_row_count * row_height`.
    pub total_content_height: f64,
    /// Whether rows were virtualized.
    pub virtualization_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewportTask {
    Update,
    Settle,
    SampleFps,
    Attach,
}

/// Axis inputs of the last update, kept for programmatic navigation.
#[derive(Debug, Clone, Copy, Default)]
struct AxisInputs {
    viewport: f64,
    item_size: f64,
    total: usize,
    overscan: f64,
    virtualization: bool,
}

impl AxisInputs {
    fn context<'a, M>(&self, offset: f64, meta: &'a M) -> AxisContext<'a, M> {
        AxisContext::new(self.viewport, offset, self.item_size, self.total, meta)
            .with_overscan(self.overscan)
            .with_virtualization(self.virtualization)
    }
}

/// Coordinates both axis virtualizers against a [`ViewportHost`].
///
/// Input notifications ([`handle_scroll`](Self::handle_scroll),
/// [`handle_resize`](Self::handle_resize), zoom changes) only schedule work;
/// the recomputation happens in [`run_frame`](Self::run_frame) or
/// [`flush`](Self::flush). Any number of requests before a frame coalesce into
/// one update.
///
/// Each update resolves rows before columns and rebuilds the row pool from the
/// final vertical window, so consumers never see a pool and a column window
/// from different passes.
pub struct GridViewport<R, K> {
    config: ViewportConfig,
    zoom: Zoom,
    scheduler: FrameScheduler<ViewportTask, K>,

    vertical: AxisVirtualizer<VerticalStrategy>,
    horizontal: AxisVirtualizer<HorizontalStrategy>,
    vertical_meta: VerticalMeta,
    horizontal_meta: HorizontalMeta,
    vertical_inputs: AxisInputs,
    horizontal_inputs: AxisInputs,

    pool: RowPool<R>,
    columns: ColumnWindow,
    state: ViewportState,

    pending_top: Option<f64>,
    pending_left: Option<f64>,
    attached: bool,

    update_task: Option<TaskId>,
    settle_task: Option<TaskId>,
    attach_task: Option<TaskId>,
    fps_task: Option<TaskId>,

    debug: bool,
    fps: FpsMonitor,
    last_frame_ms: f64,
    observers: Vec<Box<dyn ViewportObserver>>,
}

impl<R, K> fmt::Debug for GridViewport<R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridViewport")
            .field("config", &self.config)
            .field("zoom", &self.zoom)
            .field("state", &self.state)
            .field("columns", &self.columns)
            .field("attached", &self.attached)
            .field("debug", &self.debug)
            .field("fps", &self.fps.fps())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<R: Clone, K: TickSource> GridViewport<R, K> {
    /// Creates a detached viewport that requests frames from `ticks`.
    pub fn new(config: ViewportConfig, ticks: K) -> Self {
        let vertical = VerticalStrategy::new(config.scroll_edge_padding);
        let horizontal = HorizontalStrategy::new(config.column_buffer, config.scroll_edge_padding);
        Self {
            zoom: Zoom::default(),
            scheduler: FrameScheduler::new(ticks),
            vertical: AxisVirtualizer::new(Axis::Vertical, vertical),
            horizontal: AxisVirtualizer::new(Axis::Horizontal, horizontal),
            vertical_meta: VerticalMeta::default(),
            horizontal_meta: HorizontalMeta::default(),
            vertical_inputs: AxisInputs::default(),
            horizontal_inputs: AxisInputs::default(),
            pool: RowPool::default(),
            columns: ColumnWindow::default(),
            state: ViewportState {
                row_height: config.base_row_height,
                ..ViewportState::default()
            },
            pending_top: None,
            pending_left: None,
            attached: false,
            update_task: None,
            settle_task: None,
            attach_task: None,
            fps_task: None,
            debug: false,
            fps: FpsMonitor::new(),
            last_frame_ms: 0.0,
            observers: Vec::new(),
            config,
        }
    }

    /// Registers an observer for update, near-bottom and settle notifications.
    pub fn add_observer(&mut self, observer: impl ViewportObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Configuration the viewport was created with.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Snapshot of the last update.
    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Row pool of the last update, placeholders included.
    #[must_use]
    pub fn rows_pool(&self) -> &RowPool<R> {
        &self.pool
    }

    /// Occupied pool slots of the last update.
    pub fn visible_rows(&self) -> impl Iterator<Item = &VisibleRow<R>> {
        self.pool.rows()
    }

    /// Column window of the last update.
    #[must_use]
    pub fn columns(&self) -> &ColumnWindow {
        &self.columns
    }

    /// Resolved width of column `key` in the current layout.
    #[must_use]
    pub fn column_width(&self, key: &str) -> Option<f64> {
        self.horizontal_meta.layout.width_of(key)
    }

    /// Resolved widths of every column in the current layout.
    #[must_use]
    pub fn column_widths(&self) -> &HashMap<Arc<str>, f64> {
        self.horizontal_meta.layout.widths_by_key()
    }

    /// Last vertical axis state.
    #[must_use]
    pub fn vertical_state(&self) -> &AxisState<()> {
        self.vertical.state()
    }

    /// Last horizontal axis state.
    #[must_use]
    pub fn horizontal_state(&self) -> &AxisState<HorizontalPayload> {
        self.horizontal.state()
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom.value()
    }

    /// Published frame rate; `0` unless debug mode is on.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    /// Returns `true` between [`attach`](Self::attach) and [`detach`](Self::detach).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns `true` if an update is waiting for the next frame.
    #[must_use]
    pub fn is_update_scheduled(&self) -> bool {
        self.update_task.is_some()
    }

    /// Number of tasks waiting for the next frame.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// The tick source.
    pub fn ticks(&self) -> &K {
        self.scheduler.ticks()
    }

    /// Mutable access to the tick source.
    pub fn ticks_mut(&mut self) -> &mut K {
        self.scheduler.ticks_mut()
    }

    /// Connects to `host` and computes the first window synchronously.
    ///
    /// While the host has no measurable surface the attach is retried on
    /// every frame.
    pub fn attach<H: ViewportHost<Row = R>>(&mut self, host: &mut H) {
        if self.attached {
            return;
        }
        if host.surface().is_none() {
            if self.attach_task.is_none() {
                log::debug!("surface not mounted; retrying attach next frame");
                self.attach_task = Some(self.scheduler.schedule(ViewportTask::Attach, Priority::High));
            }
            return;
        }
        if let Some(id) = self.attach_task.take() {
            self.scheduler.cancel(id);
        }
        self.attached = true;
        log::debug!("viewport attached");
        if self.debug && self.fps_task.is_none() {
            self.start_fps();
        }
        self.schedule_update();
        self.flush(host);
    }

    /// Disconnects from the host, dropping every queued task.
    pub fn detach(&mut self) {
        let was_attached = core::mem::replace(&mut self.attached, false);
        self.scheduler.clear();
        self.update_task = None;
        self.settle_task = None;
        self.attach_task = None;
        self.fps_task = None;
        self.pending_top = None;
        self.pending_left = None;
        if was_attached {
            log::debug!("viewport detached");
        }
    }

    /// Records a scroll position reported by the host.
    ///
    /// Ignored while detached.
    pub fn handle_scroll(&mut self, scroll_left: f64, scroll_top: f64) {
        if !self.attached {
            log::trace!("scroll ignored while detached");
            return;
        }
        self.pending_left = Some(scroll_left);
        self.pending_top = Some(scroll_top);
        self.schedule_update();
    }

    /// Records that the host surface changed size.
    pub fn handle_resize(&mut self) {
        if self.attached {
            self.schedule_update();
        }
    }

    /// Requests an update on the next frame.
    ///
    /// Call after changing rows or columns.
    pub fn refresh(&mut self) {
        self.schedule_update();
    }

    /// Recomputes the window now, replacing any update queued for the next
    /// frame. Does nothing while detached.
    pub fn refresh_now<H: ViewportHost<Row = R>>(&mut self, host: &mut H) {
        if !self.attached {
            return;
        }
        if let Some(id) = self.update_task.take() {
            self.scheduler.cancel(id);
        }
        let (id, task) = self.scheduler.immediate(ViewportTask::Update);
        log::trace!("running update {id:?} inline");
        self.dispatch(task, host);
        if self.scheduler.is_empty() {
            self.scheduler.cancel_frame();
        }
    }

    fn schedule_update(&mut self) {
        if self.update_task.is_some() {
            log::debug!("update already scheduled; coalescing");
            return;
        }
        self.update_task = Some(self.scheduler.schedule(ViewportTask::Update, Priority::High));
    }

    /// Sets the zoom factor, clamped. A change schedules an update.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let changed = self.zoom.set(zoom);
        if changed {
            self.schedule_update();
        }
        changed
    }

    /// Changes the zoom factor by `delta`.
    pub fn adjust_zoom(&mut self, delta: f64) -> bool {
        let changed = self.zoom.adjust(delta);
        if changed {
            self.schedule_update();
        }
        changed
    }

    /// Applies one zoom wheel notch; see [`Zoom::wheel`].
    pub fn zoom_wheel(&mut self, delta_y: f64) -> bool {
        let changed = self.zoom.wheel(delta_y);
        if changed {
            self.schedule_update();
        }
        changed
    }

    /// Turns frame-rate sampling on or off.
    ///
    /// Turning it off cancels the sampling task and resets the reading.
    pub fn set_debug(&mut self, enabled: bool, now_ms: f64) {
        if self.debug == enabled {
            return;
        }
        self.debug = enabled;
        if enabled {
            self.last_frame_ms = now_ms;
            self.start_fps();
        } else {
            if let Some(id) = self.fps_task.take() {
                self.scheduler.cancel(id);
            }
            self.fps.reset();
        }
    }

    fn start_fps(&mut self) {
        self.fps.start(self.last_frame_ms);
        self.fps_task = Some(self.scheduler.schedule(ViewportTask::SampleFps, Priority::Low));
    }

    /// Runs the tasks due on a frame at `now_ms`.
    ///
    /// Call once per frame requested through the [`TickSource`].
    pub fn run_frame<H: ViewportHost<Row = R>>(&mut self, host: &mut H, now_ms: f64) {
        self.last_frame_ms = now_ms;
        self.scheduler.begin_frame();
        log::trace!("frame at {now_ms}ms, {} tasks", self.scheduler.len());
        self.run_queues(host);
    }

    /// Runs every queued task now, without waiting for a frame.
    pub fn flush<H: ViewportHost<Row = R>>(&mut self, host: &mut H) {
        self.scheduler.cancel_frame();
        self.run_queues(host);
    }

    fn run_queues<H: ViewportHost<Row = R>>(&mut self, host: &mut H) {
        for priority in Priority::ALL {
            for (_, task) in self.scheduler.drain(priority) {
                self.dispatch(task, host);
            }
        }
        // Lower queues scheduled from this pass already ran.
        if self.scheduler.is_empty() {
            self.scheduler.cancel_frame();
        }
    }

    fn dispatch<H: ViewportHost<Row = R>>(&mut self, task: ViewportTask, host: &mut H) {
        match task {
            ViewportTask::Update => {
                self.update_task = None;
                self.run_update(host);
            }
            ViewportTask::Settle => {
                self.settle_task = None;
                for observer in &mut self.observers {
                    observer.on_settle();
                }
            }
            ViewportTask::SampleFps => {
                self.fps_task = None;
                if self.debug {
                    self.fps.sample(self.last_frame_ms);
                    self.fps_task =
                        Some(self.scheduler.schedule(ViewportTask::SampleFps, Priority::Low));
                }
            }
            ViewportTask::Attach => {
                self.attach_task = None;
                self.attach(host);
            }
        }
    }

    /// Recomputes both axes against the host's current surface.
    fn run_update<H: ViewportHost<Row = R>>(&mut self, host: &mut H) {
        let Some(surface) = host.surface() else {
            log::debug!("update skipped; surface not mounted");
            return;
        };
        if !surface.is_finite() {
            log::warn!("host reported non-finite surface metrics {surface:?}");
        }
        let native = self
            .config
            .capabilities
            .contains(Capabilities::NATIVE_MEASUREMENT);

        let zoom = self.zoom.value();
        let layout_scale = self.config.layout_scale(zoom);
        let row_height = self.config.base_row_height * layout_scale;
        let rows_virtualized = self.config.rows_virtualized();
        let total_rows = host.rows().len();

        let viewport_height = (surface.client.height - host.header_height()).max(row_height);
        let viewport_width = surface.client.width;
        let requested_top = self.pending_top.take().unwrap_or(surface.scroll.y);
        let requested_left = self.pending_left.take().unwrap_or(surface.scroll.x);

        self.vertical_meta = VerticalMeta {
            native: native.then(|| surface.vertical_extent()),
            zoom,
        };
        self.vertical_inputs = AxisInputs {
            viewport: viewport_height,
            item_size: row_height,
            total: total_rows,
            overscan: if rows_virtualized {
                self.config.row_overscan
            } else {
                0.0
            },
            virtualization: rows_virtualized,
        };
        let rows = self
            .vertical
            .update(&self.vertical_inputs.context(requested_top, &self.vertical_meta));
        let scroll_top = write_back(
            Axis::Vertical,
            surface.scroll.y,
            rows.offset,
            self.config.scroll_epsilon,
            |value| host.set_scroll_top(value),
        );
        self.pool
            .rebuild(host.rows(), rows.start_index, rows.pool_size);

        self.horizontal_meta.layout = ColumnLayout::build(
            host.columns(),
            layout_scale,
            self.config.default_column_width,
        );
        self.horizontal_meta.native = native.then(|| surface.horizontal_extent());
        self.horizontal_meta.container_width = viewport_width;
        self.horizontal_inputs = AxisInputs {
            viewport: viewport_width,
            item_size: estimated_column_width(&self.horizontal_meta.layout),
            total: self.horizontal_meta.layout.scrollable_len(),
            overscan: 0.0,
            virtualization: self.config.column_virtualization,
        };
        let cols = self
            .horizontal
            .update(&self.horizontal_inputs.context(requested_left, &self.horizontal_meta));
        let scroll_left = write_back(
            Axis::Horizontal,
            surface.scroll.x,
            cols.offset,
            self.config.scroll_epsilon,
            |value| host.set_scroll_left(value),
        );
        self.columns = ColumnWindow::build(&self.horizontal_meta.layout, &cols);

        self.state = ViewportState {
            start_index: rows.start_index,
            end_index: rows.end_index,
            visible_count: rows.visible_count,
            pool_size: rows.pool_size,
            total_row_count: total_rows,
            scroll_top,
            scroll_left,
            viewport_height,
            viewport_width,
            row_height,
            total_content_height: total_rows as f64 * row_height,
            virtualization_enabled: rows_virtualized,
        };
        for observer in &mut self.observers {
            observer.on_update(&self.state);
        }

        if self.is_near_bottom() && !host.is_loading() {
            log::debug!(
                "near bottom at {scroll_top} of {}",
                self.state.total_content_height
            );
            for observer in &mut self.observers {
                observer.on_near_bottom();
            }
        }

        if let Some(id) = self.settle_task.take() {
            self.scheduler.cancel(id);
        }
        self.settle_task = Some(self.scheduler.schedule(ViewportTask::Settle, Priority::Normal));
    }

    fn is_near_bottom(&self) -> bool {
        let state = &self.state;
        if state.viewport_height <= 0.0 || state.total_row_count == 0 {
            return false;
        }
        let threshold = (state.total_content_height
            - self.config.near_bottom_factor * state.viewport_height)
            .max(0.0);
        state.scroll_top >= threshold
    }

    /// Scrolls so row `index` starts at the top, clamped to the valid range.
    ///
    /// Returns `false` while detached.
    pub fn scroll_to_row(&mut self, index: usize) -> bool {
        if !self.attached {
            return false;
        }
        let inputs = self.vertical_inputs;
        let index = index.min(inputs.total.saturating_sub(1));
        let target = index as f64 * inputs.item_size;
        let top = self
            .vertical
            .clamp_scroll(target, &inputs.context(target, &self.vertical_meta));
        log::debug!("scroll to row {index} at {top}");
        self.pending_top = Some(top);
        self.schedule_update();
        true
    }

    /// Scrolls the least distance that brings row `index` fully into view.
    ///
    /// Returns `true` if a scroll was scheduled.
    pub fn ensure_row_visible(&mut self, index: usize) -> bool {
        if !self.attached || index >= self.vertical_inputs.total {
            return false;
        }
        let state = self.state;
        let target = scroll_offset_into_view(
            index as f64 * state.row_height,
            state.row_height,
            state.viewport_height,
            state.scroll_top,
        );
        if target == state.scroll_top {
            return false;
        }
        let top = self.vertical.clamp_scroll(
            target,
            &self.vertical_inputs.context(target, &self.vertical_meta),
        );
        log::debug!("bring row {index} into view at {top}");
        self.pending_top = Some(top);
        self.schedule_update();
        true
    }

    /// Scrolls so column `key` starts at the left edge of the scrollable area.
    ///
    /// Pinned columns are always visible, so the request succeeds without
    /// scrolling. Returns `false` for unknown keys and while detached.
    pub fn scroll_to_column(&mut self, key: &str) -> bool {
        if !self.attached {
            return false;
        }
        let layout = &self.horizontal_meta.layout;
        let position = match layout.pin_of(key) {
            None => {
                log::warn!("scroll to unknown column {key:?}");
                return false;
            }
            Some(ColumnPin::Left | ColumnPin::Right) => return true,
            Some(ColumnPin::None) => match layout.scrollable_position(key) {
                Some(position) => position,
                None => return false,
            },
        };
        let context = self
            .horizontal_inputs
            .context(self.state.scroll_left, &self.horizontal_meta);
        let offset = self.horizontal.offset_for_index(position, &context);
        let left = self.horizontal.clamp_scroll(offset, &context);
        log::debug!("scroll to column {key:?} at {left}");
        self.pending_left = Some(left);
        self.schedule_update();
        true
    }

    /// Returns `true` if row `index` is in the last realized window.
    #[must_use]
    pub fn is_row_visible(&self, index: usize) -> bool {
        self.vertical.is_index_visible(index)
    }
}

/// Average scrollable width, else the first column width found, else a fixed
/// fallback; never below one pixel.
fn estimated_column_width(layout: &ColumnLayout) -> f64 {
    layout
        .metrics()
        .average_width()
        .or_else(|| layout.pinned_left().first().map(|metric| metric.width))
        .or_else(|| layout.pinned_right().first().map(|metric| metric.width))
        .unwrap_or(FALLBACK_COLUMN_WIDTH)
        .max(1.0)
}

/// Pushes `target` to the host when it differs from `current` by more than
/// `epsilon`; returns the offset now in effect.
fn write_back(
    axis: Axis,
    current: f64,
    target: f64,
    epsilon: f64,
    apply: impl FnOnce(f64) -> f64,
) -> f64 {
    if current.is_finite() && (current - target).abs() <= epsilon {
        return target;
    }
    let applied = apply(target);
    log::debug!("{axis:?} scroll written back: {current} -> {target} (applied {applied})");
    if applied.is_finite() { applied } else { target }
}
