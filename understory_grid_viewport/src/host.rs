// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between a [`GridViewport`](crate::GridViewport) and its host.

use kurbo::{Size, Vec2};
use understory_virtual_grid::{ColumnDef, NativeExtent, SourceRow};

use crate::viewport::ViewportState;

/// Measurements of the host's scrollable surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceMetrics {
    /// Visible client area (`clientWidth`/`clientHeight`).
    pub client: Size,
    /// Full scrollable content (`scrollWidth`/`scrollHeight`).
    pub content: Size,
    /// Current scroll offsets (`scrollLeft`/`scrollTop`).
    pub scroll: Vec2,
}

impl SurfaceMetrics {
    /// Creates metrics from client size, content size and scroll offsets.
    #[must_use]
    pub const fn new(client: Size, content: Size, scroll: Vec2) -> Self {
        Self {
            client,
            content,
            scroll,
        }
    }

    /// Native vertical scroll extent.
    #[must_use]
    pub fn vertical_extent(&self) -> NativeExtent {
        NativeExtent::new(self.content.height, self.client.height)
    }

    /// Native horizontal scroll extent.
    #[must_use]
    pub fn horizontal_extent(&self) -> NativeExtent {
        NativeExtent::new(self.content.width, self.client.width)
    }

    /// Returns `true` if every measurement is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.client.is_finite() && self.content.is_finite() && self.scroll.is_finite()
    }
}

/// The scroll surface, dataset and column provider a viewport drives.
pub trait ViewportHost {
    /// Row payload handed back in the row pool.
    type Row: Clone;

    /// Current measurements, or `None` while the surface is not mounted.
    fn surface(&self) -> Option<SurfaceMetrics>;

    /// Height of a sticky header that overlaps the scroll surface.
    fn header_height(&self) -> f64 {
        0.0
    }

    /// Writes `scroll_top` and returns the value the surface actually applied.
    fn set_scroll_top(&mut self, value: f64) -> f64;

    /// Writes `scroll_left` and returns the value the surface actually applied.
    fn set_scroll_left(&mut self, value: f64) -> f64;

    /// Rows in display order.
    fn rows(&self) -> &[SourceRow<Self::Row>];

    /// Columns in display order.
    fn columns(&self) -> &[ColumnDef];

    /// Returns `true` while the host is fetching more rows.
    fn is_loading(&self) -> bool {
        false
    }
}

/// Source of animation-frame callbacks.
///
/// After [`TickSource::request_frame`] the host should call
/// [`GridViewport::run_frame`](crate::GridViewport::run_frame) once on its
/// next frame boundary.
pub trait TickSource {
    /// Asks for one frame callback.
    fn request_frame(&mut self);

    /// Withdraws an outstanding request.
    fn cancel_frame(&mut self);
}

/// A [`TickSource`] that only records requests, for tests and headless hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualTicks {
    pending: bool,
    requests: usize,
    cancels: usize,
}

impl ManualTicks {
    /// Creates a source with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: false,
            requests: 0,
            cancels: 0,
        }
    }

    /// Returns `true` if a frame has been requested and not yet taken.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the pending request, returning whether there was one.
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    /// Total number of requests seen.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Total number of cancellations seen.
    #[must_use]
    pub fn cancels(&self) -> usize {
        self.cancels
    }
}

impl TickSource for ManualTicks {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
        self.cancels += 1;
    }
}

/// Receives viewport notifications. Every method defaults to a no-op.
pub trait ViewportObserver {
    /// Called after every completed update.
    fn on_update(&mut self, state: &ViewportState) {
        let _ = state;
    }

    /// Called when the scroll position approaches the end of the rows and the
    /// host is not loading.
    fn on_near_bottom(&mut self) {}

    /// Called once per frame that ran an update, after every high-priority task.
    fn on_settle(&mut self) {}
}
