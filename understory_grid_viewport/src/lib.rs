// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Grid Viewport: frame-driven orchestration for virtualized grids.
//!
//! [`GridViewport`] owns one vertical and one horizontal
//! [`AxisVirtualizer`](understory_virtual_grid::AxisVirtualizer) and keeps them
//! in step with a host scroll surface:
//!
//! - The host reports scroll and resize through [`GridViewport::handle_scroll`]
//!   and [`GridViewport::handle_resize`]. These only schedule work.
//! - On the next frame, requested through a [`TickSource`], the host calls
//!   [`GridViewport::run_frame`]. Pending requests coalesce into one update.
//! - An update measures the surface, windows rows then columns, writes clamped
//!   offsets back when they moved by more than
//!   [`ViewportConfig::scroll_epsilon`], rebuilds the row pool and the
//!   [`ColumnWindow`], and notifies [`ViewportObserver`]s.
//!
//! Tasks run from a three-level [`FrameScheduler`]: updates at
//! [`Priority::High`], settle notifications at [`Priority::Normal`] and
//! frame-rate sampling at [`Priority::Low`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Size, Vec2};
//! use understory_grid_viewport::{
//!     GridViewport, ManualTicks, SurfaceMetrics, ViewportConfig, ViewportHost,
//! };
//! use understory_virtual_grid::{ColumnDef, SourceRow};
//!
//! struct Host {
//!     rows: Vec<SourceRow<u32>>,
//!     columns: Vec<ColumnDef>,
//!     scroll: Vec2,
//! }
//!
//! impl ViewportHost for Host {
//!     type Row = u32;
//!     fn surface(&self) -> Option<SurfaceMetrics> {
//!         let content = Size::new(20.0 * 120.0, self.rows.len() as f64 * 24.0);
//!         Some(SurfaceMetrics::new(Size::new(800.0, 240.0), content, self.scroll))
//!     }
//!     fn set_scroll_top(&mut self, value: f64) -> f64 {
//!         self.scroll.y = value;
//!         value
//!     }
//!     fn set_scroll_left(&mut self, value: f64) -> f64 {
//!         self.scroll.x = value;
//!         value
//!     }
//!     fn rows(&self) -> &[SourceRow<u32>] {
//!         &self.rows
//!     }
//!     fn columns(&self) -> &[ColumnDef] {
//!         &self.columns
//!     }
//! }
//!
//! let mut host = Host {
//!     rows: (0..1000).map(|i| SourceRow::new(i, i as usize)).collect(),
//!     columns: (0..20).map(|i| ColumnDef::new(format!("c{i}")).with_width(120.0)).collect(),
//!     scroll: Vec2::ZERO,
//! };
//! let mut viewport = GridViewport::new(ViewportConfig::default(), ManualTicks::new());
//!
//! // Attaching computes the first window synchronously.
//! viewport.attach(&mut host);
//! assert_eq!(viewport.state().visible_count, 10);
//! assert_eq!(viewport.rows_pool().len(), 25);
//!
//! // Scrolling waits for the next frame.
//! viewport.handle_scroll(0.0, 500.0);
//! assert!(viewport.ticks_mut().take());
//! viewport.run_frame(&mut host, 16.0);
//! assert_eq!(viewport.state().start_index, 12);
//! assert!(viewport.is_row_visible(20));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod fps;
mod host;
mod scheduler;
mod viewport;
mod window;
mod zoom;

pub use config::{
    BASE_ROW_HEIGHT, Capabilities, ROW_OVERSCAN, RowHeightMode, SCROLL_EPSILON, ViewportConfig,
};
pub use fps::{FPS_CAP, FPS_PUBLISH_INTERVAL_MS, FPS_WINDOW, FpsMonitor};
pub use host::{ManualTicks, SurfaceMetrics, TickSource, ViewportHost, ViewportObserver};
pub use scheduler::{FrameScheduler, Priority, TaskBatch, TaskId};
pub use viewport::{GridViewport, ViewportState};
pub use window::ColumnWindow;
pub use zoom::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP, Zoom};
