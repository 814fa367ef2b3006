// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless walk through a virtualized grid.
//!
//! This example drives a `GridViewport` against an in-memory surface:
//! - a scripted scroll sequence, one gesture per frame,
//! - infinite loading through the near-bottom notification,
//! - zoom, and scroll-to-column on pinned and scrollable keys.
//!
//! Run:
//! - `cargo run -p understory_demos --example grid_scroll`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Size, Vec2};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use understory_grid_viewport::{
    GridViewport, ManualTicks, SurfaceMetrics, ViewportConfig, ViewportHost, ViewportObserver,
    ViewportState,
};
use understory_virtual_grid::{ColumnDef, ColumnFlags, ColumnPin, SourceRow};

const PAGE: usize = 500;

/// Rows are plain ids; a renderer would look the cells up by column key.
struct Surface {
    rows: Vec<SourceRow<u64>>,
    columns: Vec<ColumnDef>,
    client: Size,
    scroll: Vec2,
    zoom: f64,
}

impl Surface {
    fn content(&self) -> Size {
        let width: f64 = self.columns.iter().filter_map(|c| c.width).sum();
        Size::new(width * self.zoom, self.rows.len() as f64 * 24.0 * self.zoom)
    }

    fn load_page(&mut self) {
        let start = self.rows.len();
        self.rows
            .extend((start..start + PAGE).map(|i| SourceRow::new(i as u64 * 7919, i)));
    }
}

impl ViewportHost for Surface {
    type Row = u64;

    fn surface(&self) -> Option<SurfaceMetrics> {
        Some(SurfaceMetrics::new(self.client, self.content(), self.scroll))
    }

    fn header_height(&self) -> f64 {
        32.0
    }

    fn set_scroll_top(&mut self, value: f64) -> f64 {
        let max = (self.content().height - self.client.height).max(0.0);
        self.scroll.y = value.clamp(0.0, max);
        self.scroll.y
    }

    fn set_scroll_left(&mut self, value: f64) -> f64 {
        let max = (self.content().width - self.client.width).max(0.0);
        self.scroll.x = value.clamp(0.0, max);
        self.scroll.x
    }

    fn rows(&self) -> &[SourceRow<u64>] {
        &self.rows
    }

    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }
}

/// Flags a page load when the viewport nears the end of the rows.
struct Loader {
    wants_more: Rc<Cell<bool>>,
}

impl ViewportObserver for Loader {
    fn on_update(&mut self, state: &ViewportState) {
        log::trace!("rows {}..{}", state.start_index, state.end_index);
    }

    fn on_near_bottom(&mut self) {
        self.wants_more.set(true);
    }
}

fn print_window(label: &str, viewport: &GridViewport<u64, ManualTicks>) {
    let state = viewport.state();
    let columns = viewport.columns();
    let keys: Vec<&str> = columns.keys().collect();
    println!(
        "{label:>14}: top {:>8.1} left {:>7.1} | rows {:>5}..{:<5} of {:<5} | cols {:?} pad {:.0}/{:.0}",
        state.scroll_top,
        state.scroll_left,
        state.start_index,
        state.end_index,
        state.total_row_count,
        keys,
        columns.left_padding,
        columns.right_padding,
    );
}

fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let mut columns = vec![ColumnDef::new("#").with_width(48.0).with_flags(ColumnFlags::SYSTEM)];
    columns.extend(
        (0..40).map(|i| ColumnDef::new(format!("f{i}")).with_width(90.0 + f64::from(i % 4) * 30.0)),
    );
    columns.push(ColumnDef::new("total").with_width(96.0).pinned(ColumnPin::Right));

    let mut surface = Surface {
        rows: Vec::new(),
        columns,
        client: Size::new(1024.0, 600.0),
        scroll: Vec2::ZERO,
        zoom: 1.0,
    };
    surface.load_page();

    let wants_more = Rc::new(Cell::new(false));
    let mut viewport = GridViewport::new(ViewportConfig::default(), ManualTicks::new());
    viewport.add_observer(Loader {
        wants_more: Rc::clone(&wants_more),
    });
    viewport.attach(&mut surface);
    print_window("attached", &viewport);

    let mut now = 0.0;
    let mut frame = |viewport: &mut GridViewport<u64, ManualTicks>, surface: &mut Surface| {
        now += 16.0;
        if viewport.ticks_mut().take() {
            viewport.run_frame(surface, now);
        }
        if wants_more.replace(false) {
            surface.load_page();
            log::info!("loaded page, {} rows", surface.rows.len());
            viewport.refresh();
        }
    };

    for (left, top) in [(0.0, 2400.0), (640.0, 6000.0), (1800.0, 10_800.0), (5000.0, 99_999.0)] {
        surface.scroll = Vec2::new(left, top);
        viewport.handle_scroll(left, top);
        frame(&mut viewport, &mut surface);
        print_window("scroll", &viewport);
    }
    // The load requested above lands on the following frame.
    frame(&mut viewport, &mut surface);
    print_window("after load", &viewport);

    viewport.set_zoom(1.5);
    surface.zoom = viewport.zoom();
    frame(&mut viewport, &mut surface);
    print_window("zoom 1.5", &viewport);

    for key in ["f25", "#", "missing"] {
        let accepted = viewport.scroll_to_column(key);
        frame(&mut viewport, &mut surface);
        print_window(&format!("col {key} {accepted}"), &viewport);
    }

    viewport.scroll_to_row(0);
    frame(&mut viewport, &mut surface);
    print_window("row 0", &viewport);
    viewport.detach();
}
