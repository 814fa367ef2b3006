// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of the windowing invariants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_virtual_grid::{
    Axis, AxisContext, AxisVirtualizer, ColumnDef, ColumnLayout, ColumnWidthMetrics,
    DEFAULT_COLUMN_WIDTH, HorizontalMeta, HorizontalStrategy, NativeExtent, VerticalMeta,
    VerticalStrategy, accumulate, find_first_visible, find_last_visible,
};

fn random_metrics(rng: &mut StdRng, len: usize) -> ColumnWidthMetrics {
    ColumnWidthMetrics::from_widths((0..len).map(|_| {
        // Zero-width columns are legal and exercise ties in the searches.
        if rng.random_range(0..10) == 0 {
            0.0
        } else {
            rng.random_range(1.0..400.0)
        }
    }))
}

#[test]
fn binary_searches_match_linear_scan() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for len in [0_usize, 1, 2, 7, 64, 513] {
        let metrics = random_metrics(&mut rng, len);
        let (widths, offsets) = (&metrics.widths, &metrics.offsets);
        for _ in 0..1_000 {
            let position = rng.random_range(-50.0..metrics.total_width + 50.0);

            let expected_first = (0..len)
                .find(|&i| offsets[i] + widths[i] >= position)
                .unwrap_or(len);
            assert_eq!(
                find_first_visible(position, widths, offsets),
                expected_first,
                "first visible at {position} over {len} columns"
            );

            let expected_last = (0..len).rev().find(|&i| offsets[i] <= position);
            assert_eq!(
                find_last_visible(position, widths, offsets),
                expected_last,
                "last visible at {position} over {len} columns"
            );
        }
    }
}

#[test]
fn accumulated_offsets_are_monotonic() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    for _ in 0..50 {
        let columns: Vec<ColumnDef> = (0..rng.random_range(0..80))
            .map(|i| {
                let column = ColumnDef::new(format!("c{i}"));
                match rng.random_range(0..4) {
                    0 => column,
                    1 => column.with_width(rng.random_range(-20.0..300.0)),
                    2 => column.with_min_width(rng.random_range(10.0..100.0)),
                    _ => column
                        .with_width(rng.random_range(0.0..600.0))
                        .with_max_width(rng.random_range(50.0..200.0)),
                }
            })
            .collect();
        let zoom = rng.random_range(0.5..2.0);
        let metrics = accumulate(&columns, zoom);

        assert_eq!(metrics.widths.len(), metrics.offsets.len());
        for pair in metrics.offsets.windows(2) {
            assert!(pair[0] <= pair[1], "offsets must not decrease: {pair:?}");
        }
        for i in 1..metrics.len() {
            assert!(
                metrics.offsets[i - 1] + metrics.widths[i - 1] <= metrics.offsets[i],
                "column {i} overlaps its predecessor"
            );
        }
        assert!(metrics.widths.iter().all(|w| *w >= 0.0 && w.is_finite()));
    }
}

#[test]
fn row_windows_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    let mut engine = AxisVirtualizer::new(Axis::Vertical, VerticalStrategy::default());
    for _ in 0..2_000 {
        let total = rng.random_range(0..5_000);
        let row_height = rng.random_range(1.0..80.0);
        let viewport = rng.random_range(0.0..2_000.0);
        let overscan = rng.random_range(0.0..40.0);
        let native = if rng.random_bool(0.5) {
            Some(NativeExtent::new(
                rng.random_range(0.0..400_000.0),
                viewport,
            ))
        } else {
            None
        };
        let meta = VerticalMeta {
            native,
            zoom: rng.random_range(0.5..2.0),
        };
        let offset = rng.random_range(-1_000.0..500_000.0);
        let enabled = rng.random_bool(0.8);
        let context = AxisContext::new(viewport, offset, row_height, total, &meta)
            .with_overscan(overscan)
            .with_virtualization(enabled);

        let state = engine.update(&context);
        assert!(state.start_index <= state.end_index, "{state:?}");
        assert!(state.end_index <= total, "{state:?}");
        assert_eq!(state.pool_size, state.end_index - state.start_index);
        assert!(state.offset.is_finite() && state.offset >= 0.0, "{state:?}");

        if enabled && total > 0 {
            let plan = engine.plan(&context);
            assert_eq!(state.pool_size, plan.pool_size.min(total), "{state:?}");
        } else {
            assert_eq!((state.start_index, state.end_index), (0, total));
        }

        assert_eq!(engine.update(&context), state, "updates must be idempotent");
    }
}

#[test]
fn column_windows_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);
    let mut engine = AxisVirtualizer::new(Axis::Horizontal, HorizontalStrategy::default());
    for _ in 0..500 {
        let columns: Vec<ColumnDef> = (0..rng.random_range(0..120))
            .map(|i| {
                // A few very wide columns skew the average against the tail.
                let width = if rng.random_range(0..12) == 0 {
                    rng.random_range(400.0..1_500.0)
                } else {
                    rng.random_range(5.0..300.0)
                };
                ColumnDef::new(format!("c{i}")).with_width(width)
            })
            .collect();
        let layout = ColumnLayout::build(&columns, 1.0, DEFAULT_COLUMN_WIDTH);
        let meta = HorizontalMeta::new(layout, rng.random_range(0.0..3_000.0));
        let total = meta.layout.scrollable_len();
        let average = meta
            .layout
            .metrics()
            .average_width()
            .unwrap_or(DEFAULT_COLUMN_WIDTH);
        let context = AxisContext::new(
            meta.container_width,
            rng.random_range(-100.0..40_000.0),
            average,
            total,
            &meta,
        );

        let state = engine.update(&context);
        assert!(state.start_index <= state.end_index, "{state:?}");
        assert!(state.end_index <= total, "{state:?}");
        let payload = state.payload;
        assert!(payload.left_padding >= 0.0 && payload.right_padding >= 0.0);
        assert!(
            payload.left_padding + payload.right_padding <= payload.total_scrollable_width + 1e-6,
            "{payload:?}"
        );

        // Gutters match the published range.
        let metrics = meta.layout.metrics();
        let left = metrics.offset_of(state.start_index);
        let right = (metrics.total_width - metrics.offset_of(state.end_index)).max(0.0);
        assert!((payload.left_padding - left).abs() < 1e-6, "{state:?}");
        assert!((payload.right_padding - right).abs() < 1e-6, "{state:?}");
        if total > 0 {
            let plan = engine.plan(&context);
            assert!(state.start_index <= plan.max_pool_start(), "{state:?}");
        }
    }
}
