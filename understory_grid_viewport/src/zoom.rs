// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom level bookkeeping.

use understory_virtual_grid::clamp;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// A zoom factor kept within [`MIN_ZOOM`]..=[`MAX_ZOOM`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    value: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl Zoom {
    /// Creates a zoom at `value`, clamped.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: Self::clamp_value(value),
        }
    }

    /// Clamps `value` into the allowed range; non-finite values become `1.0`.
    #[must_use]
    pub fn clamp_value(value: f64) -> f64 {
        let value = if value.is_finite() { value } else { 1.0 };
        clamp(value, MIN_ZOOM, MAX_ZOOM)
    }

    /// Current factor.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Sets the factor and returns `true` if it changed.
    pub fn set(&mut self, value: f64) -> bool {
        let next = Self::clamp_value(value);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Changes the factor by `delta`.
    pub fn adjust(&mut self, delta: f64) -> bool {
        self.set(self.value + delta)
    }

    /// Moves one [`ZOOM_STEP`] in or out.
    pub fn step(&mut self, zoom_in: bool) -> bool {
        self.adjust(if zoom_in { ZOOM_STEP } else { -ZOOM_STEP })
    }

    /// Applies one wheel notch; a negative `delta_y` (wheel up) zooms in.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.step(delta_y < 0.0)
    }
}
