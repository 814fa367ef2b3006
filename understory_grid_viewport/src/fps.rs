// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate sampling for debug overlays.

use alloc::collections::VecDeque;

/// Instantaneous samples kept for the moving average.
pub const FPS_WINDOW: usize = 60;
/// Minimum time between published readings, in milliseconds.
pub const FPS_PUBLISH_INTERVAL_MS: f64 = 250.0;
/// Upper bound of a published reading.
pub const FPS_CAP: f64 = 240.0;

/// Moving-average frame-rate meter fed with frame timestamps.
#[derive(Debug, Clone, Default)]
pub struct FpsMonitor {
    samples: VecDeque<f64>,
    last_frame_ms: f64,
    last_publish_ms: f64,
    fps: f64,
}

impl FpsMonitor {
    /// Creates an idle monitor reading `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh measurement at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.samples.clear();
        self.last_frame_ms = now_ms;
        self.last_publish_ms = now_ms;
    }

    /// Records a frame at `now_ms` and returns the published reading.
    pub fn sample(&mut self, now_ms: f64) -> f64 {
        let delta = now_ms - self.last_frame_ms;
        self.last_frame_ms = now_ms;
        if delta > 0.0 && delta.is_finite() {
            self.samples.push_back(1000.0 / delta);
            if self.samples.len() > FPS_WINDOW {
                self.samples.pop_front();
            }
        }
        if now_ms - self.last_publish_ms >= FPS_PUBLISH_INTERVAL_MS && !self.samples.is_empty() {
            self.last_publish_ms = now_ms;
            let sum: f64 = self.samples.iter().sum();
            let count = self.samples.len() as f64;
            self.fps = (sum / count).min(FPS_CAP);
        }
        self.fps
    }

    /// Last published reading.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Drops all samples and resets the reading to `0`.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.fps = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::{FPS_CAP, FpsMonitor};

    #[test]
    fn publishes_at_most_every_interval() {
        let mut monitor = FpsMonitor::new();
        monitor.start(0.0);
        let mut now = 0.0;
        for _ in 0..14 {
            now += 16.0;
            assert_eq!(monitor.sample(now), 0.0);
        }
        // 15 * 16 = 240ms; the next frame crosses 250ms.
        now += 16.0;
        monitor.sample(now);
        now += 16.0;
        let reading = monitor.sample(now);
        assert!((reading - 62.5).abs() < 1e-9, "got {reading}");
    }

    #[test]
    fn readings_are_capped_and_reset() {
        let mut monitor = FpsMonitor::new();
        monitor.start(0.0);
        let mut now = 0.0;
        for _ in 0..600 {
            now += 1.0;
            monitor.sample(now);
        }
        assert_eq!(monitor.fps(), FPS_CAP);
        monitor.reset();
        assert_eq!(monitor.fps(), 0.0);
    }
}
