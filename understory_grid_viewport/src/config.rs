// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport configuration and host capabilities.

use understory_virtual_grid::{
    COLUMN_VIRTUALIZATION_BUFFER, DEFAULT_COLUMN_WIDTH, SCROLL_EDGE_PADDING,
};

/// Unzoomed row height in logical pixels.
pub const BASE_ROW_HEIGHT: f64 = 24.0;

/// Rows kept in the pool beyond the visible ones by default.
///
/// Five rows of pool overscan plus a ten-row virtualization buffer.
pub const ROW_OVERSCAN: f64 = 15.0;

/// Scroll deltas at or below this are not written back to the host.
pub const SCROLL_EPSILON: f64 = 0.5;

bitflags::bitflags! {
    /// What the host surface can do natively.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// The host scales layout itself when zoomed, so row heights and
        /// column widths are multiplied by the zoom factor.
        const NATIVE_ZOOM = 1 << 0;
        /// The host reports native scroll extents, used as clamp fallback.
        const NATIVE_MEASUREMENT = 1 << 1;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// How row heights are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowHeightMode {
    /// Every row is [`ViewportConfig::base_row_height`] tall; rows are virtualized.
    #[default]
    Fixed,
    /// Rows size themselves; every row is realized.
    Auto,
}

/// Tunables of a [`GridViewport`](crate::GridViewport).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewportConfig {
    /// Unzoomed row height.
    pub base_row_height: f64,
    /// Extra rows realized around the visible window.
    pub row_overscan: f64,
    /// Extra columns realized on each side of the visible span.
    pub column_buffer: usize,
    /// Width for columns without sizing hints.
    pub default_column_width: f64,
    /// Smallest scroll delta written back to the host.
    pub scroll_epsilon: f64,
    /// Slack past the last row or column.
    pub scroll_edge_padding: f64,
    /// Master switch for row virtualization.
    pub virtualization: bool,
    /// Row sizing mode; [`RowHeightMode::Auto`] disables row virtualization.
    pub row_height_mode: RowHeightMode,
    /// Switch for column virtualization.
    pub column_virtualization: bool,
    /// Near-bottom threshold, in viewport heights above the content end.
    pub near_bottom_factor: f64,
    /// Host capabilities.
    pub capabilities: Capabilities,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            base_row_height: BASE_ROW_HEIGHT,
            row_overscan: ROW_OVERSCAN,
            column_buffer: COLUMN_VIRTUALIZATION_BUFFER,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            scroll_epsilon: SCROLL_EPSILON,
            scroll_edge_padding: SCROLL_EDGE_PADDING,
            virtualization: true,
            row_height_mode: RowHeightMode::Fixed,
            column_virtualization: true,
            near_bottom_factor: 2.0,
            capabilities: Capabilities::default(),
        }
    }
}

impl ViewportConfig {
    /// Sets the unzoomed row height.
    #[must_use]
    pub fn with_base_row_height(mut self, height: f64) -> Self {
        self.base_row_height = height;
        self
    }

    /// Sets the row overscan.
    #[must_use]
    pub fn with_row_overscan(mut self, overscan: f64) -> Self {
        self.row_overscan = overscan;
        self
    }

    /// Sets the column buffer.
    #[must_use]
    pub fn with_column_buffer(mut self, buffer: usize) -> Self {
        self.column_buffer = buffer;
        self
    }

    /// Sets the default column width.
    #[must_use]
    pub fn with_default_column_width(mut self, width: f64) -> Self {
        self.default_column_width = width;
        self
    }

    /// Enables or disables row virtualization.
    #[must_use]
    pub fn with_virtualization(mut self, enabled: bool) -> Self {
        self.virtualization = enabled;
        self
    }

    /// Sets the row height mode.
    #[must_use]
    pub fn with_row_height_mode(mut self, mode: RowHeightMode) -> Self {
        self.row_height_mode = mode;
        self
    }

    /// Enables or disables column virtualization.
    #[must_use]
    pub fn with_column_virtualization(mut self, enabled: bool) -> Self {
        self.column_virtualization = enabled;
        self
    }

    /// Sets the near-bottom threshold factor.
    #[must_use]
    pub fn with_near_bottom_factor(mut self, factor: f64) -> Self {
        self.near_bottom_factor = factor;
        self
    }

    /// Sets the host capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Returns `true` if rows are virtualized under this configuration.
    #[must_use]
    pub fn rows_virtualized(&self) -> bool {
        self.virtualization && self.row_height_mode == RowHeightMode::Fixed
    }

    /// Factor applied to row heights and column widths at `zoom`.
    ///
    /// Hosts without native zoom scale the rendered surface themselves, so
    /// layout stays at `1.0`.
    #[must_use]
    pub fn layout_scale(&self, zoom: f64) -> f64 {
        if self.capabilities.contains(Capabilities::NATIVE_ZOOM) {
            zoom
        } else {
            1.0
        }
    }
}
