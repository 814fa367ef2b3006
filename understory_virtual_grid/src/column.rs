// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column descriptors and pin resolution.

use alloc::sync::Arc;

bitflags::bitflags! {
    /// Extra positioning hints a host may attach to a column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u8 {
        /// System column (row number, selection checkbox); always pinned left.
        const SYSTEM = 1 << 0;
        /// Sticky on the left edge.
        const STICKY_LEFT = 1 << 1;
        /// Sticky on the right edge.
        const STICKY_RIGHT = 1 << 2;
        /// Locked in place; treated as pinned left.
        const LOCKED = 1 << 3;
    }
}

/// Where a column is rendered relative to horizontal scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnPin {
    /// Fixed at the left edge.
    Left,
    /// Fixed at the right edge.
    Right,
    /// Scrolls with the content.
    #[default]
    None,
}

/// A host-supplied column descriptor.
///
/// Only sizing and pinning matter to the engine; everything else about a
/// column (label, editor, formatting) stays with the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Stable key used for width lookups and programmatic navigation.
    pub key: Arc<str>,
    /// Preferred width in unzoomed pixels.
    pub width: Option<f64>,
    /// Lower width bound in unzoomed pixels.
    pub min_width: Option<f64>,
    /// Upper width bound in unzoomed pixels.
    pub max_width: Option<f64>,
    /// Explicit pin request.
    pub pin: ColumnPin,
    /// Additional positioning hints.
    pub flags: ColumnFlags,
}

impl ColumnDef {
    /// Creates an unpinned column with no sizing hints.
    #[must_use]
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self {
            key: key.into(),
            width: None,
            min_width: None,
            max_width: None,
            pin: ColumnPin::None,
            flags: ColumnFlags::empty(),
        }
    }

    /// Sets the preferred width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the minimum width.
    #[must_use]
    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = Some(min_width);
        self
    }

    /// Sets the maximum width.
    #[must_use]
    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// Sets the explicit pin.
    #[must_use]
    pub fn pinned(mut self, pin: ColumnPin) -> Self {
        self.pin = pin;
        self
    }

    /// Adds positioning flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Resolves the effective pin from the explicit pin and the flags.
    ///
    /// Sticky-left and system columns go left, sticky-right goes right, then
    /// the explicit pin applies, and finally locked columns go left.
    #[must_use]
    pub fn resolve_pin(&self) -> ColumnPin {
        if self
            .flags
            .intersects(ColumnFlags::STICKY_LEFT | ColumnFlags::SYSTEM)
        {
            return ColumnPin::Left;
        }
        if self.flags.contains(ColumnFlags::STICKY_RIGHT) {
            return ColumnPin::Right;
        }
        match self.pin {
            ColumnPin::None if self.flags.contains(ColumnFlags::LOCKED) => ColumnPin::Left,
            pin => pin,
        }
    }
}

/// A column resolved for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetric {
    /// Key of the source column.
    pub key: Arc<str>,
    /// Index of the source column in the host's column list.
    pub index: usize,
    /// Resolved, zoomed width.
    pub width: f64,
    /// Resolved pin.
    pub pin: ColumnPin,
}
