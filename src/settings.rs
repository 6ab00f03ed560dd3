// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Default tunables for stroke fitting and compositing.
//!
//! These are the values a fresh `Canvas` starts with. Hosts that want
//! different behavior load a `SketchConfig` instead of editing this file.

use peniko::Color;

// ============================================================================
// SAMPLE FILTERING
// ============================================================================
/// Jitter filter threshold.
///
/// Compared against the *squared* distance between consecutive samples,
/// so 25.0 lets through samples more than 5 units apart.
const MINIMUM_DRAW_DISTANCE: f64 = 25.0;

/// Accumulated sample distance after which a stroke is split into a new
/// compositing unit (ink flush, eraser window reset).
const MAXIMUM_ACCUMULATED_LENGTH: f64 = 80.0;

// ============================================================================
// TOOL DEFAULTS
// ============================================================================
const INK_WIDTH: f64 = 5.0;

/// UIKit-style dark gray (one third white), straight-alpha RGBA8
const INK_RGBA8: [u8; 4] = [0x55, 0x55, 0x55, 0xff];
const INK_COLOR: Color = Color::from_rgba8(INK_RGBA8[0], INK_RGBA8[1], INK_RGBA8[2], INK_RGBA8[3]);

const ERASER_WIDTH: f64 = 50.0;

// ============================================================================
// RASTERIZATION
// ============================================================================
/// Maximum distance between a curve and its flattened polyline
const FLATTEN_TOLERANCE: f64 = 0.1;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Jitter filter and compositing unit bounds
pub mod window {
    /// Squared-distance cutoff for accepting a new sample
    pub const MINIMUM_DRAW_DISTANCE: f64 = super::MINIMUM_DRAW_DISTANCE;

    /// Accumulated length that triggers a flush or window reset
    pub const MAXIMUM_ACCUMULATED_LENGTH: f64 = super::MAXIMUM_ACCUMULATED_LENGTH;
}

/// Ink tool defaults
pub mod ink {
    use peniko::Color;

    pub const WIDTH: f64 = super::INK_WIDTH;
    pub const COLOR: Color = super::INK_COLOR;
    /// `COLOR` as stored in config files
    pub const RGBA8: [u8; 4] = super::INK_RGBA8;
}

/// Eraser tool defaults
pub mod eraser {
    /// Erasing is coarse work, so the nib starts much wider than ink.
    pub const WIDTH: f64 = super::ERASER_WIDTH;
}

/// Raster settings
pub mod raster {
    pub const FLATTEN_TOLERANCE: f64 = super::FLATTEN_TOLERANCE;
}
