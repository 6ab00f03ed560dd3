// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Curve fitting for raw pointer samples.
//!
//! `ControlPointWindow` turns a stream of samples into a chain of C1
//! continuous cubic segments. A `Segment` is the unit the tools hand to the
//! rasterizer: either a fitted curve, the closing tail of a stroke, or the
//! dot left behind by a tap.

pub mod control_window;
pub mod segment;

pub use control_window::{Advance, ControlPointWindow, Slot};
pub use segment::Segment;
