// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for sketching
//!
//! A tool consumes one stroke at a time (begin, any number of moves, end)
//! and composites the segments its control point window produces. The two
//! tools share `StrokeCore` and differ only in where and how they
//! composite: ink paints into a private overlay and flushes it onto the
//! committed surface, the eraser cuts straight into the committed surface.

use crate::path::{Advance, ControlPointWindow, Segment};
use crate::raster::RasterSurface;
use kurbo::{PathSeg, Point};
use peniko::Color;

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Buffered additive ink
    Ink,
    /// Unbuffered subtractive eraser
    Eraser,
}

// ===== Ink Style =====

/// Per-tool stroke configuration.
///
/// Changes apply from the next composited segment onward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkStyle {
    pub width: f64,
    pub color: Color,
}

// ===== Stroke Core =====

/// State shared by every tool: the window and the stroke in progress
#[derive(Debug, Clone)]
pub struct StrokeCore {
    window: ControlPointWindow,
    style: InkStyle,
    stroking: bool,
    /// Whether the stroke in progress has produced a fitted segment
    drew_segment: bool,
}

impl StrokeCore {
    pub fn new(window: ControlPointWindow, style: InkStyle) -> Self {
        Self {
            window,
            style,
            stroking: false,
            drew_segment: false,
        }
    }

    pub fn begin(&mut self, point: Point) {
        self.window.begin_stroke(point);
        self.stroking = true;
        self.drew_segment = false;
    }

    /// Run a sample through the jitter filter and the window.
    pub fn advance(&mut self, point: Point) -> Option<Segment> {
        if !self.window.should_accept(point) {
            return None;
        }
        match self.window.advance(point) {
            Advance::Ready(cubic) => {
                self.drew_segment = true;
                Some(Segment::Curve(PathSeg::Cubic(cubic)))
            }
            Advance::Pending => None,
        }
    }

    /// Segment that closes the stroke.
    ///
    /// A stroke that never moved leaves a dot at its start; otherwise any
    /// samples written since the last fitted segment become a tail.
    pub fn closing_segment(&self) -> Option<Segment> {
        if !self.window.is_seeded() {
            return None;
        }
        if !self.drew_segment && self.window.cumulative_length() == 0.0 {
            return Some(Segment::Dot(self.window.leading()));
        }
        self.window.pending_tail().map(Segment::Curve)
    }

    /// End the stroke and unseed the window.
    pub fn finish(&mut self) {
        self.stroking = false;
        self.drew_segment = false;
        self.window.reset();
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn window(&self) -> &ControlPointWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut ControlPointWindow {
        &mut self.window
    }

    pub fn style(&self) -> InkStyle {
        self.style
    }

    pub fn style_mut(&mut self) -> &mut InkStyle {
        &mut self.style
    }
}

// ===== Tool Trait =====

/// A sketching tool.
///
/// Every event method returns the number of segments it composited. The
/// committed surface is borrowed per event; tools never hold on to it.
pub trait Tool {
    /// Get the tool identifier
    fn id(&self) -> ToolId;

    fn core(&self) -> &StrokeCore;

    fn core_mut(&mut self) -> &mut StrokeCore;

    fn on_stroke_begin(&mut self, point: Point, surface: &mut RasterSurface) -> usize;

    fn on_stroke_continue(&mut self, point: Point, surface: &mut RasterSurface) -> usize;

    /// Finalize the stroke in progress without a new sample.
    fn finish_stroke(&mut self, surface: &mut RasterSurface) -> usize;

    /// Drop any in-progress stroke state without compositing it.
    ///
    /// Safe to call at any time, including with no stroke in progress.
    fn reset(&mut self);

    /// The end position is offered to the window like a move, then the
    /// stroke is finalized.
    fn on_stroke_end(&mut self, point: Point, surface: &mut RasterSurface) -> usize {
        if !self.is_stroking() {
            tracing::trace!(tool = ?self.id(), "stroke end without a stroke; ignored");
            return 0;
        }
        let drawn = self.on_stroke_continue(point, surface);
        drawn + self.finish_stroke(surface)
    }

    fn is_stroking(&self) -> bool {
        self.core().is_stroking()
    }

    fn window(&self) -> &ControlPointWindow {
        self.core().window()
    }

    fn window_mut(&mut self) -> &mut ControlPointWindow {
        self.core_mut().window_mut()
    }

    fn style(&self) -> InkStyle {
        self.core().style()
    }

    fn set_width(&mut self, width: f64) {
        self.core_mut().style_mut().width = width;
    }

    fn set_color(&mut self, color: Color) {
        self.core_mut().style_mut().color = color;
    }
}

// ===== Tool Modules =====

pub mod eraser;
pub mod ink;

pub use eraser::EraseTool;
pub use ink::InkTool;
