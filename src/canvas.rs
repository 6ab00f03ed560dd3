// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! The sketch canvas: committed surface plus the draw/erase state machine.
//!
//! A `Canvas` owns the committed surface and both tools, and routes each
//! pointer event to whichever tool the current `SketchMode` selects. Only
//! one tool is ever active, so only one tool ever writes to the surface.

use crate::config::SketchConfig;
use crate::raster::RasterSurface;
use crate::tools::{EraseTool, InkTool, Tool};
use image::RgbaImage;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};

// ===== Mode and Events =====

/// Which tool receives pointer input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchMode {
    #[default]
    Draw,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    /// Finalizes the stroke exactly like `Ended`
    Cancelled,
}

/// One sample from the host's pointer stream, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: impl Into<Point>) -> Self {
        Self {
            phase,
            position: position.into(),
        }
    }
}

// ===== Observer =====

/// Callbacks for hosts that mirror canvas activity in their UI.
///
/// All methods default to doing nothing.
pub trait SketchObserver {
    /// A stroke began. `is_empty` is the canvas state before the stroke.
    fn did_start_sketching(&mut self, _is_empty: bool) {}

    fn pointer_moved(&mut self, _position: Point) {}

    /// A stroke ended, was cancelled, or was cut short by a mode switch.
    fn did_finish_sketching(&mut self) {}
}

// ===== Canvas =====

pub struct Canvas {
    surface: RasterSurface,
    mode: SketchMode,
    ink: InkTool,
    eraser: EraseTool,
    /// Set once any stroke composites a segment; cleared by `clear`
    drawn: bool,
    observer: Option<Box<dyn SketchObserver>>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("mode", &self.mode)
            .field("drawn", &self.drawn)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Canvas {
    /// A blank canvas in draw mode with default settings
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RasterSurface::new(width, height),
            mode: SketchMode::Draw,
            ink: InkTool::default(),
            eraser: EraseTool::default(),
            drawn: false,
            observer: None,
        }
    }

    pub fn with_config(width: u32, height: u32, config: &SketchConfig) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.apply_config(config);
        canvas
    }

    /// Apply tunables, widths and ink color from `config`.
    ///
    /// Like the individual setters, this takes effect from the next
    /// composited segment.
    pub fn apply_config(&mut self, config: &SketchConfig) {
        self.set_minimum_draw_distance(config.minimum_draw_distance);
        self.set_maximum_accumulated_length(config.maximum_accumulated_length);
        self.ink.set_width(config.ink_width);
        self.ink.set_color(config.ink_color());
        self.eraser.set_width(config.eraser_width);
        tracing::debug!(?config, "sketch config applied");
    }

    pub fn set_observer(&mut self, observer: Box<dyn SketchObserver>) {
        self.observer = Some(observer);
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn SketchObserver>> {
        self.observer.take()
    }

    // ===== Pointer Routing =====

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Began => self.handle_pointer_began(event.position),
            PointerPhase::Moved => self.handle_pointer_moved(event.position),
            PointerPhase::Ended => self.handle_pointer_ended(event.position),
            PointerPhase::Cancelled => self.handle_pointer_cancelled(event.position),
        }
    }

    pub fn handle_pointer_began(&mut self, position: Point) {
        let was_empty = self.is_empty();
        if let Some(observer) = self.observer.as_mut() {
            observer.did_start_sketching(was_empty);
        }
        self.route(|tool, surface| tool.on_stroke_begin(position, surface));
    }

    pub fn handle_pointer_moved(&mut self, position: Point) {
        if let Some(observer) = self.observer.as_mut() {
            observer.pointer_moved(position);
        }
        self.route(|tool, surface| tool.on_stroke_continue(position, surface));
    }

    pub fn handle_pointer_ended(&mut self, position: Point) {
        if !self.active_tool().is_stroking() {
            tracing::trace!("pointer ended without a stroke; ignored");
            return;
        }
        self.route(|tool, surface| tool.on_stroke_end(position, surface));
        self.notify_finished();
    }

    /// Treated exactly like `handle_pointer_ended`: the stroke is kept.
    pub fn handle_pointer_cancelled(&mut self, position: Point) {
        tracing::debug!("pointer cancelled; finalizing stroke");
        self.handle_pointer_ended(position);
    }

    /// Run `f` against the active tool and record whether it drew.
    fn route(&mut self, f: impl FnOnce(&mut dyn Tool, &mut RasterSurface) -> usize) {
        let tool: &mut dyn Tool = match self.mode {
            SketchMode::Draw => &mut self.ink,
            SketchMode::Erase => &mut self.eraser,
        };
        if f(tool, &mut self.surface) > 0 {
            self.drawn = true;
        }
    }

    fn notify_finished(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.did_finish_sketching();
        }
    }

    // ===== Mode =====

    pub fn mode(&self) -> SketchMode {
        self.mode
    }

    /// Switch tools.
    ///
    /// A stroke in progress is finalized by the outgoing tool as if the
    /// pointer had lifted at its last accepted sample; both tools start
    /// the next stroke with an unseeded window.
    pub fn set_mode(&mut self, mode: SketchMode) {
        if mode == self.mode {
            return;
        }

        let was_stroking = self.active_tool().is_stroking();
        if was_stroking {
            self.route(|tool, surface| tool.finish_stroke(surface));
        }
        self.active_tool_mut().reset();

        tracing::debug!(from = ?self.mode, to = ?mode, was_stroking, "sketch mode changed");
        self.mode = mode;
        self.active_tool_mut().reset();

        if was_stroking {
            self.notify_finished();
        }
    }

    fn active_tool(&self) -> &dyn Tool {
        match self.mode {
            SketchMode::Draw => &self.ink,
            SketchMode::Erase => &self.eraser,
        }
    }

    fn active_tool_mut(&mut self) -> &mut dyn Tool {
        match self.mode {
            SketchMode::Draw => &mut self.ink,
            SketchMode::Erase => &mut self.eraser,
        }
    }

    // ===== Configuration =====

    /// Set the ink color, whatever the current mode
    pub fn set_color(&mut self, color: Color) {
        self.ink.set_color(color);
    }

    pub fn color(&self) -> Color {
        self.ink.style().color
    }

    /// Set the width of the active tool
    pub fn set_width(&mut self, width: f64) {
        self.active_tool_mut().set_width(width);
    }

    /// Width of the active tool
    pub fn tool_width(&self) -> f64 {
        self.active_tool().style().width
    }

    pub fn set_minimum_draw_distance(&mut self, distance: f64) {
        self.ink.window_mut().set_minimum_draw_distance(distance);
        self.eraser.window_mut().set_minimum_draw_distance(distance);
    }

    pub fn set_maximum_accumulated_length(&mut self, length: f64) {
        self.ink.window_mut().set_maximum_accumulated_length(length);
        self.eraser.window_mut().set_maximum_accumulated_length(length);
    }

    pub fn minimum_draw_distance(&self) -> f64 {
        self.ink.window().minimum_draw_distance()
    }

    pub fn maximum_accumulated_length(&self) -> f64 {
        self.ink.window().maximum_accumulated_length()
    }

    pub fn ink_tool(&self) -> &InkTool {
        &self.ink
    }

    pub fn eraser_tool(&self) -> &EraseTool {
        &self.eraser
    }

    // ===== Output =====

    /// The committed surface.
    ///
    /// Later strokes keep mutating the same buffer; clone it to keep a
    /// snapshot.
    pub fn current_image(&self) -> &RasterSurface {
        &self.surface
    }

    /// True until a stroke composites its first segment, and again after
    /// `clear`.
    pub fn is_empty(&self) -> bool {
        !self.drawn
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Wipe the committed surface and drop any stroke in progress.
    pub fn clear(&mut self) {
        self.ink.reset();
        self.eraser.reset();
        // No damage means the whole surface is wiped
        self.surface.take_damage();
        self.surface.clear();
        self.drawn = false;
        tracing::debug!("canvas cleared");
    }

    /// Export the committed surface, optionally flattened over an opaque
    /// `background`.
    pub fn rendered_image(&self, background: Option<Color>) -> RgbaImage {
        match background {
            Some(color) => self.surface.to_rgba8_over(color),
            None => self.surface.to_rgba8(),
        }
    }
}
