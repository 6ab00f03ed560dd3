// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! The eraser: unbuffered, subtractive strokes
//!
//! Each segment cuts straight into the committed surface with
//! `CompositeOp::DestinationOut`, so erasing is visible while the stroke is
//! still in progress. There is no overlay to flush; passing the length
//! maximum only resets the window's running length.

use super::{InkStyle, StrokeCore, Tool, ToolId};
use crate::path::{ControlPointWindow, Segment};
use crate::raster::{CompositeOp, DrawingContext, RasterSurface};
use crate::settings;
use kurbo::Point;
use peniko::Color;

#[derive(Debug, Clone)]
pub struct EraseTool {
    core: StrokeCore,
}

impl Default for EraseTool {
    fn default() -> Self {
        Self::new(ControlPointWindow::default())
    }
}

impl EraseTool {
    pub fn new(window: ControlPointWindow) -> Self {
        let style = InkStyle {
            width: settings::eraser::WIDTH,
            color: Color::TRANSPARENT,
        };
        Self {
            core: StrokeCore::new(window, style),
        }
    }

    fn erase(&self, segment: Segment, surface: &mut RasterSurface) -> usize {
        let width = self.core.style().width;
        match DrawingContext::acquire(surface, CompositeOp::DestinationOut) {
            Ok(mut ctx) => {
                ctx.stroke(&segment, width, Color::TRANSPARENT);
                tracing::trace!(?segment, "eraser segment composited");
                1
            }
            Err(err) => {
                tracing::debug!(%err, "eraser segment skipped");
                0
            }
        }
    }
}

impl Tool for EraseTool {
    fn id(&self) -> ToolId {
        ToolId::Eraser
    }

    fn core(&self) -> &StrokeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StrokeCore {
        &mut self.core
    }

    fn on_stroke_begin(&mut self, point: Point, surface: &mut RasterSurface) -> usize {
        let mut drawn = 0;
        if self.core.is_stroking() {
            tracing::warn!("eraser stroke began while another was in progress; finishing it");
            drawn = self.finish_stroke(surface);
        }
        self.core.begin(point);
        tracing::debug!(x = point.x, y = point.y, "eraser stroke began");
        drawn
    }

    fn on_stroke_continue(&mut self, point: Point, surface: &mut RasterSurface) -> usize {
        if !self.core.is_stroking() {
            return 0;
        }
        let Some(segment) = self.core.advance(point) else {
            return 0;
        };
        let drawn = self.erase(segment, surface);

        if self.core.window().exceeds_maximum_length() {
            self.core.window_mut().reset_length();
        }
        drawn
    }

    fn finish_stroke(&mut self, surface: &mut RasterSurface) -> usize {
        if !self.core.is_stroking() {
            return 0;
        }
        let drawn = match self.core.closing_segment() {
            Some(segment) => self.erase(segment, surface),
            None => 0,
        };
        self.core.finish();
        tracing::debug!("eraser stroke finished");
        drawn
    }

    fn reset(&mut self) {
        self.core.finish();
    }

    /// The eraser only removes; its color is fixed.
    fn set_color(&mut self, _color: Color) {
        tracing::trace!("eraser color is fixed; ignoring");
    }
}
