// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! The ink tool: buffered, additive strokes
//!
//! Segments are painted into a stroke-private overlay with
//! `CompositeOp::Cover`, so a stroke crossing itself re-covers pixels
//! instead of darkening them. The overlay is flattened onto the committed
//! surface with normal alpha blending when the stroke ends, and also
//! whenever the accumulated length passes the window maximum, so long
//! strokes show up on the committed surface in pieces.
//!
//! The overlay keeps the whole stroke until it ends. A flush recomputes only
//! the pixels the overlay changed since the previous flush, as overlay over
//! a saved copy of the committed pixels from before the stroke. A pixel
//! touched on both sides of a flush is therefore blended exactly once, and
//! the result matches a single flush at stroke end.

use super::{InkStyle, StrokeCore, Tool, ToolId};
use crate::path::{ControlPointWindow, Segment};
use crate::raster::{CompositeOp, DrawingContext, RasterSurface};
use crate::settings;
use kurbo::{Point, Rect};

#[derive(Debug, Clone)]
pub struct InkTool {
    core: StrokeCore,
    /// The stroke in progress. Kept between strokes and reallocated only
    /// when the committed surface changes size.
    overlay: RasterSurface,
    /// Committed pixels from before the stroke, valid under `stroke_region`
    backdrop: RasterSurface,
    /// Pixels flushed so far in this stroke, on pixel boundaries
    stroke_region: Option<Rect>,
    /// Length-triggered flushes in the current (or last) stroke
    flushes: usize,
}

impl Default for InkTool {
    fn default() -> Self {
        Self::new(ControlPointWindow::default())
    }
}

impl InkTool {
    pub fn new(window: ControlPointWindow) -> Self {
        let style = InkStyle {
            width: settings::ink::WIDTH,
            color: settings::ink::COLOR,
        };
        Self {
            core: StrokeCore::new(window, style),
            overlay: RasterSurface::new(0, 0),
            backdrop: RasterSurface::new(0, 0),
            stroke_region: None,
            flushes: 0,
        }
    }

    /// The in-progress stroke, not yet visible on the committed surface
    pub fn overlay(&self) -> Option<&RasterSurface> {
        self.core.is_stroking().then_some(&self.overlay)
    }

    /// Intermediate flushes triggered by stroke length.
    ///
    /// The final flush at stroke end is not counted.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Match the scratch buffers to `surface`, allocating only on a size
    /// change.
    fn prepare_buffers(&mut self, surface: &RasterSurface) {
        let size = (surface.width(), surface.height());
        if (self.overlay.width(), self.overlay.height()) != size {
            tracing::debug!(width = size.0, height = size.1, "ink buffers resized");
            self.overlay = surface.blank_like();
            self.backdrop = surface.blank_like();
        }
    }

    fn composite(&mut self, segment: Segment) -> usize {
        let style = self.core.style();
        match DrawingContext::acquire(&mut self.overlay, CompositeOp::Cover) {
            Ok(mut ctx) => {
                ctx.stroke(&segment, style.width, style.color);
                tracing::trace!(?segment, "ink segment composited");
                1
            }
            Err(err) => {
                tracing::debug!(%err, "ink segment skipped");
                0
            }
        }
    }

    /// Bring the committed surface up to date with the overlay.
    fn flush(&mut self, surface: &mut RasterSurface) {
        let Some(changed) = self.overlay.take_damage() else {
            return;
        };
        let region = match self.stroke_region {
            Some(flushed) => flushed.union(changed),
            None => changed,
        };
        // Outside the flushed region the committed pixels are still the
        // ones from before the stroke
        self.backdrop
            .copy_region_from(surface, region, self.stroke_region);
        self.stroke_region = Some(region);

        match DrawingContext::acquire(surface, CompositeOp::SourceOver) {
            Ok(mut ctx) => ctx.draw_surface_over(&self.overlay, &self.backdrop, changed),
            Err(err) => tracing::debug!(%err, "ink flush skipped"),
        }
    }

    /// Wipe everything the stroke painted into the overlay.
    fn discard_overlay(&mut self) {
        let pending = self.overlay.take_damage();
        for rect in [self.stroke_region.take(), pending].into_iter().flatten() {
            self.overlay.clear_region(rect);
        }
    }
}

impl Tool for InkTool {
    fn id(&self) -> ToolId {
        ToolId::Ink
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
            tracing::warn!("ink stroke began while another was in progress; finishing it");
            drawn = self.finish_stroke(surface);
        }

        self.core.begin(point);
        self.flushes = 0;
        self.stroke_region = None;
        self.prepare_buffers(surface);
        if surface.is_zero_sized() {
            tracing::debug!("committed surface is empty; ink stroke will leave no mark");
        }
        tracing::debug!(x = point.x, y = point.y, "ink stroke began");
        drawn
    }

    fn on_stroke_continue(&mut self, point: Point, surface: &mut RasterSurface) -> usize {
        if !self.core.is_stroking() {
            return 0;
        }
        let Some(segment) = self.core.advance(point) else {
            return 0;
        };
        let drawn = self.composite(segment);

        if self.core.window().exceeds_maximum_length() {
            self.flush(surface);
            self.flushes += 1;
            self.core.window_mut().reset_length();
            tracing::debug!(flushes = self.flushes, "ink overlay flushed mid-stroke");
        }
        drawn
    }

    fn finish_stroke(&mut self, surface: &mut RasterSurface) -> usize {
        if !self.core.is_stroking() {
            return 0;
        }
        let drawn = match self.core.closing_segment() {
            Some(segment) => self.composite(segment),
            None => 0,
        };
        self.flush(surface);
        self.discard_overlay();
        self.core.finish();
        tracing::debug!(flushes = self.flushes, "ink stroke finished");
        drawn
    }

    fn reset(&mut self) {
        self.discard_overlay();
        self.core.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;

    fn line_samples(from: f64, to: f64, step: f64, y: f64) -> Vec<Point> {
        let mut pts = Vec::new();
        let mut x = from;
        if from <= to {
            while x <= to {
                pts.push(Point::new(x, y));
                x += step;
            }
        } else {
            while x >= to {
                pts.push(Point::new(x, y));
                x -= step;
            }
        }
        pts
    }

    fn stroke(tool: &mut InkTool, surface: &mut RasterSurface, pts: &[Point]) -> usize {
        let (first, rest) = pts.split_first().expect("stroke needs a sample");
        let mut drawn = tool.on_stroke_begin(*first, surface);
        for pt in rest {
            drawn += tool.on_stroke_continue(*pt, surface);
        }
        let last = rest.last().unwrap_or(first);
        drawn + tool.on_stroke_end(*last, surface)
    }

    fn unbounded() -> InkTool {
        InkTool::new(ControlPointWindow::new(25.0, f64::INFINITY))
    }

    #[test]
    fn defaults_come_from_settings() {
        let tool = InkTool::default();
        assert_eq!(tool.style().width, settings::ink::WIDTH);
        assert_eq!(tool.style().color, settings::ink::COLOR);
        assert_eq!(tool.id(), ToolId::Ink);
        assert!(!tool.is_stroking());
    }

    #[test]
    fn tap_leaves_a_dot() {
        let mut tool = InkTool::default();
        tool.set_color(Color::BLACK);
        let mut surface = RasterSurface::new(32, 32);
        let p = Point::new(10.0, 10.0);
        tool.on_stroke_begin(p, &mut surface);
        let drawn = tool.on_stroke_end(p, &mut surface);
        assert_eq!(drawn, 1);
        assert_eq!(surface.alpha(10, 10), 1.0);
        assert_eq!(surface.alpha(20, 20), 0.0);
    }

    #[test]
    fn ink_is_invisible_until_stroke_end() {
        let mut tool = unbounded();
        tool.set_color(Color::BLACK);
        let mut surface = RasterSurface::new(128, 64);
        let pts = line_samples(10.0, 100.0, 10.0, 30.0);
        tool.on_stroke_begin(pts[0], &mut surface);
        for pt in &pts[1..] {
            tool.on_stroke_continue(*pt, &mut surface);
        }
        let overlay = tool.overlay().expect("overlay exists mid-stroke");
        assert_eq!(overlay.alpha(20, 30), 1.0);
        assert!(surface.is_blank());

        tool.on_stroke_end(*pts.last().unwrap(), &mut surface);
        assert_eq!(surface.alpha(20, 30), 1.0);
        assert!(tool.overlay().is_none());
    }

    #[test]
    fn self_overlap_does_not_double_blend() {
        let mut tool = unbounded();
        tool.set_color(Color::BLACK.with_alpha(0.5));
        let mut surface = RasterSurface::new(128, 64);
        let mut pts = line_samples(10.0, 100.0, 10.0, 30.0);
        pts.extend(line_samples(90.0, 10.0, 10.0, 30.0));
        stroke(&mut tool, &mut surface, &pts);

        // The stroke doubles back, so x = 50 is covered twice
        let overlapped = surface.alpha(50, 30);
        let mut single = RasterSurface::new(128, 64);
        let mut single_tool = unbounded();
        single_tool.set_color(Color::BLACK.with_alpha(0.5));
        stroke(&mut single_tool, &mut single, &line_samples(10.0, 100.0, 10.0, 30.0));

        assert_eq!(overlapped, single.alpha(50, 30));
        assert!((overlapped - 0.5).abs() < 1e-6);
    }

    #[test]
    fn long_stroke_flushes_on_length() {
        let mut tool = InkTool::new(ControlPointWindow::new(25.0, 80.0));
        let mut surface = RasterSurface::new(320, 32);
        // 28 moves 10 apart: segments after move 4, 7, ..., 28; the length
        // passes 80 at moves 10, 19 and 28
        let pts = line_samples(0.0, 280.0, 10.0, 16.0);
        assert_eq!(pts.len(), 29);
        tool.on_stroke_begin(pts[0], &mut surface);
        for pt in &pts[1..] {
            tool.on_stroke_continue(*pt, &mut surface);
        }
        assert_eq!(tool.flush_count(), 3);
        // Flushed content is already committed mid-stroke
        assert!(surface.alpha(20, 16) > 0.0);
        tool.on_stroke_end(pts[28], &mut surface);
        assert_eq!(tool.flush_count(), 3);
    }

    fn bounded_and_single(color: Color, under: &[Point]) -> (InkTool, RasterSurface, RasterSurface) {
        let pts = line_samples(0.0, 280.0, 10.0, 16.0);
        let mut surfaces = [RasterSurface::new(320, 32), RasterSurface::new(320, 32)];
        for surface in &mut surfaces {
            if !under.is_empty() {
                let mut base = unbounded();
                base.set_color(Color::BLACK.with_alpha(0.4));
                stroke(&mut base, surface, under);
            }
        }
        let [mut bounded_surface, mut single_surface] = surfaces;

        let mut bounded = InkTool::new(ControlPointWindow::new(25.0, 80.0));
        bounded.set_color(color);
        stroke(&mut bounded, &mut bounded_surface, &pts);

        let mut single = unbounded();
        single.set_color(color);
        stroke(&mut single, &mut single_surface, &pts);
        assert_eq!(single.flush_count(), 0);
        (bounded, bounded_surface, single_surface)
    }

    #[test]
    fn flushing_does_not_change_the_result() {
        let (bounded, a, b) = bounded_and_single(Color::BLACK, &[]);
        assert_eq!(bounded.flush_count(), 3);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn flushing_translucent_ink_blends_each_pixel_once() {
        let color = Color::from_rgba8(0x20, 0x40, 0xc0, 0x80);
        let (bounded, a, b) = bounded_and_single(color, &[]);
        assert_eq!(bounded.flush_count(), 3);
        // x = 88 sits where the first flush ends and the next segment's
        // cap begins
        assert_eq!(a.alpha(88, 16), b.alpha(88, 16));
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn flushing_over_existing_ink_keeps_the_backdrop() {
        let color = Color::BLACK.with_alpha(0.5);
        let crossing = [
            Point::new(88.0, 0.0),
            Point::new(88.0, 10.0),
            Point::new(88.0, 20.0),
            Point::new(88.0, 31.0),
        ];
        let (bounded, a, b) = bounded_and_single(color, &crossing);
        assert_eq!(bounded.flush_count(), 3);
        assert!(a.alpha(88, 16) > 0.5);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn buffers_are_reused_between_strokes() {
        let mut tool = unbounded();
        let mut surface = RasterSurface::new(128, 64);
        let pts = line_samples(10.0, 100.0, 10.0, 30.0);

        tool.on_stroke_begin(pts[0], &mut surface);
        let first = tool.overlay().map(|o| o.as_raw().as_ptr());
        tool.on_stroke_end(pts[0], &mut surface);
        stroke(&mut tool, &mut surface, &pts);

        tool.on_stroke_begin(Point::new(5.0, 5.0), &mut surface);
        let overlay = tool.overlay().expect("overlay exists mid-stroke");
        assert_eq!(Some(overlay.as_raw().as_ptr()), first);
        assert!(overlay.is_blank());
        tool.reset();

        let mut larger = RasterSurface::new(256, 64);
        tool.on_stroke_begin(Point::new(5.0, 5.0), &mut larger);
        let overlay = tool.overlay().expect("overlay exists mid-stroke");
        assert_eq!(overlay.width(), 256);
        assert!(overlay.is_blank());
    }

    #[test]
    fn zero_sized_surface_is_a_silent_no_op() {
        let mut tool = InkTool::default();
        let mut surface = RasterSurface::new(0, 0);
        let pts = line_samples(0.0, 100.0, 10.0, 0.0);
        assert_eq!(stroke(&mut tool, &mut surface, &pts), 0);
        assert!(!tool.is_stroking());
        assert_eq!(surface.open_contexts(), 0);
    }

    #[test]
    fn width_change_applies_to_next_segment() {
        let mut tool = unbounded();
        tool.set_color(Color::BLACK);
        let mut surface = RasterSurface::new(200, 64);
        let pts = line_samples(10.0, 160.0, 10.0, 32.0);
        tool.on_stroke_begin(pts[0], &mut surface);
        for pt in &pts[1..5] {
            tool.on_stroke_continue(*pt, &mut surface);
        }
        // First segment (x 10..40) is thin
        tool.set_width(20.0);
        for pt in &pts[5..] {
            tool.on_stroke_continue(*pt, &mut surface);
        }
        tool.on_stroke_end(*pts.last().unwrap(), &mut surface);
        assert_eq!(surface.alpha(20, 40), 0.0);
        assert_eq!(surface.alpha(100, 40), 1.0);
    }

    #[test]
    fn reset_discards_in_progress_stroke() {
        let mut tool = unbounded();
        let mut surface = RasterSurface::new(128, 64);
        let pts = line_samples(10.0, 100.0, 10.0, 30.0);
        tool.on_stroke_begin(pts[0], &mut surface);
        for pt in &pts[1..] {
            tool.on_stroke_continue(*pt, &mut surface);
        }
        tool.reset();
        tool.reset();
        assert!(!tool.is_stroking());
        assert!(tool.overlay().is_none());
        assert!(!tool.window().is_seeded());
        assert!(surface.is_blank());
        assert_eq!(tool.on_stroke_end(Point::new(1.0, 1.0), &mut surface), 0);
    }

    #[test]
    fn begin_while_stroking_finishes_previous_stroke() {
        let mut tool = unbounded();
        tool.set_color(Color::BLACK);
        let mut surface = RasterSurface::new(128, 64);
        tool.on_stroke_begin(Point::new(10.0, 10.0), &mut surface);
        tool.on_stroke_begin(Point::new(60.0, 40.0), &mut surface);
        // The first stroke was a tap and is now committed
        assert_eq!(surface.alpha(10, 10), 1.0);
        assert!(tool.is_stroking());
        assert_eq!(tool.window().leading(), Point::new(60.0, 40.0));
    }
}
