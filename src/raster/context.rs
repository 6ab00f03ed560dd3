// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Scoped drawing contexts.
//!
//! A `DrawingContext` is how tools paint into a `RasterSurface`. It
//! is released when dropped, so every exit path (including early returns
//! and `?`) closes it and folds the painted region into the surface damage.

use super::coverage::stroke_coverage;
use super::{CompositeOp, RasterSurface, pixel_span, premultiplied};
use crate::error::ContextUnavailable;
use crate::path::Segment;
use crate::settings;
use kurbo::Rect;
use peniko::Color;

pub struct DrawingContext<'a> {
    surface: &'a mut RasterSurface,
    op: CompositeOp,
    /// Pixels painted through this context
    touched: Option<Rect>,
}

impl<'a> DrawingContext<'a> {
    /// Open a context that paints with `op`.
    ///
    /// Fails on zero-sized surfaces, which have nothing to render into.
    pub fn acquire(
        surface: &'a mut RasterSurface,
        op: CompositeOp,
    ) -> Result<Self, ContextUnavailable> {
        if surface.is_zero_sized() {
            return Err(ContextUnavailable {
                width: surface.width(),
                height: surface.height(),
            });
        }
        surface.context_opened();
        tracing::trace!(?op, "drawing context acquired");
        Ok(Self {
            surface,
            op,
            touched: None,
        })
    }

    pub fn op(&self) -> CompositeOp {
        self.op
    }

    /// Stroke a segment with round caps and joins.
    ///
    /// `color` is ignored by `DestinationOut`, which only reads coverage.
    pub fn stroke(&mut self, segment: &Segment, width: f64, color: Color) {
        let polyline = segment.polyline(settings::raster::FLATTEN_TOLERANCE);
        let bounds = Segment::stroke_bounds(&polyline, width);
        let (w, h) = (self.surface.width(), self.surface.height());
        let op = self.op;
        let surface = &mut *self.surface;

        let touched = stroke_coverage(&polyline, width, bounds, w, h, |x, y, coverage| {
            let src = premultiplied(color, coverage);
            op.apply(surface.pixel_mut(x, y), src, coverage);
        });
        self.mark(touched);
    }

    /// Recompute `region` as `source` composited over `backdrop`.
    ///
    /// Pixels under `region` are first replaced by the backdrop, so a
    /// region can be recomposited any number of times with the same result.
    pub fn draw_surface_over(&mut self, source: &RasterSurface, backdrop: &RasterSurface, region: Rect) {
        let region = region.intersect(self.surface.bounds());
        let op = self.op;
        for (x, y) in pixel_span(region, self.surface.width(), self.surface.height()) {
            let (Some(src), Some(base)) = (source.pixel(x, y), backdrop.pixel(x, y)) else {
                continue;
            };
            let dst = self.surface.pixel_mut(x, y);
            *dst = base;
            op.apply(dst, src, src[3]);
        }
        self.mark(Some(region));
    }

    fn mark(&mut self, touched: Option<Rect>) {
        if let Some(rect) = touched {
            self.touched = Some(match self.touched {
                Some(existing) => existing.union(rect),
                None => rect,
            });
        }
    }
}

impl Drop for DrawingContext<'_> {
    fn drop(&mut self) {
        self.surface.context_released(self.touched);
        tracing::trace!(op = ?self.op, "drawing context released");
    }
}
