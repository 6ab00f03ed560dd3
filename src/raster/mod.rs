// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Raster surfaces and compositing.
//!
//! Pixels are stored as premultiplied RGBA in `f32` so repeated
//! compositing does not accumulate quantization error. Conversion to 8-bit
//! straight alpha happens only on export.

mod context;
mod coverage;

pub use context::DrawingContext;

use image::{Rgba, Rgba32FImage, RgbaImage};
use kurbo::Rect;
use peniko::Color;

// ===== Compositing =====

/// Pixel-combine rule used when painting into a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    /// Normal alpha blending (ink flush)
    SourceOver,
    /// Removes destination alpha in proportion to coverage (eraser)
    DestinationOut,
    /// Keeps whichever of source and destination is more opaque.
    ///
    /// Painting the same pixel twice leaves it unchanged, so a stroke
    /// overlapping itself in the overlay never darkens.
    Cover,
}

impl CompositeOp {
    /// Combine a premultiplied source with `dst`.
    ///
    /// `coverage` is the fraction of the pixel the source covers and is
    /// already folded into `src`; only `DestinationOut` reads it directly.
    pub(crate) fn apply(self, dst: &mut [f32; 4], src: [f32; 4], coverage: f32) {
        match self {
            CompositeOp::SourceOver => {
                let inv = 1.0 - src[3];
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s + *d * inv;
                }
            }
            CompositeOp::DestinationOut => {
                let keep = 1.0 - coverage;
                for d in dst.iter_mut() {
                    *d *= keep;
                }
            }
            CompositeOp::Cover => {
                if src[3] > dst[3] {
                    *dst = src;
                }
            }
        }
    }
}

/// Premultiply a color, scaled by `coverage`
pub(crate) fn premultiplied(color: Color, coverage: f32) -> [f32; 4] {
    let [r, g, b, a] = color.components;
    let alpha = a * coverage;
    [r * alpha, g * alpha, b * alpha, alpha]
}

// ===== RasterSurface =====

/// An owned, fixed-size pixel buffer that starts fully transparent
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: Rgba32FImage,
    /// Region touched since the last `take_damage`
    damage: Option<Rect>,
    /// Bumped every time a drawing context is released
    revision: u64,
    open_contexts: usize,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Rgba32FImage::new(width, height),
            damage: None,
            revision: 0,
            open_contexts: 0,
        }
    }

    /// A blank surface with the same dimensions as `self`
    pub fn blank_like(&self) -> Self {
        Self::new(self.width(), self.height())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_zero_sized(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Full extent of the surface in surface-local coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    /// Premultiplied RGBA at a pixel, or `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels.get_pixel(x, y).0)
    }

    /// Alpha at a pixel; zero outside the surface
    pub fn alpha(&self, x: u32, y: u32) -> f32 {
        self.pixel(x, y).map_or(0.0, |px| px[3])
    }

    /// Raw premultiplied samples, row-major RGBA
    pub fn as_raw(&self) -> &[f32] {
        self.pixels.as_raw()
    }

    /// Whether every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.pixels.as_raw().iter().all(|&v| v == 0.0)
    }

    /// Reset every pixel to transparent.
    ///
    /// Only the damaged region is touched when one is known.
    pub fn clear(&mut self) {
        match self.damage.take() {
            Some(rect) => self.clear_region(rect),
            None => self.pixels.pixels_mut().for_each(|px| *px = Rgba([0.0; 4])),
        }
        self.revision += 1;
    }

    pub fn damage(&self) -> Option<Rect> {
        self.damage
    }

    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage.take()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of drawing contexts currently open on this surface
    pub fn open_contexts(&self) -> usize {
        self.open_contexts
    }

    /// Export as 8-bit straight-alpha RGBA
    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
            if a <= 0.0 {
                return Rgba([0, 0, 0, 0]);
            }
            Rgba([
                to_u8(r / a),
                to_u8(g / a),
                to_u8(b / a),
                to_u8(a),
            ])
        })
    }

    /// Export flattened over an opaque `background`
    pub fn to_rgba8_over(&self, background: Color) -> RgbaImage {
        let [br, bg, bb, _] = background.components;
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
            let inv = 1.0 - a;
            Rgba([
                to_u8(r + br * inv),
                to_u8(g + bg * inv),
                to_u8(b + bb * inv),
                u8::MAX,
            ])
        })
    }

    // ===== Crate internals used by DrawingContext =====

    /// Reset the pixels under `rect` to transparent, leaving damage alone
    pub(crate) fn clear_region(&mut self, rect: Rect) {
        for (x, y) in pixel_span(rect, self.width(), self.height()) {
            self.pixels.put_pixel(x, y, Rgba([0.0; 4]));
        }
    }

    /// Copy the pixels of `source` under `rect`, skipping those under
    /// `skip`.
    ///
    /// Both rectangles are expected on pixel boundaries.
    pub(crate) fn copy_region_from(&mut self, source: &RasterSurface, rect: Rect, skip: Option<Rect>) {
        let inside = |x: u32, y: u32| {
            skip.is_some_and(|r| {
                let (x, y) = (x as f64, y as f64);
                x >= r.x0 && x < r.x1 && y >= r.y0 && y < r.y1
            })
        };
        for (x, y) in pixel_span(rect, self.width(), self.height()) {
            if inside(x, y) {
                continue;
            }
            if let Some(px) = source.pixel(x, y) {
                self.pixels.put_pixel(x, y, Rgba(px));
            }
        }
    }

    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32; 4] {
        &mut self.pixels.get_pixel_mut(x, y).0
    }

    pub(crate) fn context_opened(&mut self) {
        self.open_contexts += 1;
    }

    pub(crate) fn context_released(&mut self, touched: Option<Rect>) {
        self.open_contexts = self.open_contexts.saturating_sub(1);
        self.revision += 1;
        if let Some(rect) = touched {
            self.damage = Some(match self.damage {
                Some(existing) => existing.union(rect),
                None => rect,
            });
        }
    }
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Integer pixel coordinates whose centers may fall inside `rect`,
/// clipped to a `width` x `height` surface.
pub(crate) fn pixel_span(
    rect: Rect,
    width: u32,
    height: u32,
) -> impl Iterator<Item = (u32, u32)> {
    let clip = |lo: f64, hi: f64, max: u32| {
        let lo = lo.floor().max(0.0).min(max as f64) as u32;
        let hi = hi.ceil().max(0.0).min(max as f64) as u32;
        lo..hi
    };
    let xs = clip(rect.x0, rect.x1, width);
    let ys = clip(rect.y0, rect.y1, height);
    ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
}
