// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Analytic coverage for round-capped, round-joined strokes.
//!
//! A stroke of width `w` is the set of points within `w / 2` of its
//! flattened polyline. Coverage of a pixel falls off linearly over one
//! pixel around that boundary, which gives a cheap one-pixel antialiased
//! edge. Taking the minimum distance over the whole polyline means a
//! single segment never covers a pixel twice.

use super::pixel_span;
use kurbo::{Line, ParamCurveNearest, Point, Rect};

/// Accuracy passed to `nearest`; exact for lines
const NEAREST_ACCURACY: f64 = 1e-6;

/// Calls `paint` once for each pixel the stroke touches, with coverage in
/// `(0, 1]`. Returns the clipped pixel rectangle that was visited.
pub(crate) fn stroke_coverage(
    polyline: &[Point],
    width: f64,
    bounds: Rect,
    surface_width: u32,
    surface_height: u32,
    mut paint: impl FnMut(u32, u32, f32),
) -> Option<Rect> {
    if polyline.is_empty() || width <= 0.0 {
        return None;
    }

    let lines: Vec<Line> = polyline
        .windows(2)
        .map(|pair| Line::new(pair[0], pair[1]))
        .collect();
    let half_width = width / 2.0;

    let mut touched: Option<Rect> = None;
    for (x, y) in pixel_span(bounds, surface_width, surface_height) {
        let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        let distance = distance_to_lines(&lines, polyline[0], center);
        let coverage = (half_width + 0.5 - distance).clamp(0.0, 1.0) as f32;
        if coverage <= 0.0 {
            continue;
        }
        paint(x, y, coverage);

        let px = Rect::new(x as f64, y as f64, x as f64 + 1.0, y as f64 + 1.0);
        touched = Some(touched.map_or(px, |rect| rect.union(px)));
    }
    touched
}

fn distance_to_lines(lines: &[Line], first: Point, pt: Point) -> f64 {
    if lines.is_empty() {
        return first.distance(pt);
    }
    lines
        .iter()
        .map(|line| {
            if line.p0 == line.p1 {
                (pt - line.p0).hypot2()
            } else {
                line.nearest(pt, NEAREST_ACCURACY).distance_sq
            }
        })
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}
