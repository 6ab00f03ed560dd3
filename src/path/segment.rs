// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! Composite units produced by the tools

use kurbo::{ParamCurve, PathEl, PathSeg, Point, Rect};

/// One piece of a stroke, ready to be rasterized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Zero-length mark left by a tap
    Dot(Point),
    /// A fitted curve, or the tail closing a stroke
    Curve(PathSeg),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Dot(pt) => *pt,
            Segment::Curve(seg) => seg.start(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Dot(pt) => *pt,
            Segment::Curve(seg) => seg.end(),
        }
    }

    /// Flatten into a polyline within `tolerance` of the true curve.
    ///
    /// Always returns at least two points; a dot is a degenerate line.
    pub fn polyline(&self, tolerance: f64) -> Vec<Point> {
        let seg = match self {
            Segment::Dot(pt) => return vec![*pt, *pt],
            Segment::Curve(seg) => *seg,
        };

        let curve_el = match seg {
            PathSeg::Line(line) => PathEl::LineTo(line.p1),
            PathSeg::Quad(quad) => PathEl::QuadTo(quad.p1, quad.p2),
            PathSeg::Cubic(cubic) => PathEl::CurveTo(cubic.p1, cubic.p2, cubic.p3),
        };

        let mut points = Vec::new();
        kurbo::flatten([PathEl::MoveTo(seg.start()), curve_el], tolerance, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            _ => {}
        });

        if points.len() < 2 {
            points.push(seg.end());
        }
        points
    }

    /// Bounds of a polyline, inflated by half the stroke width
    pub fn stroke_bounds(polyline: &[Point], width: f64) -> Rect {
        let first = polyline.first().copied().unwrap_or(Point::ORIGIN);
        let bounds = polyline
            .iter()
            .fold(Rect::from_points(first, first), |rect, pt| rect.union_pt(*pt));
        let pad = width / 2.0 + 1.0;
        bounds.inflate(pad, pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{CubicBez, Line};

    #[test]
    fn dot_flattens_to_degenerate_line() {
        let dot = Segment::Dot(Point::new(4.0, 4.0));
        assert_eq!(dot.polyline(0.1), vec![Point::new(4.0, 4.0); 2]);
        assert_eq!(dot.start(), dot.end());
    }

    #[test]
    fn curve_endpoints_follow_the_path_segment() {
        let cubic = CubicBez::new((1.0, 2.0), (5.0, 9.0), (12.0, 9.0), (16.0, 3.0));
        let seg = Segment::Curve(PathSeg::Cubic(cubic));
        assert_eq!(seg.start(), Point::new(1.0, 2.0));
        assert_eq!(seg.end(), Point::new(16.0, 3.0));
    }

    #[test]
    fn line_flattens_to_endpoints() {
        let seg = Segment::Curve(PathSeg::Line(Line::new((0.0, 0.0), (10.0, 0.0))));
        let pts = seg.polyline(0.1);
        assert_eq!(pts.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&Point::new(10.0, 0.0)));
    }

    #[test]
    fn curve_polyline_ends_on_curve_end() {
        let cubic = CubicBez::new((0.0, 0.0), (10.0, 20.0), (30.0, 20.0), (40.0, 0.0));
        let seg = Segment::Curve(PathSeg::Cubic(cubic));
        let pts = seg.polyline(0.1);
        assert!(pts.len() > 2);
        assert_eq!(pts[0], cubic.p0);
        assert!((pts[pts.len() - 1] - cubic.p3).hypot() < 1e-9);
    }

    #[test]
    fn stroke_bounds_include_half_width() {
        let pts = [Point::new(10.0, 10.0), Point::new(20.0, 10.0)];
        let rect = Segment::stroke_bounds(&pts, 4.0);
        assert_eq!(rect, Rect::new(7.0, 7.0, 23.0, 13.0));
    }
}
