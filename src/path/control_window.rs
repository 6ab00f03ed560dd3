// Copyright 2025 the Inkpad Authors
// SPDX-License-Identifier: Apache-2.0

//! The five-slot rolling window used to fit smoothed segments.
//!
//! Samples are written into the slots in order. When the `Trailing` slot is
//! filled, the window emits a cubic from `Leading` (controls
//! `LeadingControl` and `Middle`) to the midpoint of `Middle` and
//! `Trailing`, then rolls forward so the next segment starts exactly where
//! this one ended. The midpoint end trades one sample of latency for a
//! smooth join.

use crate::settings;
use kurbo::{CubicBez, Line, PathSeg, Point, QuadBez};

// ===== Slots =====

/// Named slots of the window, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Leading,
    LeadingControl,
    Middle,
    TrailingControl,
    Trailing,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Leading,
        Slot::LeadingControl,
        Slot::Middle,
        Slot::TrailingControl,
        Slot::Trailing,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Slot> {
        Self::ALL.get(index).copied()
    }
}

/// Result of feeding one sample into the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// More samples are needed before a segment can be fitted
    Pending,
    /// A segment is ready to be composited
    Ready(CubicBez),
}

// ===== ControlPointWindow =====

#[derive(Debug, Clone)]
pub struct ControlPointWindow {
    /// Always populated; unseeded windows hold the origin
    points: [Point; 5],
    /// Slot index of the most recently written sample
    cursor: usize,
    /// Last accepted sample; `None` until the window is seeded
    last_sample: Option<Point>,
    /// Distance covered by accepted samples since the last length reset
    cumulative_length: f64,
    /// Squared-distance cutoff for `should_accept`
    minimum_draw_distance: f64,
    maximum_accumulated_length: f64,
}

impl Default for ControlPointWindow {
    fn default() -> Self {
        Self::new(
            settings::window::MINIMUM_DRAW_DISTANCE,
            settings::window::MAXIMUM_ACCUMULATED_LENGTH,
        )
    }
}

impl ControlPointWindow {
    pub fn new(minimum_draw_distance: f64, maximum_accumulated_length: f64) -> Self {
        Self {
            points: [Point::ORIGIN; 5],
            cursor: 0,
            last_sample: None,
            cumulative_length: 0.0,
            minimum_draw_distance,
            maximum_accumulated_length,
        }
    }

    /// Start a new stroke at `point`.
    pub fn begin_stroke(&mut self, point: Point) {
        self.cursor = 0;
        self.points[Slot::Leading.index()] = point;
        self.cumulative_length = 0.0;
        self.last_sample = Some(point);
    }

    /// Jitter filter.
    ///
    /// Accepts anything on an unseeded window, otherwise only samples whose
    /// squared distance from the last accepted sample exceeds
    /// `minimum_draw_distance`. Must be checked before `advance`.
    pub fn should_accept(&self, point: Point) -> bool {
        match self.last_sample {
            None => true,
            Some(last) => (point - last).hypot2() > self.minimum_draw_distance,
        }
    }

    /// Write `point` into the next slot, emitting a segment when the window
    /// is full.
    ///
    /// Feeding an unseeded window seeds it instead.
    pub fn advance(&mut self, point: Point) -> Advance {
        let Some(last) = self.last_sample else {
            self.begin_stroke(point);
            return Advance::Pending;
        };

        self.cumulative_length += last.distance(point);
        self.last_sample = Some(point);
        self.cursor += 1;
        self.points[self.cursor] = point;

        if self.cursor < Slot::Trailing.index() {
            return Advance::Pending;
        }

        let center = self.middle().midpoint(self.trailing());
        self.set(Slot::TrailingControl, center);
        let segment = CubicBez::new(
            self.leading(),
            self.leading_control(),
            self.middle(),
            self.trailing_control(),
        );

        // Roll forward: slot 0 now carries the end of this segment
        self.set(Slot::Leading, self.trailing_control());
        self.set(Slot::LeadingControl, self.trailing());
        self.cursor = Slot::LeadingControl.index();

        Advance::Ready(segment)
    }

    /// Curve through the samples written since the last ready segment.
    ///
    /// Used on stroke end so the ink reaches the final sample instead of
    /// stopping at the last fitted midpoint.
    pub fn pending_tail(&self) -> Option<PathSeg> {
        if self.last_sample.is_none() {
            return None;
        }
        let p = &self.points;
        match self.cursor {
            1 => Some(PathSeg::Line(Line::new(p[0], p[1]))),
            2 => Some(PathSeg::Quad(QuadBez::new(p[0], p[1], p[2]))),
            3 => Some(PathSeg::Cubic(CubicBez::new(p[0], p[1], p[2], p[3]))),
            _ => None,
        }
    }

    pub fn exceeds_maximum_length(&self) -> bool {
        self.cumulative_length > self.maximum_accumulated_length
    }

    /// Start a new compositing unit without disturbing the control points.
    pub fn reset_length(&mut self) {
        self.cumulative_length = 0.0;
    }

    /// Return to the unseeded state.
    pub fn reset(&mut self) {
        self.points = [Point::ORIGIN; 5];
        self.cursor = 0;
        self.last_sample = None;
        self.cumulative_length = 0.0;
    }

    pub fn is_seeded(&self) -> bool {
        self.last_sample.is_some()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cumulative_length(&self) -> f64 {
        self.cumulative_length
    }

    pub fn last_sample(&self) -> Option<Point> {
        self.last_sample
    }

    pub fn minimum_draw_distance(&self) -> f64 {
        self.minimum_draw_distance
    }

    pub fn set_minimum_draw_distance(&mut self, distance: f64) {
        self.minimum_draw_distance = distance;
    }

    pub fn maximum_accumulated_length(&self) -> f64 {
        self.maximum_accumulated_length
    }

    pub fn set_maximum_accumulated_length(&mut self, length: f64) {
        self.maximum_accumulated_length = length;
    }

    // ===== Slot access =====

    pub fn point(&self, slot: Slot) -> Point {
        self.points[slot.index()]
    }

    fn set(&mut self, slot: Slot, point: Point) {
        self.points[slot.index()] = point;
    }

    pub fn leading(&self) -> Point {
        self.point(Slot::Leading)
    }

    pub fn leading_control(&self) -> Point {
        self.point(Slot::LeadingControl)
    }

    pub fn middle(&self) -> Point {
        self.point(Slot::Middle)
    }

    pub fn trailing_control(&self) -> Point {
        self.point(Slot::TrailingControl)
    }

    pub fn trailing(&self) -> Point {
        self.point(Slot::Trailing)
    }
}
