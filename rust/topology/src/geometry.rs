// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D geometric predicates shared by the network graph and the growth engine.
//!
//! Every identity comparison in the crate goes through [`EPSILON`]: two points
//! closer than the tolerance are the same point, a point closer than the
//! tolerance to a line lies on it. Nothing here reports an error for
//! degenerate input; zero-length segments and coincident points fall out as
//! "no intersection" or "on the line".

use std::f64::consts::{PI, TAU};

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Global distance tolerance below which two points are identical.
pub const EPSILON: f64 = 1e-4;

/// A 2D point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    /// Vector from `self` to `other`.
    pub fn vector_to(&self, other: &Point2D) -> Vector2<f64> {
        other.to_nalgebra() - self.to_nalgebra()
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        self.vector_to(other).norm()
    }

    /// Direction angle (`atan2`) from `self` towards `other`, in `(-PI, PI]`.
    pub fn angle_to(&self, other: &Point2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns `true` if the two points are within [`EPSILON`] of each other.
    pub fn nearly_equal(&self, other: &Point2D) -> bool {
        self.distance_to(other) < EPSILON
    }

    /// The point reached by travelling `distance` along direction `angle`.
    pub fn polar_offset(&self, angle: f64, distance: f64) -> Point2D {
        Point2D::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    /// `self + v * scale`.
    pub fn offset(&self, v: &Vector2<f64>, scale: f64) -> Point2D {
        Point2D::from_nalgebra(&(self.to_nalgebra() + v * scale))
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

// =============================================================================
// Angles
// =============================================================================

/// Wraps an angle into `[0, 2PI)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn signed_angle(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Smallest unsigned angle between two directions, in `[0, PI]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    signed_angle(a - b).abs()
}

/// Clockwise rotation needed to go from direction `from` to direction `to`,
/// in `[0, 2PI)`.
pub fn clockwise_delta(from: f64, to: f64) -> f64 {
    normalize_angle(from - to)
}

// =============================================================================
// Lines and segments
// =============================================================================

/// Which side of the directed line `a -> b` the point `p` lies on.
///
/// Returns `1` for the left side, `-1` for the right side and `0` when the
/// point is within [`EPSILON`] of the (infinite) line. A degenerate line
/// reports `0` for every point.
pub fn line_side(p: &Point2D, a: &Point2D, b: &Point2D) -> i8 {
    let dir = a.vector_to(b);
    let len = dir.norm();
    if len < EPSILON {
        return 0;
    }
    let offset = dir.perp(&a.vector_to(p)) / len;
    if offset.abs() < EPSILON {
        0
    } else if offset > 0.0 {
        1
    } else {
        -1
    }
}

/// Closest point to `p` on segment `a -> b`, with its parameter in `[0, 1]`.
pub fn closest_point_on_segment(p: &Point2D, a: &Point2D, b: &Point2D) -> (Point2D, f64) {
    let dir = a.vector_to(b);
    let length_sq = dir.norm_squared();
    if length_sq < EPSILON * EPSILON {
        return (*a, 0.0);
    }
    let t = (a.vector_to(p).dot(&dir) / length_sq).clamp(0.0, 1.0);
    (a.lerp(b, t), t)
}

/// Distance from `p` to the segment `a -> b`.
pub fn point_segment_distance(p: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    closest_point_on_segment(p, a, b).0.distance_to(p)
}

/// Where two segments meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    pub point: Point2D,
    /// Parameter along the first segment, `0` at its start and `1` at its end.
    pub t: f64,
    /// Parameter along the second segment.
    pub u: f64,
}

/// Intersects segment `a0 -> a1` with segment `b0 -> b1`.
///
/// Endpoints are allowed to overshoot by [`EPSILON`] so that segments that
/// touch within tolerance still report a crossing. Parallel and collinear
/// segments report `None`; callers that care about overlaps test endpoints
/// with [`point_segment_distance`].
pub fn segment_intersection(
    a0: &Point2D,
    a1: &Point2D,
    b0: &Point2D,
    b1: &Point2D,
) -> Option<SegmentIntersection> {
    let r = a0.vector_to(a1);
    let s = b0.vector_to(b1);
    let len_r = r.norm();
    let len_s = s.norm();
    if len_r < EPSILON || len_s < EPSILON {
        return None;
    }

    let denom = r.perp(&s);
    if (denom / (len_r * len_s)).abs() < 1e-12 {
        return None;
    }

    let qp = a0.vector_to(b0);
    let t = qp.perp(&s) / denom;
    let u = qp.perp(&r) / denom;

    let slack_t = EPSILON / len_r;
    let slack_u = EPSILON / len_s;
    if t < -slack_t || t > 1.0 + slack_t || u < -slack_u || u > 1.0 + slack_u {
        return None;
    }

    let t = t.clamp(0.0, 1.0);
    Some(SegmentIntersection {
        point: a0.lerp(a1, t),
        t,
        u: u.clamp(0.0, 1.0),
    })
}

// =============================================================================
// Polygons and polylines
// =============================================================================

/// Signed area of a closed polygon (shoelace formula). Positive when the
/// vertices run anticlockwise.
pub fn polygon_signed_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        twice_area += p.x * q.y - q.x * p.y;
    }
    twice_area / 2.0
}

/// Area centroid of a closed polygon.
///
/// Falls back to the vertex average for polygons without area (e.g. a loop
/// that walks out and back along the same edges). Returns `None` only for an
/// empty slice.
pub fn polygon_centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }

    let area = polygon_signed_area(points);
    if area.abs() < EPSILON * EPSILON {
        let n = points.len() as f64;
        let sum = points
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.to_nalgebra().coords);
        return Some(Point2D::new(sum.x / n, sum.y / n));
    }

    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point2D::new(cx * factor, cy * factor))
}

/// Total length of an open polyline.
pub fn polyline_length(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

/// Splits an open polyline at the point on it closest to `at`.
///
/// Both halves contain the split point, so the first half ends and the second
/// half starts exactly there.
pub fn split_polyline(points: &[Point2D], at: &Point2D) -> (Vec<Point2D>, Vec<Point2D>) {
    if points.len() < 2 {
        return (points.to_vec(), points.to_vec());
    }

    let mut best_segment = 0;
    let mut best_point = points[0];
    let mut best_distance = f64::INFINITY;
    for (i, w) in points.windows(2).enumerate() {
        let (candidate, _) = closest_point_on_segment(at, &w[0], &w[1]);
        let d = candidate.distance_to(at);
        if d < best_distance {
            best_distance = d;
            best_segment = i;
            best_point = candidate;
        }
    }

    let mut first: Vec<Point2D> = points[..=best_segment].to_vec();
    if !first.last().is_some_and(|p| p.nearly_equal(&best_point)) {
        first.push(best_point);
    }

    let mut second = vec![best_point];
    second.extend(
        points[best_segment + 1..]
            .iter()
            .skip_while(|p| p.nearly_equal(&best_point)),
    );

    (first, second)
}
