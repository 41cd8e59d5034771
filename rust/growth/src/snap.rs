// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapping new growth onto existing streets.
//!
//! A proposed segment `source -> target` is tested against the surrounding
//! street segments. The outcome is one of:
//! - [`SnapResult::NoSnap`]: nothing nearby, grow freely
//! - [`SnapResult::Ends`]: join an existing junction
//! - [`SnapResult::Midway`]: split an existing street and join it there
//!
//! All region tests are expressed as point-versus-line sidedness against
//! quads built once from the segment direction.

use serde::{Deserialize, Serialize};

use streetnet_topology::geometry::{
    closest_point_on_segment, line_side, segment_intersection, EPSILON,
};
use streetnet_topology::Point2D;

/// How new growth attaches to existing streets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapResult {
    NoSnap,
    Ends,
    Midway,
}

/// Outcome of [`Snap::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOutcome {
    pub result: SnapResult,
    /// How far the snap moves the end of the segment.
    pub distance: f64,
    /// Where the segment ends after snapping.
    pub point: Point2D,
    /// Index of the obstacle snapped to.
    pub obstacle: Option<usize>,
}

/// A convex quad with anticlockwise corners.
#[derive(Debug, Clone, Copy)]
struct Quad {
    corners: [Point2D; 4],
}

impl Quad {
    /// Inside or on the boundary: not right of any side.
    fn contains(&self, p: &Point2D) -> bool {
        (0..4).all(|i| line_side(p, &self.corners[i], &self.corners[(i + 1) % 4]) >= 0)
    }
}

/// Snap test for one proposed segment.
#[derive(Debug, Clone)]
pub struct Snap {
    source: Point2D,
    target: Point2D,
    radius: f64,
    /// Half-width `radius` around the segment, running `radius` past the
    /// target.
    corridor: Quad,
    /// Square of half-width `10 * radius` centred on the target.
    local: Quad,
    /// Far end of the corridor centreline.
    extended: Point2D,
}

impl Snap {
    pub fn new(source: Point2D, target: Point2D, radius: f64) -> Self {
        let length = source.distance_to(&target);
        let (ux, uy) = if length < EPSILON {
            (1.0, 0.0)
        } else {
            ((target.x - source.x) / length, (target.y - source.y) / length)
        };
        let along = |p: &Point2D, s: f64| Point2D::new(p.x + ux * s, p.y + uy * s);
        let across = |p: &Point2D, s: f64| Point2D::new(p.x - uy * s, p.y + ux * s);

        let extended = along(&target, radius);
        let corridor = Quad {
            corners: [
                across(&source, -radius),
                across(&extended, -radius),
                across(&extended, radius),
                across(&source, radius),
            ],
        };

        let reach = 10.0 * radius;
        let back = along(&target, -reach);
        let front = along(&target, reach);
        let local = Quad {
            corners: [
                across(&back, -reach),
                across(&front, -reach),
                across(&front, reach),
                across(&back, reach),
            ],
        };

        Self {
            source,
            target,
            radius,
            corridor,
            local,
            extended,
        }
    }

    /// Finds the nearest snap across all obstacle segments.
    ///
    /// Candidates from different obstacles are ranked by their distance from
    /// the source; the first obstacle wins a tie.
    pub fn solve(&self, obstacles: &[(Point2D, Point2D)]) -> SnapOutcome {
        let mut best: Option<(f64, SnapOutcome)> = None;

        if self.radius >= EPSILON {
            for (index, (a, b)) in obstacles.iter().enumerate() {
                let Some((result, point)) = self.test_obstacle(a, b) else {
                    continue;
                };
                let rank = self.source.distance_to(&point);
                if best.as_ref().map_or(true, |(r, _)| rank < *r) {
                    best = Some((
                        rank,
                        SnapOutcome {
                            result,
                            distance: point.distance_to(&self.target),
                            point,
                            obstacle: Some(index),
                        },
                    ));
                }
            }
        }

        best.map(|(_, outcome)| outcome).unwrap_or(SnapOutcome {
            result: SnapResult::NoSnap,
            distance: 0.0,
            point: self.target,
            obstacle: None,
        })
    }

    /// Runs the three tests on one obstacle, in priority order.
    fn test_obstacle(&self, a: &Point2D, b: &Point2D) -> Option<(SnapResult, Point2D)> {
        let in_corridor = [self.corridor.contains(a), self.corridor.contains(b)];

        // Test 1: an endpoint in the corridor and within the radius of the
        // target.
        let end = [(a, in_corridor[0]), (b, in_corridor[1])]
            .into_iter()
            .filter(|(p, inside)| *inside && p.distance_to(&self.target) <= self.radius)
            .map(|(p, _)| *p)
            .min_by(|p, q| {
                self.source
                    .distance_to(p)
                    .total_cmp(&self.source.distance_to(q))
            });
        if let Some(point) = end {
            return Some((SnapResult::Ends, point));
        }

        // Test 2: the obstacle crosses the corridor centreline.
        if let Some(hit) = segment_intersection(&self.source, &self.extended, a, b) {
            if !hit.point.nearly_equal(&self.source) {
                return Some((SnapResult::Midway, hit.point));
            }
        }

        // Test 3: an obstacle clear of the corridor passes close to the
        // target.
        if in_corridor.iter().any(|&inside| inside) {
            return None;
        }
        if self.local.contains(a) || self.local.contains(b) {
            let (closest, _) = closest_point_on_segment(&self.target, a, b);
            if closest.distance_to(&self.target) <= self.radius {
                if closest.nearly_equal(a) {
                    return Some((SnapResult::Ends, *a));
                }
                if closest.nearly_equal(b) {
                    return Some((SnapResult::Ends, *b));
                }
                return Some((SnapResult::Midway, closest));
            }
        }

        None
    }
}
