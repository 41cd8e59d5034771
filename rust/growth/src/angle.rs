// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Direction sampling under junction angle limits.

use std::f64::consts::TAU;

use streetnet_topology::geometry::angular_difference;
use streetnet_topology::{NetworkGraph, NetworkNode, Point2D};

use crate::config::GrowthConfig;
use crate::rng::RandomSource;

/// A proposed growth step from a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthCandidate {
    pub accepted: bool,
    /// Direction of the step, in `[0, 2PI)`.
    pub angle: f64,
    /// End of the step. Meaningful only when accepted.
    pub point: Point2D,
}

/// Samples branch directions that keep junctions readable: no two streets
/// closer than `minimum_angle`, and no new street further than
/// `maximum_angle` from every existing one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleControlledGrowth {
    pub minimum_angle: f64,
    pub maximum_angle: f64,
}

impl AngleControlledGrowth {
    pub fn new(minimum_angle: f64, maximum_angle: f64) -> Self {
        Self {
            minimum_angle,
            maximum_angle,
        }
    }

    pub fn from_config(config: &GrowthConfig) -> Self {
        Self::new(config.minimum_angle, config.maximum_angle)
    }

    /// Draws a uniform direction and tests it.
    pub fn next(
        &self,
        graph: &NetworkGraph,
        node: &NetworkNode,
        distance: f64,
        rng: &mut dyn RandomSource,
    ) -> GrowthCandidate {
        let angle = rng.next_f64() * TAU;
        self.next_with_angle(graph, node, distance, angle)
    }

    /// Tests a given direction.
    pub fn next_with_angle(
        &self,
        graph: &NetworkGraph,
        node: &NetworkNode,
        distance: f64,
        angle: f64,
    ) -> GrowthCandidate {
        let existing = node.angles(graph);
        let accepted = self.clears_minimum(&existing, angle) && self.within_maximum(&existing, angle);
        GrowthCandidate {
            accepted,
            angle,
            point: node.location().polar_offset(angle, distance),
        }
    }

    /// Re-checks the minimum angle for a step that a snap moved to `point`.
    pub fn post_generation_compliance(
        &self,
        graph: &NetworkGraph,
        node: &NetworkNode,
        point: &Point2D,
    ) -> bool {
        if node.location().nearly_equal(point) {
            return false;
        }
        let angle = node.location().angle_to(point);
        self.clears_minimum(&node.angles(graph), angle)
    }

    fn clears_minimum(&self, existing: &[f64], angle: f64) -> bool {
        existing
            .iter()
            .all(|&a| angular_difference(a, angle) >= self.minimum_angle)
    }

    fn within_maximum(&self, existing: &[f64], angle: f64) -> bool {
        existing
            .iter()
            .map(|&a| angular_difference(a, angle))
            .reduce(f64::min)
            .map_or(true, |closest| closest <= self.maximum_angle)
    }
}
