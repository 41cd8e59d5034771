// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Faces: closed boundary walks through the network.
//!
//! A [`FaceTracer`] follows [`NetworkNode::next_edge`] from a seed edge until
//! the walk returns to its first node. A finished, well-formed walk is
//! committed to the graph as a [`NetworkFace`]. Faces whose turning angles sum
//! to one full anticlockwise turn are city blocks; the single clockwise face
//! of each connected component is its outer boundary.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::arena::NetworkGraph;
use crate::error::{Error, Result};
use crate::geometry::*;
use crate::keys::*;

/// Walks longer than this are abandoned.
pub const MAX_TRACE_STEPS: usize = 250;

/// Progress of a face walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStatus {
    Developing,
    /// The walk hit the step cap or a broken adjacency.
    Stopped,
    /// The walk returned to its first node.
    Finished,
}

// =============================================================================
// FaceTracer
// =============================================================================

/// An in-progress face walk.
///
/// Holds `nodes[i]`, the edge leaving it `edges[i]` and that edge's walk
/// direction `directions[i]`. While developing there is one more node than
/// edges; the closing edge back to the first node completes the triples.
#[derive(Debug, Clone)]
pub struct FaceTracer {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    directions: Vec<Direction>,
    status: TraceStatus,
    steps: usize,
}

impl FaceTracer {
    /// Starts a walk along `seed` in `direction`.
    pub fn new(graph: &NetworkGraph, seed: EdgeId, direction: Direction) -> Result<Self> {
        let edge = graph.edge(seed).ok_or(Error::EdgeNotFound(seed))?;
        let (from, to) = edge.oriented(graph, direction);
        Ok(Self {
            nodes: vec![from, to],
            edges: vec![seed],
            directions: vec![direction],
            status: TraceStatus::Developing,
            steps: 0,
        })
    }

    /// Advances the walk by one edge.
    pub fn step(&mut self, graph: &NetworkGraph) -> TraceStatus {
        if self.status != TraceStatus::Developing {
            return self.status;
        }
        if self.steps >= MAX_TRACE_STEPS {
            self.status = TraceStatus::Stopped;
            return self.status;
        }
        self.steps += 1;

        let (Some(&current), Some(&arrived_by)) = (self.nodes.last(), self.edges.last()) else {
            self.status = TraceStatus::Stopped;
            return self.status;
        };

        let next = graph
            .node(current)
            .and_then(|node| node.next_edge(graph, arrived_by))
            .and_then(|(edge, direction)| {
                let (_, to) = graph.edge(edge)?.oriented(graph, direction);
                Some((edge, direction, to))
            });

        let Some((edge, direction, to)) = next else {
            self.status = TraceStatus::Stopped;
            return self.status;
        };

        self.edges.push(edge);
        self.directions.push(direction);
        if Some(&to) == self.nodes.first() {
            self.status = TraceStatus::Finished;
        } else {
            self.nodes.push(to);
        }
        self.status
    }

    /// Steps until the walk is no longer developing.
    pub fn run(mut self, graph: &NetworkGraph) -> Self {
        while self.step(graph) == TraceStatus::Developing {}
        self
    }

    pub fn status(&self) -> TraceStatus {
        self.status
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Well-formed closed loop: at least three nodes, the last adjacent to
    /// the first, and one edge and direction per node.
    pub fn is_complete(&self, graph: &NetworkGraph) -> bool {
        let n = self.nodes.len();
        if n <= 2 || self.edges.len() != n || self.directions.len() != n {
            return false;
        }
        graph.are_adjacent(self.nodes[n - 1], self.nodes[0])
    }

    /// Freezes the walk into a face with the given id.
    pub(crate) fn into_face(self, id: FaceId) -> NetworkFace {
        NetworkFace {
            id,
            nodes: self.nodes,
            edges: self.edges,
            directions: self.directions,
            status: self.status,
        }
    }
}

// =============================================================================
// NetworkFace
// =============================================================================

/// A closed walk around one region of the plane, with the region on its left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFace {
    id: FaceId,
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    directions: Vec<Direction>,
    status: TraceStatus,
}

impl NetworkFace {
    pub fn id(&self) -> FaceId {
        self.id
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn status(&self) -> TraceStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(node, edge leaving it, direction)` triples in walk order.
    pub fn boundary(&self) -> impl Iterator<Item = (NodeId, EdgeId, Direction)> + '_ {
        self.nodes
            .iter()
            .zip(&self.edges)
            .zip(&self.directions)
            .map(|((&n, &e), &d)| (n, e, d))
    }

    /// Node locations in walk order. Nodes a spur visits twice appear twice.
    pub fn points(&self, graph: &NetworkGraph) -> Vec<Point2D> {
        self.nodes
            .iter()
            .filter_map(|&n| graph.node_location(n))
            .collect()
    }

    /// Signed turn at every node, in `(-PI, PI]`.
    ///
    /// The turn at node `i` is the change of heading from the edge arriving
    /// there to the edge leaving it. A full reversal, at the tip of a dead
    /// end, counts as `+PI`.
    pub fn angles_turned(&self, graph: &NetworkGraph) -> Vec<f64> {
        let points = self.points(graph);
        let n = points.len();
        if n < 2 {
            return Vec::new();
        }

        (0..n)
            .map(|i| {
                let prev = &points[(i + n - 1) % n];
                let current = &points[i];
                let next = &points[(i + 1) % n];
                let turn = signed_angle(current.angle_to(next) - prev.angle_to(current));
                if turn <= -PI + EPSILON {
                    PI
                } else {
                    turn
                }
            })
            .collect()
    }

    /// Sum of [`angles_turned`](Self::angles_turned).
    pub fn total_turning(&self, graph: &NetworkGraph) -> f64 {
        self.angles_turned(graph).iter().sum()
    }

    /// A block face: its walk makes one net anticlockwise turn.
    ///
    /// Dead ends inside a block add `2PI` each (out and back), so any total
    /// from `2PI` up to `4PI` counts, with [`EPSILON`] slack at both ends.
    pub fn is_anticlockwise(&self, graph: &NetworkGraph) -> bool {
        let total = self.total_turning(graph);
        total >= TAU - EPSILON && total <= 2.0 * TAU + EPSILON
    }

    /// Shoelace area of the node loop; positive for anticlockwise faces.
    pub fn signed_area(&self, graph: &NetworkGraph) -> f64 {
        polygon_signed_area(&self.points(graph))
    }

    pub fn area(&self, graph: &NetworkGraph) -> f64 {
        self.signed_area(graph).abs()
    }

    /// Area centroid, or the vertex mean for loops without area.
    pub fn centroid(&self, graph: &NetworkGraph) -> Option<Point2D> {
        polygon_centroid(&self.points(graph))
    }

    /// Same cyclic node sequence, walked the same way round.
    pub fn same_loop(&self, other: &NetworkFace) -> bool {
        let n = self.nodes.len();
        if n != other.nodes.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        (0..n)
            .filter(|&offset| other.nodes[offset] == self.nodes[0])
            .any(|offset| (0..n).all(|k| self.nodes[k] == other.nodes[(offset + k) % n]))
    }
}

impl PartialEq for NetworkFace {
    fn eq(&self, other: &Self) -> bool {
        self.same_loop(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> NetworkGraph {
        NetworkGraph::from_lines(&[
            (Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)),
            (Point2D::new(10.0, 0.0), Point2D::new(10.0, 10.0)),
            (Point2D::new(10.0, 10.0), Point2D::new(0.0, 10.0)),
            (Point2D::new(0.0, 10.0), Point2D::new(0.0, 0.0)),
        ])
    }

    #[test]
    fn forward_walk_traces_the_face_on_its_left() {
        let graph = square();
        // Edge 0 runs (0,0) -> (10,0); forward keeps the square on the left.
        let tracer = FaceTracer::new(&graph, EdgeId(0), Direction::Forward)
            .unwrap()
            .run(&graph);

        assert_eq!(tracer.status(), TraceStatus::Finished);
        assert!(tracer.is_complete(&graph));
        assert_eq!(tracer.nodes().len(), 4);
        assert_eq!(tracer.edges().len(), 4);

        let face = tracer.into_face(FaceId(0));
        assert!(face.is_anticlockwise(&graph));
        assert_relative_eq!(face.total_turning(&graph), TAU, epsilon = 1e-9);
        assert_relative_eq!(face.signed_area(&graph), 100.0, epsilon = 1e-9);
        let centroid = face.centroid(&graph).unwrap();
        assert_relative_eq!(centroid.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(centroid.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn backward_walk_traces_the_outer_boundary() {
        let graph = square();
        let face = FaceTracer::new(&graph, EdgeId(0), Direction::Backward)
            .unwrap()
            .run(&graph)
            .into_face(FaceId(1));

        assert!(!face.is_anticlockwise(&graph));
        assert_relative_eq!(face.total_turning(&graph), -TAU, epsilon = 1e-9);
        assert!(face.signed_area(&graph) < 0.0);
    }

    #[test]
    fn spur_walk_turns_around_at_the_tip() {
        let graph = NetworkGraph::from_lines(&[
            (Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)),
            (Point2D::new(10.0, 0.0), Point2D::new(20.0, 0.0)),
        ]);
        let tracer = FaceTracer::new(&graph, EdgeId(0), Direction::Forward)
            .unwrap()
            .run(&graph);

        assert_eq!(tracer.status(), TraceStatus::Finished);
        // (0,0) -> (10,0) -> (20,0) -> (10,0) -> back to (0,0)
        assert_eq!(tracer.nodes().len(), 4);
        assert!(tracer.is_complete(&graph));

        let face = tracer.into_face(FaceId(0));
        let turns = face.angles_turned(&graph);
        assert_relative_eq!(turns[0], PI, epsilon = 1e-9);
        assert_relative_eq!(turns[2], PI, epsilon = 1e-9);
        assert!(face.is_anticlockwise(&graph));
    }

    #[test]
    fn single_edge_walk_is_not_complete() {
        let graph = NetworkGraph::from_lines(&[(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0))]);
        let tracer = FaceTracer::new(&graph, EdgeId(0), Direction::Forward)
            .unwrap()
            .run(&graph);
        assert_eq!(tracer.status(), TraceStatus::Finished);
        assert!(!tracer.is_complete(&graph));
    }

    #[test]
    fn unknown_seed_is_an_error() {
        let graph = square();
        assert!(matches!(
            FaceTracer::new(&graph, EdgeId(9), Direction::Forward),
            Err(Error::EdgeNotFound(EdgeId(9)))
        ));
    }

    #[test]
    fn rotated_walks_are_equal() {
        let graph = square();
        let a = FaceTracer::new(&graph, EdgeId(0), Direction::Forward)
            .unwrap()
            .run(&graph)
            .into_face(FaceId(0));
        let b = FaceTracer::new(&graph, EdgeId(2), Direction::Backward)
            .unwrap()
            .run(&graph)
            .into_face(FaceId(1));
        let outer = FaceTracer::new(&graph, EdgeId(0), Direction::Backward)
            .unwrap()
            .run(&graph)
            .into_face(FaceId(2));

        assert_eq!(a, b);
        assert_ne!(a, outer);
    }
}
