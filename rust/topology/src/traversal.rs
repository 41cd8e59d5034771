// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods: rotational order around nodes and read-only egress of
//! the network for rendering and export.
//!
//! The face walk is driven by [`NetworkNode::next_edge`]: arriving at a node
//! along one edge, it turns to the first edge met when sweeping clockwise
//! from the direction pointing back along the arrival edge. Repeating that
//! choice keeps the traced face on the left of the walk.

use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::geometry::*;
use crate::keys::*;

// =============================================================================
// Rotational order
// =============================================================================

impl NetworkNode {
    /// Direction angles of every incident edge, as seen from this node, in
    /// adjacency order.
    pub fn angles(&self, graph: &NetworkGraph) -> Vec<f64> {
        graph
            .incident_edges(self.id)
            .iter()
            .filter_map(|&e| self.angle_along(graph, e))
            .collect()
    }

    /// Neighbouring nodes in adjacency order.
    pub fn neighbors(&self, graph: &NetworkGraph) -> Vec<NodeId> {
        graph
            .incident_edges(self.id)
            .iter()
            .filter_map(|&e| graph.edge(e).and_then(|edge| edge.other(self.id)))
            .collect()
    }

    /// Picks the edge that continues a face walk arriving here along
    /// `incoming`, with the direction that leaves this node.
    ///
    /// With `a` the angle back towards the node we arrived from, every other
    /// incident edge is ranked by the clockwise rotation from `a` to its own
    /// angle and the smallest rotation wins. Edges lying on top of the arrival
    /// direction are skipped; equal rotations keep the first in adjacency
    /// order. A node whose only way on is `incoming` sends the walk back along
    /// it.
    ///
    /// Returns `None` if `incoming` is not incident on this node.
    pub fn next_edge(&self, graph: &NetworkGraph, incoming: EdgeId) -> Option<(EdgeId, Direction)> {
        let back = self.angle_along(graph, incoming)?;

        let mut best: Option<(EdgeId, f64)> = None;
        for &candidate in graph.incident_edges(self.id) {
            if candidate == incoming {
                continue;
            }
            let Some(angle) = self.angle_along(graph, candidate) else {
                continue;
            };
            let delta = clockwise_delta(back, angle);
            if delta < EPSILON {
                continue;
            }
            if best.map_or(true, |(_, smallest)| delta < smallest) {
                best = Some((candidate, delta));
            }
        }

        let chosen = best.map_or(incoming, |(edge, _)| edge);
        let direction = graph.edge(chosen)?.direction_from(graph, self.id)?;
        Some((chosen, direction))
    }

    fn angle_along(&self, graph: &NetworkGraph, edge: EdgeId) -> Option<f64> {
        let other = graph.edge(edge)?.other(self.id)?;
        let target = graph.node_location(other)?;
        Some(self.location.angle_to(&target))
    }
}

// =============================================================================
// Egress
// =============================================================================

/// Everything attached to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAdjacency {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub faces: Vec<FaceId>,
}

impl NetworkGraph {
    /// Node locations in id order.
    pub fn node_points(&self) -> Vec<Point2D> {
        self.nodes.iter().map(NetworkNode::location).collect()
    }

    /// Straight endpoints of every edge, source first, in id order.
    pub fn edge_endpoints(&self) -> Vec<(Point2D, Point2D)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let (source, target) = edge.canonical(self);
                Some((self.node_location(source)?, self.node_location(target)?))
            })
            .collect()
    }

    /// Full geometry of every edge, oriented source to target.
    pub fn edge_curves(&self) -> Vec<Vec<Point2D>> {
        self.edges.iter().map(|edge| edge.curve(self)).collect()
    }

    /// Neighbours, incident edges and faces of a node.
    pub fn node_adjacency(&self, id: NodeId) -> Option<NodeAdjacency> {
        let node = self.node(id)?;
        Some(NodeAdjacency {
            nodes: node.neighbors(self),
            edges: self.incident_edges(id).to_vec(),
            faces: node.faces().to_vec(),
        })
    }

    /// Boundary loop of every traced face, in face id order.
    pub fn face_loops(&self) -> Vec<Vec<Point2D>> {
        self.faces.iter().map(|face| face.points(self)).collect()
    }

    /// Centroid of a traced face.
    pub fn face_centroid(&self, id: FaceId) -> Option<Point2D> {
        self.face(id)?.centroid(self)
    }

    /// Unsigned area of a traced face.
    pub fn face_area(&self, id: FaceId) -> Result<f64> {
        self.face(id)
            .map(|face| face.area(self))
            .ok_or(Error::FaceNotFound(id))
    }

    /// Loops of the anticlockwise faces only: the blocks of the network.
    pub fn block_loops(&self) -> Vec<Vec<Point2D>> {
        self.faces
            .iter()
            .filter(|face| face.is_anticlockwise(self))
            .map(|face| face.points(self))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// A centre node with arms to the east, north, west and south, added in
    /// that order.
    fn plus() -> (NetworkGraph, NodeId, Vec<EdgeId>) {
        let mut graph = NetworkGraph::new();
        let centre = graph.add_node(Point2D::new(0.0, 0.0));
        let arms = [(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)]
            .iter()
            .map(|&(x, y)| {
                let n = graph.add_node(Point2D::new(x, y));
                graph.add_edge(centre, n).unwrap()
            })
            .collect();
        (graph, centre, arms)
    }

    #[test]
    fn angles_follow_adjacency_order() {
        let (graph, centre, _) = plus();
        let angles = graph.node(centre).unwrap().angles(&graph);
        assert_eq!(angles.len(), 4);
        assert_relative_eq!(angles[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(angles[1], PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(angles[2], PI, epsilon = 1e-12);
        assert_relative_eq!(angles[3], -PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn next_edge_turns_to_the_first_clockwise_edge() {
        let (graph, centre, arms) = plus();
        let node = graph.node(centre).unwrap();

        // Arriving from the east, looking back east: clockwise from east is south.
        let (next, direction) = node.next_edge(&graph, arms[0]).unwrap();
        assert_eq!(next, arms[3]);
        // Leaving the centre towards (0, -10): the centre is the target.
        assert_eq!(direction, Direction::Backward);

        // Arriving from the north: clockwise from north is east.
        let (next, direction) = node.next_edge(&graph, arms[1]).unwrap();
        assert_eq!(next, arms[0]);
        assert_eq!(direction, Direction::Forward);
    }

    #[test]
    fn dead_end_sends_the_walk_back() {
        let (graph, _, arms) = plus();
        let tip = graph.find_node(&Point2D::new(10.0, 0.0)).unwrap();
        let (next, direction) = graph.node(tip).unwrap().next_edge(&graph, arms[0]).unwrap();
        assert_eq!(next, arms[0]);
        assert_eq!(direction, Direction::Backward);
    }

    #[test]
    fn next_edge_requires_an_incident_edge() {
        let (mut graph, _, arms) = plus();
        let lonely = graph.add_node(Point2D::new(50.0, 50.0));
        assert!(graph.node(lonely).unwrap().next_edge(&graph, arms[0]).is_none());
    }

    #[test]
    fn adjacency_egress_lists_neighbours() {
        let (graph, centre, arms) = plus();
        let adjacency = graph.node_adjacency(centre).unwrap();
        assert_eq!(adjacency.edges, arms);
        assert_eq!(
            adjacency.nodes,
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
        assert!(adjacency.faces.is_empty());
        assert!(graph.node_adjacency(NodeId(99)).is_none());
    }

    #[test]
    fn edge_endpoints_are_canonical() {
        let (graph, _, _) = plus();
        let endpoints = graph.edge_endpoints();
        // West arm: (-10, 0) sorts before the centre.
        assert_eq!(endpoints[2].0, Point2D::new(-10.0, 0.0));
        assert_eq!(endpoints[2].1, Point2D::new(0.0, 0.0));
        assert_eq!(graph.edge_curves().len(), 4);
        assert_eq!(graph.node_points().len(), 5);
    }

    #[test]
    fn face_queries_reject_unknown_faces() {
        let (mut graph, _, _) = plus();
        graph.solve_faces();
        assert!(matches!(
            graph.face_area(FaceId(99)),
            Err(Error::FaceNotFound(FaceId(99)))
        ));
        assert!(graph.face_centroid(FaceId(99)).is_none());
    }
}
