// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for network entities.
//!
//! Insertion is idempotent under [`EPSILON`]: adding a point within tolerance
//! of an existing node returns that node, and adding an edge between two
//! already-connected nodes returns the existing edge untouched. Any change to
//! the edge set invalidates previously solved faces.

use crate::arena::*;
use crate::error::{Error, Result};
use crate::geometry::*;
use crate::keys::*;

impl NetworkGraph {
    /// Adds a node at `point`, or returns the node already within tolerance.
    ///
    /// New nodes get the next dense id, no growth budget and generation 0.
    pub fn add_node(&mut self, point: Point2D) -> NodeId {
        if let Some(existing) = self.find_node(&point) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(NetworkNode {
            id,
            location: point,
            growth_budget: 0,
            generation: 0,
            faces: Vec::new(),
        });
        self.adjacency.push(Vec::new());
        self.spatial.insert(id, &point);
        id
    }

    /// The lowest-id node within tolerance of `point`.
    pub fn find_node(&self, point: &Point2D) -> Option<NodeId> {
        self.spatial.find_near(&self.nodes, point, EPSILON)
    }

    /// Connects two existing nodes with a straight edge.
    ///
    /// Returns the existing edge if the nodes are already connected, in either
    /// order. Self loops are not rejected; callers must not create them.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId> {
        self.check_node(a)?;
        self.check_node(b)?;
        Ok(self.insert_edge(a, b, None))
    }

    /// Connects two existing nodes with an edge following `curve`.
    ///
    /// The curve may be given in either direction; it is stored oriented from
    /// `a` to `b`. A curve of exactly two points is stored as a plain edge.
    pub fn add_edge_with_curve(
        &mut self,
        a: NodeId,
        b: NodeId,
        curve: Vec<Point2D>,
    ) -> Result<EdgeId> {
        self.check_node(a)?;
        self.check_node(b)?;
        if curve.len() < 2 {
            return Err(Error::DegenerateCurve(curve.len()));
        }

        let mut curve = curve;
        let start = self.nodes[a.0].location;
        let first_to_start = curve[0].distance_to(&start);
        let last_to_start = curve[curve.len() - 1].distance_to(&start);
        if last_to_start < first_to_start {
            curve.reverse();
        }

        Ok(self.insert_edge(a, b, curve_or_none(curve)))
    }

    /// Adds the endpoints of `curve` as nodes and joins them with an edge
    /// following the curve.
    pub fn add_curve_edge(&mut self, curve: &[Point2D]) -> Result<EdgeId> {
        if curve.len() < 2 {
            return Err(Error::DegenerateCurve(curve.len()));
        }
        let a = self.add_node(curve[0]);
        let b = self.add_node(curve[curve.len() - 1]);
        self.add_edge_with_curve(a, b, curve.to_vec())
    }

    /// Splits `edge` at `point`, returning the node at the split.
    ///
    /// The edge is edited in place to run from its first stored endpoint to
    /// the new node, and one new edge is appended for the remainder. An
    /// underlying curve is cut at the point on it closest to `point`.
    /// Splitting at an existing endpoint changes nothing and returns that
    /// endpoint.
    pub fn split_edge(&mut self, edge: EdgeId, point: Point2D) -> Result<NodeId> {
        let original = self.edge(edge).ok_or(Error::EdgeNotFound(edge))?.clone();
        let (a, b) = original.nodes;

        let middle = self.add_node(point);
        if middle == a || middle == b {
            return Ok(middle);
        }

        let (first_curve, second_curve) = match &original.underlying_curve {
            Some(curve) => {
                let (first, second) = split_polyline(curve, &point);
                (curve_or_none(first), curve_or_none(second))
            }
            None => (None, None),
        };

        let first_exists = self.edge_between(a, middle).is_some();
        let second_exists = self.edge_between(middle, b).is_some();

        match (first_exists, second_exists) {
            (false, _) => {
                self.reconnect(edge, b, middle, first_curve);
                if !second_exists {
                    self.insert_edge(middle, b, second_curve);
                }
            }
            (true, false) => self.reconnect(edge, a, middle, second_curve),
            // Both halves are already present.
            (true, true) => {}
        }

        self.invalidate_faces();
        Ok(middle)
    }

    /// Builds a graph from arbitrary, possibly intersecting polylines.
    ///
    /// Every segment is cut at every point where another segment crosses or
    /// touches it, and all resulting points are unified through
    /// [`add_node`](Self::add_node). A single-point polyline becomes an
    /// isolated node.
    pub fn from_curve_network(polylines: &[Vec<Point2D>]) -> Self {
        let mut graph = Self::new();

        let segments: Vec<(Point2D, Point2D)> = polylines
            .iter()
            .flat_map(|polyline| polyline.windows(2).map(|w| (w[0], w[1])))
            .filter(|(a, b)| !a.nearly_equal(b))
            .collect();

        for polyline in polylines.iter().filter(|p| p.len() == 1) {
            graph.add_node(polyline[0]);
        }

        for (i, (a0, a1)) in segments.iter().enumerate() {
            let mut cuts = vec![0.0, 1.0];

            for (j, (b0, b1)) in segments.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(hit) = segment_intersection(a0, a1, b0, b1) {
                    cuts.push(hit.t);
                }
                // T-junctions and collinear overlaps
                for endpoint in [b0, b1] {
                    let (closest, t) = closest_point_on_segment(endpoint, a0, a1);
                    if closest.nearly_equal(endpoint) {
                        cuts.push(t);
                    }
                }
            }

            cuts.sort_by(f64::total_cmp);

            let mut previous: Option<NodeId> = None;
            for t in cuts {
                let node = graph.add_node(a0.lerp(a1, t));
                if let Some(prev) = previous {
                    if prev != node {
                        graph.insert_edge(prev, node, None);
                    }
                }
                previous = Some(node);
            }
        }

        graph
    }

    /// Builds a graph from a list of straight lines.
    pub fn from_lines(lines: &[(Point2D, Point2D)]) -> Self {
        let polylines: Vec<Vec<Point2D>> = lines.iter().map(|(a, b)| vec![*a, *b]).collect();
        Self::from_curve_network(&polylines)
    }

    // --- Internal helpers ---

    fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::NodeNotFound(id))
        }
    }

    /// Inserts an edge between two valid nodes, deduplicating on the
    /// endpoint pair.
    pub(crate) fn insert_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        underlying_curve: Option<Vec<Point2D>>,
    ) -> EdgeId {
        let key = pair_key(a, b);
        if let Some(&existing) = self.edge_lookup.get(&key) {
            return existing;
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(NetworkEdge {
            id,
            nodes: (a, b),
            underlying_curve,
            left_face: None,
            right_face: None,
        });
        self.adjacency[a.0].push(id);
        if a != b {
            self.adjacency[b.0].push(id);
        }
        self.edge_lookup.insert(key, id);
        self.invalidate_faces();
        id
    }

    /// Replaces endpoint `dropped` of `edge` with `added`. The replacement
    /// takes the dropped node's slot, so `underlying_curve` must already run
    /// between the resulting endpoints in stored order.
    fn reconnect(
        &mut self,
        edge: EdgeId,
        dropped: NodeId,
        added: NodeId,
        underlying_curve: Option<Vec<Point2D>>,
    ) {
        let (a, b) = self.edges[edge.0].nodes;
        let nodes = if b == dropped { (a, added) } else { (added, b) };

        self.edge_lookup.remove(&pair_key(a, b));
        self.adjacency[dropped.0].retain(|&e| e != edge);
        self.adjacency[added.0].push(edge);

        let e = &mut self.edges[edge.0];
        e.nodes = nodes;
        e.underlying_curve = underlying_curve;
        self.edge_lookup.insert(pair_key(nodes.0, nodes.1), edge);
    }

    /// Drops all traced faces and every face reference on edges and nodes.
    pub(crate) fn invalidate_faces(&mut self) {
        if !self.faces_solved && self.faces.is_empty() {
            return;
        }
        self.faces.clear();
        for edge in &mut self.edges {
            edge.left_face = None;
            edge.right_face = None;
        }
        for node in &mut self.nodes {
            node.faces.clear();
        }
        self.faces_solved = false;
    }
}

fn curve_or_none(curve: Vec<Point2D>) -> Option<Vec<Point2D>> {
    if curve.len() > 2 {
        Some(curve)
    } else {
        None
    }
}
