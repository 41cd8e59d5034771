// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena storage for the street network.
//!
//! [`NetworkGraph`] is the single owner of every node, edge and face. Entities
//! refer to each other only by dense ids ([`NodeId`], [`EdgeId`], [`FaceId`]),
//! and every query that needs topology takes the graph as an explicit
//! parameter. Nodes are never deleted; edges are edited in place when one is
//! split; faces are derived and rebuilt wholesale by
//! [`solve_faces`](NetworkGraph::solve_faces).

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::face::NetworkFace;
use crate::geometry::{Point2D, EPSILON};
use crate::keys::*;
use crate::spatial::SpatialIndex;

/// Canonical ordering of two locations.
///
/// Locations within [`EPSILON`] compare equal; otherwise x decides unless the
/// x coordinates are within tolerance, in which case y decides.
pub fn compare_locations(a: &Point2D, b: &Point2D) -> Ordering {
    if a.nearly_equal(b) {
        Ordering::Equal
    } else if (a.x - b.x).abs() >= EPSILON {
        a.x.total_cmp(&b.x)
    } else {
        a.y.total_cmp(&b.y)
    }
}

/// A street junction or dead end.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    pub(crate) id: NodeId,
    pub(crate) location: Point2D,
    pub(crate) growth_budget: u32,
    pub(crate) generation: u32,
    /// Faces this node lies on, filled by face solving.
    pub(crate) faces: Vec<FaceId>,
}

impl NetworkNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn location(&self) -> Point2D {
        self.location
    }

    /// Remaining number of branches this node may spawn.
    pub fn growth_budget(&self) -> u32 {
        self.growth_budget
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// A node keeps growing while it has budget left.
    pub fn is_active(&self) -> bool {
        self.growth_budget > 0
    }

    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    pub fn set_growth_budget(&mut self, budget: u32) {
        self.growth_budget = budget;
    }

    /// Spends one unit of budget. Returns `false` if there was none left.
    pub fn consume_budget(&mut self) -> bool {
        if self.growth_budget == 0 {
            return false;
        }
        self.growth_budget -= 1;
        true
    }

    pub fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    /// Canonical order used to orient edges; see [`compare_locations`].
    pub fn canonical_cmp(&self, other: &NetworkNode) -> Ordering {
        compare_locations(&self.location, &other.location)
    }
}

/// Two nodes are the same node when their locations are within tolerance.
impl PartialEq for NetworkNode {
    fn eq(&self, other: &Self) -> bool {
        self.location.nearly_equal(&other.location)
    }
}

/// An undirected street segment between two nodes.
///
/// The endpoints are stored as an unordered pair. [`source`](Self::source)
/// and [`target`](Self::target) are recomputed from the node order on every
/// call, so an edge built from `(a, b)` and one built from `(b, a)` look the
/// same.
#[derive(Debug, Clone)]
pub struct NetworkEdge {
    pub(crate) id: EdgeId,
    pub(crate) nodes: (NodeId, NodeId),
    /// Polyline from `nodes.0` to `nodes.1` replacing the straight segment.
    pub(crate) underlying_curve: Option<Vec<Point2D>>,
    pub(crate) left_face: Option<FaceId>,
    pub(crate) right_face: Option<FaceId>,
}

impl NetworkEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// The endpoint pair as stored, in insertion order.
    pub fn nodes(&self) -> (NodeId, NodeId) {
        self.nodes
    }

    /// Endpoints ordered by the node total order: `(source, target)`.
    pub fn canonical(&self, graph: &NetworkGraph) -> (NodeId, NodeId) {
        let (a, b) = self.nodes;
        match (graph.node(a), graph.node(b)) {
            (Some(na), Some(nb)) => match na.canonical_cmp(nb) {
                Ordering::Greater => (b, a),
                Ordering::Less => (a, b),
                Ordering::Equal => (a.min(b), a.max(b)),
            },
            _ => (a, b),
        }
    }

    pub fn source(&self, graph: &NetworkGraph) -> NodeId {
        self.canonical(graph).0
    }

    pub fn target(&self, graph: &NetworkGraph) -> NodeId {
        self.canonical(graph).1
    }

    /// `(from, to)` when walking the edge in `direction`.
    pub fn oriented(&self, graph: &NetworkGraph, direction: Direction) -> (NodeId, NodeId) {
        let (source, target) = self.canonical(graph);
        match direction {
            Direction::Forward => (source, target),
            Direction::Backward => (target, source),
        }
    }

    /// Direction that leaves `from` along this edge, if `from` is an endpoint.
    pub fn direction_from(&self, graph: &NetworkGraph, from: NodeId) -> Option<Direction> {
        let (source, target) = self.canonical(graph);
        if from == source {
            Some(Direction::Forward)
        } else if from == target {
            Some(Direction::Backward)
        } else {
            None
        }
    }

    /// The endpoint opposite `node`.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.nodes.0 == node {
            Some(self.nodes.1)
        } else if self.nodes.1 == node {
            Some(self.nodes.0)
        } else {
            None
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.0 == node || self.nodes.1 == node
    }

    pub fn left_face(&self) -> Option<FaceId> {
        self.left_face
    }

    pub fn right_face(&self) -> Option<FaceId> {
        self.right_face
    }

    /// The face on the left of the edge when walked in `direction`.
    pub fn face_on_left_of(&self, direction: Direction) -> Option<FaceId> {
        match direction {
            Direction::Forward => self.left_face,
            Direction::Backward => self.right_face,
        }
    }

    pub fn underlying_curve(&self) -> Option<&[Point2D]> {
        self.underlying_curve.as_deref()
    }

    /// Geometry of the edge oriented source → target: the underlying curve
    /// when present, the straight segment otherwise.
    pub fn curve(&self, graph: &NetworkGraph) -> Vec<Point2D> {
        let (source, target) = self.canonical(graph);
        match &self.underlying_curve {
            Some(curve) => {
                let mut points = curve.clone();
                if source != self.nodes.0 {
                    points.reverse();
                }
                points
            }
            None => [source, target]
                .iter()
                .filter_map(|&n| graph.node(n).map(NetworkNode::location))
                .collect(),
        }
    }

    /// Same unordered endpoint pair.
    pub fn same_endpoints(&self, other: &NetworkEdge) -> bool {
        pair_key(self.nodes.0, self.nodes.1) == pair_key(other.nodes.0, other.nodes.1)
    }
}

/// Edge identity is structural: the same endpoints make the same edge.
impl PartialEq for NetworkEdge {
    fn eq(&self, other: &Self) -> bool {
        self.same_endpoints(other)
    }
}

/// Order-independent lookup key for an endpoint pair.
pub(crate) fn pair_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected planar street network with tolerance-aware identity.
///
/// # Example
///
/// ```
/// use streetnet_topology::{NetworkGraph, Point2D};
///
/// let mut graph = NetworkGraph::new();
/// let a = graph.add_node(Point2D::new(0.0, 0.0));
/// let b = graph.add_node(Point2D::new(10.0, 0.0));
/// let again = graph.add_node(Point2D::new(10.0, 0.00001));
///
/// assert_eq!(b, again);
/// assert_eq!(graph.node_count(), 2);
/// graph.add_edge(a, b).unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    pub(crate) nodes: Vec<NetworkNode>,
    pub(crate) edges: Vec<NetworkEdge>,
    pub(crate) faces: Vec<NetworkFace>,

    // Incident edges per node, in insertion order.
    pub(crate) adjacency: Vec<Vec<EdgeId>>,
    pub(crate) edge_lookup: FxHashMap<(NodeId, NodeId), EdgeId>,
    pub(crate) spatial: SpatialIndex,

    pub(crate) faces_solved: bool,
}

impl NetworkGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            adjacency: Vec::new(),
            edge_lookup: FxHashMap::default(),
            spatial: SpatialIndex::for_tolerance(EPSILON),
            faces_solved: false,
        }
    }

    // --- Node access ---

    pub fn node(&self, id: NodeId) -> Option<&NetworkNode> {
        self.nodes.get(id.0)
    }

    /// Mutable node access for budget bookkeeping. Location is immutable.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NetworkNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_location(&self, id: NodeId) -> Option<Point2D> {
        self.node(id).map(NetworkNode::location)
    }

    /// Ids of nodes with growth budget left, in id order.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.is_active())
            .map(NetworkNode::id)
            .collect()
    }

    // --- Edge access ---

    pub fn edge(&self, id: EdgeId) -> Option<&NetworkEdge> {
        self.edges.get(id.0)
    }

    pub fn edges(&self) -> &[NetworkEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge joining two nodes, in either order.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.edge_lookup.get(&pair_key(a, b)).copied()
    }

    /// Edges incident on a node, in the order they were attached.
    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        self.adjacency.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.incident_edges(node).len()
    }

    /// Returns `true` if an edge joins `a` and `b`.
    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    // --- Face access ---

    pub fn face(&self, id: FaceId) -> Option<&NetworkFace> {
        self.faces.get(id.0)
    }

    pub fn faces(&self) -> &[NetworkFace] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether [`solve_faces`](Self::solve_faces) has run since the last
    /// topology change.
    pub fn faces_solved(&self) -> bool {
        self.faces_solved
    }
}

impl Default for NetworkGraph {
    fn default() -> Self {
        Self::new()
    }
}
