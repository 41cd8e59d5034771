// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face solving and the block dual graph.
//!
//! [`NetworkGraph::solve_faces`] partitions the plane into faces by walking
//! both sides of every edge. [`NetworkGraph::dual_graph`] then builds a new
//! network where:
//! - **Nodes** = anticlockwise faces (city blocks), at their centroids
//! - **Edges** = street segments shared by two blocks

use rustc_hash::FxHashMap;

use crate::arena::NetworkGraph;
use crate::face::{FaceTracer, TraceStatus};
use crate::keys::*;

impl NetworkGraph {
    /// Traces every face of the network and returns how many were found.
    ///
    /// Previous faces and all face references are cleared first, so calling
    /// this twice gives the same result. Each edge side not yet claimed by a
    /// face seeds a walk (forward for the left side, backward for the right);
    /// walks that finish as well-formed loops are committed and claim every
    /// side they pass along.
    pub fn solve_faces(&mut self) -> usize {
        self.invalidate_faces();

        let mut discarded = 0usize;
        for index in 0..self.edges.len() {
            let edge = EdgeId(index);
            if self.edges[index].left_face.is_none() && !self.trace_face(edge, Direction::Forward) {
                discarded += 1;
            }
            if self.edges[index].right_face.is_none()
                && !self.trace_face(edge, Direction::Backward)
            {
                discarded += 1;
            }
        }

        self.faces_solved = true;
        tracing::debug!(
            faces = self.faces.len(),
            discarded = discarded,
            edges = self.edges.len(),
            "Solved faces"
        );
        self.faces.len()
    }

    /// Walks one face from `seed` and commits it if the walk closes cleanly.
    fn trace_face(&mut self, seed: EdgeId, direction: Direction) -> bool {
        let tracer = match FaceTracer::new(self, seed, direction) {
            Ok(tracer) => tracer.run(self),
            Err(_) => return false,
        };

        if tracer.status() != TraceStatus::Finished || !tracer.is_complete(self) {
            tracing::trace!(
                seed = %seed,
                direction = %direction,
                status = ?tracer.status(),
                nodes = tracer.nodes().len(),
                "Discarded face walk"
            );
            return false;
        }

        let id = FaceId(self.faces.len());
        for (&edge, &walked) in tracer.edges().iter().zip(tracer.directions()) {
            let e = &mut self.edges[edge.0];
            let side = match walked {
                Direction::Forward => &mut e.left_face,
                Direction::Backward => &mut e.right_face,
            };
            if side.is_none() {
                *side = Some(id);
            }
        }
        for &node in tracer.nodes() {
            let faces = &mut self.nodes[node.0].faces;
            if !faces.contains(&id) {
                faces.push(id);
            }
        }

        self.faces.push(tracer.into_face(id));
        true
    }

    /// Builds the block adjacency graph.
    ///
    /// Solves faces first if needed. Every anticlockwise face becomes a node
    /// at its centroid, in face order; two blocks are joined once for each
    /// street they share. Outer boundaries and self-adjacency (a block on
    /// both sides of its own dead end) contribute nothing.
    pub fn dual_graph(&mut self) -> NetworkGraph {
        if !self.faces_solved {
            self.solve_faces();
        }

        let mut dual = NetworkGraph::new();
        let mut block_nodes: FxHashMap<FaceId, NodeId> = FxHashMap::default();

        for face in &self.faces {
            if !face.is_anticlockwise(self) {
                continue;
            }
            if let Some(centroid) = face.centroid(self) {
                block_nodes.insert(face.id(), dual.add_node(centroid));
            }
        }

        for face in &self.faces {
            let Some(&from) = block_nodes.get(&face.id()) else {
                continue;
            };
            for (&edge, &walked) in face.edges().iter().zip(face.directions()) {
                let Some(other) = self
                    .edge(edge)
                    .and_then(|e| e.face_on_left_of(walked.reversed()))
                else {
                    continue;
                };
                if other == face.id() {
                    continue;
                }
                if let Some(&to) = block_nodes.get(&other) {
                    if to != from {
                        dual.insert_edge(from, to, None);
                    }
                }
            }
        }

        tracing::debug!(
            blocks = dual.node_count(),
            links = dual.edge_count(),
            "Built dual graph"
        );
        dual
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Point2D;
    use crate::NetworkGraph;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    /// Two unit squares side by side sharing the edge x = 10.
    fn two_blocks() -> NetworkGraph {
        NetworkGraph::from_curve_network(&[
            vec![p(0.0, 0.0), p(20.0, 0.0), p(20.0, 10.0), p(0.0, 10.0), p(0.0, 0.0)],
            vec![p(10.0, 0.0), p(10.0, 10.0)],
        ])
    }

    #[test]
    fn triangle_has_inner_and_outer_face() {
        let mut graph = NetworkGraph::from_lines(&[
            (p(0.0, 0.0), p(10.0, 0.0)),
            (p(10.0, 0.0), p(5.0, 8.0)),
            (p(5.0, 8.0), p(0.0, 0.0)),
        ]);
        assert_eq!(graph.solve_faces(), 2);

        for face in graph.faces() {
            assert_eq!(face.len(), 3);
            assert_eq!(face.edges().len(), 3);
        }
        let blocks = graph.faces().iter().filter(|f| f.is_anticlockwise(&graph)).count();
        assert_eq!(blocks, 1);

        for edge in graph.edges() {
            assert!(edge.left_face().is_some());
            assert!(edge.right_face().is_some());
            assert_ne!(edge.left_face(), edge.right_face());
        }
        for node in graph.nodes() {
            assert_eq!(node.faces().len(), 2);
        }
    }

    #[test]
    fn solving_twice_is_idempotent() {
        let mut graph = two_blocks();
        let first = graph.solve_faces();
        let loops = graph.face_loops();
        let second = graph.solve_faces();
        assert_eq!(first, second);
        assert_eq!(loops, graph.face_loops());
    }

    #[test]
    fn two_blocks_share_one_dual_edge() {
        let mut graph = two_blocks();
        let dual = graph.dual_graph();
        assert!(graph.faces_solved());
        assert_eq!(graph.face_count(), 3);

        assert_eq!(dual.node_count(), 2);
        assert_eq!(dual.edge_count(), 1);

        let mut xs: Vec<f64> = dual.node_points().iter().map(|c| c.x).collect();
        xs.sort_by(f64::total_cmp);
        assert_relative_eq!(xs[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(xs[1], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn open_tree_has_no_blocks_to_link() {
        let mut graph = NetworkGraph::from_lines(&[
            (p(0.0, 0.0), p(10.0, 0.0)),
            (p(10.0, 0.0), p(10.0, 10.0)),
        ]);
        let dual = graph.dual_graph();
        // The single face wraps the whole tree.
        assert_eq!(graph.face_count(), 1);
        assert_eq!(dual.edge_count(), 0);
    }
}
