// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # StreetNet Topology
//!
//! Planar street network graph for procedural city generation.
//!
//! A [`NetworkGraph`] owns every junction ([`NetworkNode`]), street segment
//! ([`NetworkEdge`]) and traced region ([`NetworkFace`]) in dense arenas
//! addressed by [`NodeId`], [`EdgeId`] and [`FaceId`]. Identity is
//! tolerance-aware: points within [`EPSILON`] are the same node, and an edge
//! is its unordered endpoint pair.
//!
//! Once a network is built, [`NetworkGraph::solve_faces`] walks both sides of
//! every edge to find the faces of the planar subdivision, and
//! [`NetworkGraph::dual_graph`] links the resulting city blocks.

pub mod arena;
pub mod construction;
pub mod error;
pub mod face;
pub mod geometry;
pub mod graph;
pub mod keys;
pub mod serialization;
pub mod spatial;
pub mod traversal;

pub use arena::{NetworkEdge, NetworkGraph, NetworkNode};
pub use error::{Error, Result};
pub use face::{FaceTracer, NetworkFace, TraceStatus, MAX_TRACE_STEPS};
pub use geometry::{Point2D, EPSILON};
pub use keys::{Direction, EdgeId, FaceId, NodeId};
pub use serialization::NetworkSnapshot;
pub use traversal::NodeAdjacency;
