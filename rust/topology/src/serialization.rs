// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON export of a street network.
//!
//! The snapshot is a flat, read-only view for rendering and inspection:
//! plain integer ids, coordinates as `[x, y]` pairs, and every face with its
//! resolved boundary loop. There is no import path.

use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::error::{Error, Result};
use crate::geometry::Point2D;

/// Serializable view of a whole network.
#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub faces: Vec<FaceSnapshot>,
    pub faces_solved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub growth_budget: u32,
    pub generation: u32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub faces: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: usize,
    pub source: usize,
    pub target: usize,
    /// Polyline from source to target, present for curved edges only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_face: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_face: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaceSnapshot {
    pub id: usize,
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
    pub anticlockwise: bool,
    pub area: f64,
    #[serde(rename = "loop")]
    pub boundary: Vec<[f64; 2]>,
}

fn pair(p: &Point2D) -> [f64; 2] {
    [p.x, p.y]
}

impl NetworkGraph {
    /// Serializes the network to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = self.to_snapshot();
        serde_json::to_string_pretty(&snapshot).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot of the network.
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeSnapshot {
                id: n.id().index(),
                x: n.location().x,
                y: n.location().y,
                growth_budget: n.growth_budget(),
                generation: n.generation(),
                faces: n.faces().iter().map(|f| f.index()).collect(),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|e| {
                let (source, target) = e.canonical(self);
                EdgeSnapshot {
                    id: e.id().index(),
                    source: source.index(),
                    target: target.index(),
                    curve: e
                        .underlying_curve()
                        .map(|_| e.curve(self).iter().map(pair).collect()),
                    left_face: e.left_face().map(|f| f.index()),
                    right_face: e.right_face().map(|f| f.index()),
                }
            })
            .collect();

        let faces = self
            .faces
            .iter()
            .map(|f| FaceSnapshot {
                id: f.id().index(),
                nodes: f.nodes().iter().map(|n| n.index()).collect(),
                edges: f.edges().iter().map(|e| e.index()).collect(),
                anticlockwise: f.is_anticlockwise(self),
                area: f.area(self),
                boundary: f.points(self).iter().map(pair).collect(),
            })
            .collect();

        NetworkSnapshot {
            nodes,
            edges,
            faces,
            faces_solved: self.faces_solved,
        }
    }
}
