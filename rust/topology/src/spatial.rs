// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hash for tolerance-based node lookup.
//!
//! `add_node` must behave exactly like a linear scan over all nodes that
//! returns the first node (lowest id) within tolerance. The grid narrows the
//! scan to the 3x3 cell neighbourhood of the query and then applies the same
//! rule, so the answer never depends on the grid layout.

use rustc_hash::FxHashMap;

use crate::arena::NetworkNode;
use crate::geometry::Point2D;
use crate::keys::NodeId;

/// A uniform grid of square cells over the plane.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<NodeId>>,
}

impl SpatialIndex {
    /// Creates an index with the given cell size.
    ///
    /// Queries are exact for any tolerance `<= cell_size`.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            grid: FxHashMap::default(),
        }
    }

    /// An index sized for queries at `tolerance`.
    pub fn for_tolerance(tolerance: f64) -> Self {
        Self::new(tolerance * 8.0)
    }

    pub fn insert(&mut self, id: NodeId, point: &Point2D) {
        let cell = self.cell_coords(point);
        self.grid.entry(cell).or_default().push(id);
    }

    /// Lowest-id node strictly within `tolerance` of `point`.
    pub fn find_near(
        &self,
        nodes: &[NetworkNode],
        point: &Point2D,
        tolerance: f64,
    ) -> Option<NodeId> {
        self.find_all_near(nodes, point, tolerance).into_iter().next()
    }

    /// All nodes strictly within `tolerance` of `point`, sorted by id.
    pub fn find_all_near(
        &self,
        nodes: &[NetworkNode],
        point: &Point2D,
        tolerance: f64,
    ) -> Vec<NodeId> {
        let (cx, cy) = self.cell_coords(point);
        let mut result = Vec::new();

        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) {
                    for &id in ids {
                        if let Some(node) = nodes.get(id.index()) {
                            if node.location().distance_to(point) < tolerance {
                                result.push(id);
                            }
                        }
                    }
                }
            }
        }

        result.sort_unstable();
        result
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    fn cell_coords(&self, point: &Point2D) -> (i64, i64) {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
        )
    }
}
