// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! L-system growth of a street network.
//!
//! Each generation visits the nodes that had budget left when it started.
//! A node keeps proposing directions until its budget runs out or it has
//! used up its attempts. Every accepted direction is snapped against the
//! streets not touching the node and applied as a free branch, a join onto
//! an existing junction, or a split of an existing street.
//!
//! A run stops at the configured number of generations or at the wall-clock
//! deadline, whichever comes first. Work done before the deadline is kept.

use std::time::{Duration, Instant};

use serde::Serialize;

use streetnet_topology::{EdgeId, NetworkGraph, NodeId, Point2D};

use crate::angle::AngleControlledGrowth;
use crate::config::GrowthConfig;
use crate::error::Result;
use crate::rng::{RandomSource, SeededRandom};
use crate::snap::{Snap, SnapResult};

/// Summary of one growth run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowthReport {
    pub generations_completed: u32,
    /// New nodes grown without snapping.
    pub branches: usize,
    /// Joins onto existing junctions.
    pub ends_snaps: usize,
    /// Splits of existing streets.
    pub midway_snaps: usize,
    /// Directions refused by the angle limits.
    pub rejected: usize,
    /// Snaps found but not applied.
    pub refused_snaps: usize,
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl GrowthReport {
    /// Edges added to the network.
    pub fn connections(&self) -> usize {
        self.branches + self.ends_snaps + self.midway_snaps
    }
}

/// Grows a network generation by generation.
pub struct GrowthEngine<R: RandomSource = SeededRandom> {
    config: GrowthConfig,
    growth: AngleControlledGrowth,
    rng: R,
}

impl GrowthEngine<SeededRandom> {
    /// Creates an engine seeded from `config.seed`.
    pub fn new(config: GrowthConfig) -> Result<Self> {
        let rng = SeededRandom::new(config.seed);
        Self::with_random(config, rng)
    }
}

impl<R: RandomSource> GrowthEngine<R> {
    /// Creates an engine drawing from the given random source.
    pub fn with_random(config: GrowthConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            growth: AngleControlledGrowth::from_config(&config),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Adds a growing node at `point` with the configured budget.
    pub fn seed_node(&self, graph: &mut NetworkGraph, point: Point2D) -> NodeId {
        let id = graph.add_node(point);
        if let Some(node) = graph.node_mut(id) {
            node.set_growth_budget(self.config.growth_budget);
        }
        id
    }

    /// Runs up to `config.iterations` generations on `graph`.
    pub fn run(&mut self, graph: &mut NetworkGraph) -> Result<GrowthReport> {
        let started = Instant::now();
        let deadline = self.config.deadline();
        let mut report = GrowthReport::default();

        tracing::info!(
            iterations = self.config.iterations,
            seed = self.config.seed,
            nodes = graph.node_count(),
            active = graph.active_nodes().len(),
            "Starting growth"
        );

        'generations: for generation in 0..self.config.iterations {
            if started.elapsed() >= deadline {
                report.timed_out = true;
                break;
            }

            let active = graph.active_nodes();
            if active.is_empty() {
                tracing::debug!(generation, "No active nodes left");
                break;
            }

            for &id in &active {
                if started.elapsed() >= deadline {
                    report.timed_out = true;
                    break 'generations;
                }
                self.grow_node(graph, id, &mut report)?;
            }

            report.generations_completed += 1;
            tracing::debug!(
                generation,
                active = active.len(),
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generation complete"
            );
        }

        report.elapsed = started.elapsed();
        if report.timed_out {
            tracing::warn!(
                deadline_ms = self.config.deadline_ms,
                generations_completed = report.generations_completed,
                "Growth deadline reached, keeping partial network"
            );
        }
        tracing::info!(
            generations = report.generations_completed,
            branches = report.branches,
            ends_snaps = report.ends_snaps,
            midway_snaps = report.midway_snaps,
            rejected = report.rejected,
            refused_snaps = report.refused_snaps,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Growth complete"
        );

        Ok(report)
    }

    /// Spends a node's budget for this generation.
    fn grow_node(
        &mut self,
        graph: &mut NetworkGraph,
        id: NodeId,
        report: &mut GrowthReport,
    ) -> Result<()> {
        let mut attempts = 0;

        loop {
            let Some(node) = graph.node(id) else {
                return Ok(());
            };
            if !node.is_active() || attempts >= self.config.num_attempts {
                return Ok(());
            }

            let distance = self
                .rng
                .range(self.config.min_distance, self.config.max_distance);
            let candidate = self.growth.next(graph, node, distance, &mut self.rng);
            if !candidate.accepted {
                attempts += 1;
                report.rejected += 1;
                continue;
            }

            let source = node.location();
            let obstacles = nonadjacent_segments(graph, id);
            let segments: Vec<(Point2D, Point2D)> =
                obstacles.iter().map(|&(_, a, b)| (a, b)).collect();
            let outcome = Snap::new(source, candidate.point, self.config.snap_distance)
                .solve(&segments);

            tracing::trace!(
                node = %id,
                angle = candidate.angle,
                snap = ?outcome.result,
                snap_distance = outcome.distance,
                "Accepted direction"
            );

            match (outcome.result, outcome.obstacle) {
                (SnapResult::Ends, _) => self.join_junction(graph, id, outcome.point, report)?,
                (SnapResult::Midway, Some(index)) => {
                    let edge = obstacles[index].0;
                    self.split_street(graph, id, edge, outcome.point, report)?
                }
                _ => self.branch(graph, id, candidate.point, report)?,
            }

            if let Some(node) = graph.node_mut(id) {
                node.consume_budget();
            }
        }
    }

    /// Free growth: a new node at `point`.
    fn branch(
        &mut self,
        graph: &mut NetworkGraph,
        parent: NodeId,
        point: Point2D,
        report: &mut GrowthReport,
    ) -> Result<()> {
        let existing = graph.node_count();
        let child = graph.add_node(point);
        if child == parent {
            report.refused_snaps += 1;
            return Ok(());
        }
        graph.add_edge(parent, child)?;

        if child.index() >= existing {
            let generation = graph.node(parent).map_or(0, |n| n.generation()) + 1;
            if let Some(node) = graph.node_mut(child) {
                node.set_growth_budget(self.config.growth_budget);
                node.set_generation(generation);
            }
        }

        report.branches += 1;
        tracing::trace!(parent = %parent, child = %child, "Branch");
        Ok(())
    }

    /// Joins `parent` to the existing junction at `point`.
    fn join_junction(
        &mut self,
        graph: &mut NetworkGraph,
        parent: NodeId,
        point: Point2D,
        report: &mut GrowthReport,
    ) -> Result<()> {
        let Some(target) = graph.find_node(&point) else {
            report.refused_snaps += 1;
            return Ok(());
        };

        let acceptable = match (graph.node(parent), graph.node_location(target)) {
            (Some(node), Some(location)) => {
                target != parent
                    && !graph.are_adjacent(parent, target)
                    && node.location().distance_to(&location) >= self.config.snap_distance
                    && self
                        .growth
                        .post_generation_compliance(graph, node, &location)
            }
            _ => false,
        };
        if !acceptable {
            report.refused_snaps += 1;
            tracing::trace!(parent = %parent, target = %target, "Refused junction snap");
            return Ok(());
        }

        graph.add_edge(parent, target)?;
        if let Some(node) = graph.node_mut(target) {
            node.consume_budget();
        }

        report.ends_snaps += 1;
        tracing::trace!(parent = %parent, target = %target, "Joined junction");
        Ok(())
    }

    /// Splits `edge` at `point` and joins `parent` to the new junction.
    fn split_street(
        &mut self,
        graph: &mut NetworkGraph,
        parent: NodeId,
        edge: EdgeId,
        point: Point2D,
        report: &mut GrowthReport,
    ) -> Result<()> {
        let Some((budget, generation, location)) = graph
            .node(parent)
            .map(|n| (n.growth_budget(), n.generation(), n.location()))
        else {
            return Ok(());
        };
        if location.nearly_equal(&point) {
            report.refused_snaps += 1;
            return Ok(());
        }

        if let Some(found) = graph.find_node(&point) {
            if found == parent || graph.are_adjacent(parent, found) {
                report.refused_snaps += 1;
                tracing::trace!(parent = %parent, junction = %found, "Refused street split");
                return Ok(());
            }
        }

        let existing = graph.node_count();
        let junction = graph.split_edge(edge, point)?;

        if junction.index() >= existing {
            if let Some(node) = graph.node_mut(junction) {
                node.set_growth_budget(budget.saturating_sub(1));
                node.set_generation(generation + 1);
            }
        }
        graph.add_edge(parent, junction)?;

        report.midway_snaps += 1;
        tracing::trace!(parent = %parent, junction = %junction, edge = %edge, "Split street");
        Ok(())
    }
}

/// Straight segments of every edge not touching `node`, with their ids.
fn nonadjacent_segments(graph: &NetworkGraph, node: NodeId) -> Vec<(EdgeId, Point2D, Point2D)> {
    graph
        .edges()
        .iter()
        .filter(|edge| !edge.contains(node))
        .filter_map(|edge| {
            let (a, b) = edge.nodes();
            Some((edge.id(), graph.node_location(a)?, graph.node_location(b)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use std::f64::consts::PI;

    fn permissive() -> GrowthConfig {
        GrowthConfig {
            iterations: 1,
            min_distance: 10.0,
            max_distance: 10.0,
            snap_distance: 2.0,
            minimum_angle: 0.0,
            maximum_angle: PI,
            num_attempts: 5,
            growth_budget: 3,
            seed: 1,
            deadline_ms: 60_000,
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GrowthConfig {
            num_attempts: 0,
            ..permissive()
        };
        assert!(GrowthEngine::new(config).is_err());
    }

    #[test]
    fn free_branches_get_fresh_budget_and_next_generation() {
        // Directions east, north, west.
        let rng = ScriptedRandom::new([0.0, 0.25, 0.5]);
        let mut engine = GrowthEngine::with_random(permissive(), rng).unwrap();
        let mut graph = NetworkGraph::new();
        let seed = engine.seed_node(&mut graph, Point2D::new(0.0, 0.0));

        let report = engine.run(&mut graph).unwrap();

        assert_eq!(report.branches, 3);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.node(seed).unwrap().is_active());
        for child in graph.nodes().iter().skip(1) {
            assert_eq!(child.growth_budget(), 3);
            assert_eq!(child.generation(), 1);
        }
    }

    #[test]
    fn rejected_directions_count_as_attempts() {
        let config = GrowthConfig {
            minimum_angle: PI / 2.0,
            ..permissive()
        };
        // Always east.
        let rng = ScriptedRandom::new([0.0]);
        let mut engine = GrowthEngine::with_random(config, rng).unwrap();
        let mut graph = NetworkGraph::new();
        let seed = engine.seed_node(&mut graph, Point2D::new(0.0, 0.0));

        let report = engine.run(&mut graph).unwrap();

        assert_eq!(report.branches, 1);
        assert_eq!(report.rejected, 5);
        // Attempts ran out, budget remains.
        assert_eq!(graph.node(seed).unwrap().growth_budget(), 2);
    }

    #[test]
    fn deadline_of_zero_keeps_the_input() {
        let config = GrowthConfig {
            iterations: 4,
            deadline_ms: 0,
            ..permissive()
        };
        let mut engine = GrowthEngine::new(config).unwrap();
        let mut graph = NetworkGraph::new();
        engine.seed_node(&mut graph, Point2D::new(0.0, 0.0));

        let report = engine.run(&mut graph).unwrap();

        assert!(report.timed_out);
        assert_eq!(report.generations_completed, 0);
        assert_eq!(graph.node_count(), 1);
    }
}
