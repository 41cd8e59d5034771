// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # StreetNet Growth
//!
//! Procedural street growth on a [`NetworkGraph`](streetnet_topology::NetworkGraph).
//!
//! Starting from seed nodes with a growth budget, [`GrowthEngine`] extends
//! the network one generation at a time. Directions are sampled under the
//! junction angle limits of [`AngleControlledGrowth`], and every proposed
//! segment is checked by [`Snap`] so that new streets join nearby junctions
//! or split nearby streets instead of leaving slivers.
//!
//! ```
//! use streetnet_growth::{GrowthConfig, GrowthEngine};
//! use streetnet_topology::{NetworkGraph, Point2D};
//!
//! let config = GrowthConfig { iterations: 3, seed: 7, ..Default::default() };
//! let mut engine = GrowthEngine::new(config).unwrap();
//! let mut graph = NetworkGraph::new();
//! engine.seed_node(&mut graph, Point2D::new(0.0, 0.0));
//!
//! let report = engine.run(&mut graph).unwrap();
//! assert!(graph.node_count() > 1);
//! assert!(report.connections() > 0);
//! ```

pub mod angle;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod snap;

pub use angle::{AngleControlledGrowth, GrowthCandidate};
pub use config::GrowthConfig;
pub use engine::{GrowthEngine, GrowthReport};
pub use error::{Error, Result};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use snap::{Snap, SnapOutcome, SnapResult};
