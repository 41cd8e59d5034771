// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Growth configuration.
//!
//! A plain value passed to [`GrowthEngine`](crate::GrowthEngine); there is no
//! global state. Every field has a default, so a config file only needs the
//! values it changes.

use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Growth parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Number of generations to run.
    pub iterations: u32,
    /// Shortest new street segment.
    pub min_distance: f64,
    /// Longest new street segment.
    pub max_distance: f64,
    /// Snap radius around new growth.
    pub snap_distance: f64,
    /// Smallest allowed angle between streets at a junction, in radians.
    pub minimum_angle: f64,
    /// A new street must lie within this angle of an existing one, in radians.
    pub maximum_angle: f64,
    /// Directions tried per node and generation before giving up.
    pub num_attempts: u32,
    /// Branches each new node may spawn.
    pub growth_budget: u32,
    /// Random seed.
    pub seed: u64,
    /// Wall-clock limit for a whole run, in milliseconds.
    pub deadline_ms: u64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            iterations: 6,
            min_distance: 40.0,
            max_distance: 60.0,
            snap_distance: 15.0,
            minimum_angle: PI / 3.0,
            maximum_angle: PI,
            num_attempts: 10,
            growth_budget: 3,
            seed: 0,
            deadline_ms: 10_000,
        }
    }
}

impl GrowthConfig {
    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_distance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_distance must be positive, got {}",
                self.min_distance
            )));
        }
        if !(self.max_distance >= self.min_distance) {
            return Err(Error::InvalidConfig(format!(
                "max_distance ({}) must not be below min_distance ({})",
                self.max_distance, self.min_distance
            )));
        }
        if !(self.snap_distance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "snap_distance must not be negative, got {}",
                self.snap_distance
            )));
        }
        if !(0.0..=PI).contains(&self.minimum_angle)
            || !(0.0..=PI).contains(&self.maximum_angle)
            || self.minimum_angle > self.maximum_angle
        {
            return Err(Error::InvalidConfig(format!(
                "angles must satisfy 0 <= minimum_angle ({}) <= maximum_angle ({}) <= PI",
                self.minimum_angle, self.maximum_angle
            )));
        }
        if self.num_attempts == 0 {
            return Err(Error::InvalidConfig("num_attempts must be at least 1".into()));
        }
        Ok(())
    }

    /// Wall-clock limit as a duration.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
