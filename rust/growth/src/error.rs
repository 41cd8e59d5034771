// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for network growth.

/// Result type alias for growth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running growth.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid growth config: {0}")]
    InvalidConfig(String),

    /// The network rejected an operation.
    #[error("topology error: {0}")]
    Topology(#[from] streetnet_topology::Error),

    /// A config file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// A config file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
