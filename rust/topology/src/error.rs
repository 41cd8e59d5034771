// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for network operations.
//!
//! Geometric degeneracies (coincident points, zero-length candidates) are
//! absorbed by the tolerance rules and never surface here. These variants
//! only report ids that do not exist in the graph or malformed input.

use crate::keys::{EdgeId, FaceId, NodeId};

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during network operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Node id not found in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge id not found in the graph.
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Face id not found in the graph.
    #[error("face not found: {0}")]
    FaceNotFound(FaceId),

    /// An underlying curve needs at least two points.
    #[error("curve must have at least two points, got {0}")]
    DegenerateCurve(usize),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
