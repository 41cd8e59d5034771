// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Index types for the network arena.
//!
//! Nodes, edges and faces live in plain vectors owned by
//! [`NetworkGraph`](crate::NetworkGraph). Their ids are dense: an entity's id
//! is its position in the owning vector, assigned at insertion as the current
//! count. Entities never hold references to each other, only these ids.

use serde::{Deserialize, Serialize};

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the entity in the owning graph's storage.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

index_type!(
    /// Id of a junction in a network graph.
    NodeId,
    "node"
);
index_type!(
    /// Id of a street segment in a network graph.
    EdgeId,
    "edge"
);
index_type!(
    /// Id of a traced face in a network graph.
    FaceId,
    "face"
);

/// Direction in which an edge is walked, relative to its canonical
/// source → target orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Source to target.
    Forward,
    /// Target to source.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_kind() {
        assert_eq!(NodeId(3).to_string(), "node#3");
        assert_eq!(EdgeId(0).to_string(), "edge#0");
        assert_eq!(FaceId(12).to_string(), "face#12");
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(Direction::Forward.reversed(), Direction::Backward);
        assert_eq!(Direction::Backward.reversed().to_string(), "Forward");
    }
}
