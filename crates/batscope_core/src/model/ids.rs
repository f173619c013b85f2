//! Identifiers for recorded entities
//!
//! Vector ids come straight from the result file. Entity keys are derived by
//! the key resolver from module paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linkage key between a vector declaration and its sample lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VectorId(pub u32);

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical identity of an entity within a metric group
///
/// `Indexed(i)` is "the i-th agent" (a `uav[i]` style path segment). Paths
/// without a recognizable index all share `CatchAll`, which sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Indexed(u32),
    CatchAll,
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Indexed(i) => write!(f, "[{i}]"),
            EntityKey::CatchAll => write!(f, "*"),
        }
    }
}
