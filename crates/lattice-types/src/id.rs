//! Handle types for registry classes and arena instances.
//!
//! Both handles are plain indices. Component classes live in a
//! `ComponentRegistry` vector and instances live in a `ComponentTree`
//! arena; the parent link of an instance is a non-owning back-reference
//! expressed as an `InstanceId`, so no reference counting is involved and
//! no cycles can form (trees are built strictly top-down).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a registered component class.
///
/// Only meaningful together with the registry that issued it.
///
/// # Example
///
/// ```
/// use lattice_types::ClassId;
///
/// let a = ClassId::from_index(0);
/// let b = ClassId::from_index(1);
/// assert_ne!(a, b);
/// assert_eq!(a.index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(usize);

impl ClassId {
    /// Creates a handle from a raw registry index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw registry index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Handle to a component instance in a `ComponentTree` arena.
///
/// Instances are never moved or dropped individually; the arena owns them
/// for its whole lifetime, which makes a copyable index the right shape
/// for both parent links and field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Creates a handle from a raw arena index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}
