//! Groups, placement units and placement results.

use std::collections::BTreeMap;

use crate::roster::IndividualId;

/// One output group.
///
/// Member order is display-only. `capacity` is the intended size; pins and
/// separation conflicts can push a group past it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<IndividualId>,
    pub capacity: usize,
}

impl Group {
    /// Empty group number `index` (zero-based); the id is `Group {index + 1}`.
    pub fn new(index: usize, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: default_group_name(index),
            name: name.into(),
            members: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

/// `Group 1`, `Group 2`, ...
pub fn default_group_name(index: usize) -> String {
    format!("Group {}", index + 1)
}

/// An indivisible set of individuals placed together.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementUnit {
    pub members: Vec<IndividualId>,
    /// Required group index, if the unit is pinned.
    pub target: Option<usize>,
}

impl PlacementUnit {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_pinned(&self) -> bool {
        self.target.is_some()
    }
}

/// A unit that had to be forced into a group that breaks its capacity or
/// a separation constraint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fallback {
    pub members: Vec<IndividualId>,
    pub group: usize,
    pub over_capacity: bool,
    pub separation_broken: bool,
}

/// Output of a full placement run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementResult {
    pub groups: Vec<Group>,
    pub capacities: Vec<usize>,
    /// Forced placements, in the order they happened. Empty when every
    /// constraint could be honored.
    pub fallbacks: Vec<Fallback>,
    /// Effective pin of every pinned individual, including those that
    /// inherited a pin from their keep-with cluster.
    pub pins: BTreeMap<IndividualId, usize>,
}

impl PlacementResult {
    /// Index of the group holding `id`.
    pub fn group_of(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(id))
    }
}
