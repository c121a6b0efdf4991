//! Symmetric keep-with / keep-apart relations between individuals.

use std::fmt;

use thiserror::Error;

use super::types::{IndividualId, Roster};

/// Kind of pairwise relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Both individuals must land in the same group.
    KeepWith,
    /// The individuals must never share a group.
    KeepApart,
}

impl RelationKind {
    /// The mutually exclusive relation.
    pub fn opposite(&self) -> RelationKind {
        match self {
            RelationKind::KeepWith => RelationKind::KeepApart,
            RelationKind::KeepApart => RelationKind::KeepWith,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::KeepWith => f.write_str("keep with"),
            RelationKind::KeepApart => f.write_str("separate from"),
        }
    }
}

/// Rejected relation edit. The roster is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    #[error("unknown individual: {0}")]
    UnknownIndividual(IndividualId),

    #[error("cannot relate {0} to itself")]
    SelfRelation(IndividualId),

    #[error("cannot set \"{from} {requested} {to}\": {to} is already set to {existing} {from}")]
    Conflict {
        from: IndividualId,
        to: IndividualId,
        requested: RelationKind,
        existing: RelationKind,
    },
}

impl Roster {
    /// Adds a symmetric relation between `from` and `to`.
    ///
    /// Fails with [`RelationError::Conflict`] when the opposite relation
    /// already exists on either side; both relation sets stay untouched.
    /// Adding a relation that already exists is a no-op.
    pub fn add_relation(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationKind,
    ) -> Result<(), RelationError> {
        self.check_pair(from, to)?;

        let opposite = kind.opposite();
        let conflicting = self.by_id[from].relations(opposite).contains(to)
            || self.by_id[to].relations(opposite).contains(from);
        if conflicting {
            return Err(RelationError::Conflict {
                from: from.to_string(),
                to: to.to_string(),
                requested: kind,
                existing: opposite,
            });
        }

        if let Some(a) = self.by_id.get_mut(from) {
            a.relations_mut(kind).insert(to.to_string());
        }
        if let Some(b) = self.by_id.get_mut(to) {
            b.relations_mut(kind).insert(from.to_string());
        }
        Ok(())
    }

    /// Removes a relation from both sides. Returns whether anything changed.
    pub fn remove_relation(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationKind,
    ) -> Result<bool, RelationError> {
        self.check_pair(from, to)?;

        let mut changed = false;
        if let Some(a) = self.by_id.get_mut(from) {
            changed |= a.relations_mut(kind).remove(to);
        }
        if let Some(b) = self.by_id.get_mut(to) {
            changed |= b.relations_mut(kind).remove(from);
        }
        Ok(changed)
    }

    /// Clears every relation of one kind for `id`, including the reciprocal
    /// entries. Returns the number of peers released.
    pub fn clear_relations(&mut self, id: &str, kind: RelationKind) -> Result<usize, RelationError> {
        let peers = match self.by_id.get_mut(id) {
            Some(individual) => std::mem::take(individual.relations_mut(kind)),
            None => return Err(RelationError::UnknownIndividual(id.to_string())),
        };
        for peer in self.by_id.values_mut() {
            peer.relations_mut(kind).remove(id);
        }
        Ok(peers.len())
    }

    /// The relation currently linking `a` and `b`, looking at both sides.
    pub fn relation_between(&self, a: &str, b: &str) -> Option<RelationKind> {
        let (x, y) = (self.by_id.get(a)?, self.by_id.get(b)?);
        [RelationKind::KeepWith, RelationKind::KeepApart]
            .into_iter()
            .find(|kind| x.relations(*kind).contains(b) || y.relations(*kind).contains(a))
    }

    fn check_pair(&self, from: &str, to: &str) -> Result<(), RelationError> {
        if from == to {
            return Err(RelationError::SelfRelation(from.to_string()));
        }
        for id in [from, to] {
            if !self.by_id.contains_key(id) {
                return Err(RelationError::UnknownIndividual(id.to_string()));
            }
        }
        Ok(())
    }
}
