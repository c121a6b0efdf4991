//! Working state of one placement run.

use std::collections::{HashMap, HashSet};

use super::types::{Fallback, Group, PlacementUnit};
use crate::roster::IndividualId;

/// Group memberships under construction, with capacity and separation checks.
pub(super) struct Board<'c> {
    members: Vec<Vec<IndividualId>>,
    capacities: Vec<usize>,
    /// Keep-apart adjacency, both directions.
    apart: HashMap<&'c str, HashSet<&'c str>>,
    fallbacks: Vec<Fallback>,
}

impl<'c> Board<'c> {
    pub(super) fn new(capacities: Vec<usize>, apart: &'c [(IndividualId, IndividualId)]) -> Self {
        let mut adjacency: HashMap<&'c str, HashSet<&'c str>> = HashMap::new();
        for (a, b) in apart {
            adjacency.entry(a.as_str()).or_default().insert(b.as_str());
            adjacency.entry(b.as_str()).or_default().insert(a.as_str());
        }
        Self {
            members: vec![Vec::new(); capacities.len()],
            capacities,
            apart: adjacency,
            fallbacks: Vec::new(),
        }
    }

    pub(super) fn group_count(&self) -> usize {
        self.members.len()
    }

    pub(super) fn size(&self, group: usize) -> usize {
        self.members[group].len()
    }

    pub(super) fn capacity(&self, group: usize) -> usize {
        self.capacities[group]
    }

    pub(super) fn members(&self, group: usize) -> &[IndividualId] {
        &self.members[group]
    }

    /// Whether the unit fits without exceeding the group's capacity.
    pub(super) fn fits(&self, unit: &PlacementUnit, group: usize) -> bool {
        self.size(group) + unit.len() <= self.capacity(group)
    }

    /// First current member of `group` that must stay apart from the unit.
    pub(super) fn blocking_member(&self, unit: &PlacementUnit, group: usize) -> Option<&IndividualId> {
        self.members[group].iter().find(|x| {
            unit.members.iter().any(|u| {
                self.apart
                    .get(u.as_str())
                    .is_some_and(|peers| peers.contains(x.as_str()))
            })
        })
    }

    pub(super) fn violates(&self, unit: &PlacementUnit, group: usize) -> bool {
        self.blocking_member(unit, group).is_some()
    }

    /// Whether the unit can go into `group` with every constraint honored.
    pub(super) fn accepts(&self, unit: &PlacementUnit, group: usize) -> bool {
        self.fits(unit, group) && !self.violates(unit, group)
    }

    /// Group indices by ascending current size; ties keep index order.
    pub(super) fn by_size(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.group_count()).collect();
        order.sort_by_key(|&g| self.size(g));
        order
    }

    pub(super) fn place(&mut self, unit: &PlacementUnit, group: usize) {
        self.members[group].extend(unit.members.iter().cloned());
    }

    /// Places a unit unconditionally, recording any constraint it breaks.
    pub(super) fn force(&mut self, unit: &PlacementUnit, group: usize) {
        let over_capacity = !self.fits(unit, group);
        let separation_broken = self.violates(unit, group);
        if over_capacity || separation_broken {
            tracing::warn!(
                event = "forced_placement",
                group,
                members = unit.len(),
                pinned = unit.is_pinned(),
                over_capacity,
                separation_broken,
            );
            self.fallbacks.push(Fallback {
                members: unit.members.clone(),
                group,
                over_capacity,
                separation_broken,
            });
        }
        self.place(unit, group);
    }

    /// Finishes the run: drops repeated identifiers (first placement wins)
    /// and builds the output groups.
    pub(super) fn finish<F>(self, name_of: F) -> (Vec<Group>, Vec<Fallback>)
    where
        F: Fn(usize) -> String,
    {
        let mut seen: HashSet<IndividualId> = HashSet::new();
        let groups = self
            .members
            .into_iter()
            .zip(self.capacities)
            .enumerate()
            .map(|(i, (members, capacity))| {
                let mut group = Group::new(i, name_of(i), capacity);
                group.members = members
                    .into_iter()
                    .filter(|id| seen.insert(id.clone()))
                    .collect();
                group
            })
            .collect();
        (groups, self.fallbacks)
    }
}
