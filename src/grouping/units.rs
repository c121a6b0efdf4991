//! Constraint grouping: keep-with clusters and pins to placement units.

use std::collections::HashMap;

use super::types::PlacementUnit;
use crate::roster::IndividualId;

/// Disjoint-set forest over dense indices, built fresh for each call.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Placement units plus the pins in effect after propagation.
#[derive(Debug, Clone, Default)]
pub struct UnitPlan {
    pub units: Vec<PlacementUnit>,
    /// Effective pin of every pinned identifier, including members that
    /// inherited the pin of their keep-with cluster.
    pub pins: HashMap<IndividualId, usize>,
}

/// Builds the placement units for one run.
///
/// Keep-with pairs are merged into connected components. A component with
/// one distinct pin becomes a single unit targeting that group, and its
/// unpinned members inherit the pin. A component with several distinct
/// pins is split: one unit per pin, plus one free unit for the unpinned
/// rest. This is the only case where keep-with is broken. Pins outside
/// `0..group_count` are ignored, as are pairs naming unknown identifiers.
///
/// Units come out in the order their first member appears in `ids`, and
/// members keep that order too, so the result is deterministic.
pub fn build_units<F>(
    ids: &[IndividualId],
    together: &[(IndividualId, IndividualId)],
    pin_of: F,
    group_count: usize,
) -> UnitPlan
where
    F: Fn(&str) -> Option<usize>,
{
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut forest = UnionFind::new(ids.len());
    for (a, b) in together {
        if let (Some(&ia), Some(&ib)) = (index.get(a.as_str()), index.get(b.as_str())) {
            forest.union(ia, ib);
        }
    }

    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<&IndividualId>> = Vec::new();
    for (i, id) in ids.iter().enumerate() {
        let root = forest.find(i);
        let c = *component_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[c].push(id);
    }

    let mut plan = UnitPlan::default();
    for component in components {
        // buckets keyed by pin, in first-seen order
        let mut buckets: Vec<(Option<usize>, Vec<IndividualId>)> = Vec::new();
        for &id in &component {
            let pin = pin_of(id.as_str()).filter(|&p| p < group_count);
            match buckets.iter_mut().find(|(p, _)| *p == pin) {
                Some((_, members)) => members.push(id.clone()),
                None => buckets.push((pin, vec![id.clone()])),
            }
        }

        let targets: Vec<usize> = buckets.iter().filter_map(|(p, _)| *p).collect();
        match targets.as_slice() {
            [] => plan.units.push(PlacementUnit {
                members: component.into_iter().cloned().collect(),
                target: None,
            }),
            [target] => {
                let members: Vec<IndividualId> = component.into_iter().cloned().collect();
                for id in &members {
                    plan.pins.insert(id.clone(), *target);
                }
                plan.units.push(PlacementUnit {
                    members,
                    target: Some(*target),
                });
            }
            _ => {
                tracing::debug!(
                    event = "keep_with_split",
                    pins = targets.len(),
                    members = component.len(),
                );
                let mut free = None;
                for (pin, members) in buckets {
                    match pin {
                        Some(t) => {
                            for id in &members {
                                plan.pins.insert(id.clone(), t);
                            }
                            plan.units.push(PlacementUnit {
                                members,
                                target: Some(t),
                            });
                        }
                        None => free = Some(members),
                    }
                }
                if let Some(members) = free {
                    plan.units.push(PlacementUnit {
                        members,
                        target: None,
                    });
                }
            }
        }
    }
    plan
}
