//! Memoized composite scores.

use std::collections::HashMap;

use super::composite::{composite_score, CriteriaSignature};
use crate::roster::{Criterion, IndividualId, Roster};

/// Composite scores keyed by criteria signature and identifier.
///
/// Owned by one session. Keys include the criteria signature, so a
/// criteria edit never returns a stale value; roster edits are not part of
/// the key, so callers must [`invalidate`](ScoreCache::invalidate) whenever
/// the roster changes.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    entries: HashMap<CriteriaSignature, HashMap<IndividualId, f64>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite score of `id`, computed on first use.
    ///
    /// Identifiers missing from the roster score zero.
    pub fn score(
        &mut self,
        roster: &Roster,
        id: &str,
        criteria: &[Criterion],
        signature: &CriteriaSignature,
    ) -> f64 {
        if let Some(v) = self.entries.get(signature).and_then(|m| m.get(id)) {
            return *v;
        }
        let v = roster
            .get(id)
            .map(|ind| composite_score(ind, criteria))
            .unwrap_or(0.0);
        self.entries
            .entry(signature.clone())
            .or_default()
            .insert(id.to_string(), v);
        v
    }

    /// Precomputes the score of every individual on the roster.
    #[cfg(not(feature = "parallel"))]
    pub fn warm(&mut self, roster: &Roster, criteria: &[Criterion]) {
        let signature = CriteriaSignature::of(criteria);
        for id in roster.ids() {
            self.score(roster, id, criteria, &signature);
        }
    }

    /// Precomputes the score of every individual on the roster.
    #[cfg(feature = "parallel")]
    pub fn warm(&mut self, roster: &Roster, criteria: &[Criterion]) {
        use rayon::prelude::*;

        let signature = CriteriaSignature::of(criteria);
        let scores: Vec<(IndividualId, f64)> = roster
            .ids()
            .par_iter()
            .filter_map(|id| {
                roster
                    .get(id)
                    .map(|ind| (id.clone(), composite_score(ind, criteria)))
            })
            .collect();
        self.entries.entry(signature).or_default().extend(scores);
    }

    /// Drops every cached score.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(event = "score_cache_invalidated", entries = self.len());
        }
        self.entries.clear();
    }

    /// Number of cached scores across all signatures.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
