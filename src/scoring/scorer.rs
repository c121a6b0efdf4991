//! Score lookups bound to one roster, one criteria list and one cache.

use super::cache::ScoreCache;
use super::composite::CriteriaSignature;
use crate::roster::{Criterion, IndividualId, Roster};

/// What leveled placement ranks individuals by.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RankingBasis {
    /// The weighted composite score.
    #[default]
    Composite,
    /// The raw value of one named criterion.
    Criterion(String),
}

impl RankingBasis {
    /// `"Composite"` selects the composite; any other label a criterion.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("composite") {
            RankingBasis::Composite
        } else {
            RankingBasis::Criterion(label.to_string())
        }
    }
}

/// Scoring context for one placement call.
///
/// Computes the criteria signature once and routes composite lookups
/// through the session's [`ScoreCache`].
pub struct Scorer<'a> {
    roster: &'a Roster,
    criteria: &'a [Criterion],
    signature: CriteriaSignature,
    cache: &'a mut ScoreCache,
}

impl<'a> Scorer<'a> {
    pub fn new(roster: &'a Roster, criteria: &'a [Criterion], cache: &'a mut ScoreCache) -> Self {
        Self {
            roster,
            criteria,
            signature: CriteriaSignature::of(criteria),
            cache,
        }
    }

    pub fn roster(&self) -> &'a Roster {
        self.roster
    }

    pub fn composite(&mut self, id: &str) -> f64 {
        self.cache
            .score(self.roster, id, self.criteria, &self.signature)
    }

    /// Score of `id` on the given ranking basis.
    pub fn rank(&mut self, id: &str, basis: &RankingBasis) -> f64 {
        match basis {
            RankingBasis::Composite => self.composite(id),
            RankingBasis::Criterion(label) => self
                .roster
                .get(id)
                .map(|ind| ind.raw_score(label))
                .unwrap_or(0.0),
        }
    }

    /// Whether `id` counts toward averages (known and not excluded).
    pub fn is_counted(&self, id: &str) -> bool {
        self.roster.get(id).is_some_and(|ind| !ind.excluded)
    }

    /// Mean composite over all of `ids`; excluded members pull it down as zeros.
    pub fn mean_composite<'b, I>(&mut self, ids: I) -> f64
    where
        I: IntoIterator<Item = &'b IndividualId>,
    {
        self.mean_rank(ids, &RankingBasis::Composite)
    }

    /// Mean composite over the counted members of `ids`; zero if none count.
    pub fn counted_mean_composite<'b, I>(&mut self, ids: I) -> f64
    where
        I: IntoIterator<Item = &'b IndividualId>,
    {
        let (mut total, mut n) = (0.0, 0usize);
        for id in ids {
            if self.is_counted(id) {
                total += self.composite(id);
                n += 1;
            }
        }
        if n == 0 {
            0.0
        } else {
            total / n as f64
        }
    }

    /// Mean ranking score over all of `ids`; zero for an empty set.
    pub fn mean_rank<'b, I>(&mut self, ids: I, basis: &RankingBasis) -> f64
    where
        I: IntoIterator<Item = &'b IndividualId>,
    {
        let (mut total, mut n) = (0.0, 0usize);
        for id in ids {
            total += self.rank(id, basis);
            n += 1;
        }
        if n == 0 {
            0.0
        } else {
            total / n as f64
        }
    }
}
