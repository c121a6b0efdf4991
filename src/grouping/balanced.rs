//! Balanced placement: equalize group average composite scores.

use super::board::Board;
use super::types::PlacementUnit;
use crate::roster::{Gender, IndividualId, Roster};
use crate::scoring::Scorer;

/// Places units so group averages stay as close as possible.
///
/// Pinned units go first, into their target unless that breaks a
/// separation constraint. Free units follow from the highest average
/// composite down, each into the smallest group that accepts it, choosing
/// among candidates the group whose average would end up lowest. Groups
/// within `tie_tolerance` of that lowest average are tied and resolved by
/// the smallest male/female imbalance after insertion.
pub(super) struct BalancedPlacer {
    tie_tolerance: f64,
}

impl BalancedPlacer {
    pub(super) fn new(tie_tolerance: f64) -> Self {
        Self { tie_tolerance }
    }

    pub(super) fn place(&self, board: &mut Board<'_>, units: &[PlacementUnit], scorer: &mut Scorer<'_>) {
        for unit in units.iter() {
            let Some(target) = unit.target else {
                continue;
            };
            if !board.violates(unit, target) {
                // pins outrank capacity
                board.force(unit, target);
                continue;
            }
            let viable: Vec<usize> = board
                .by_size()
                .into_iter()
                .filter(|&g| board.accepts(unit, g))
                .collect();
            match self.pick(&viable, unit, board, scorer) {
                Some(g) => board.place(unit, g),
                None => board.force(unit, target),
            }
        }

        let mut free: Vec<(f64, &PlacementUnit)> = units
            .iter()
            .filter(|u| !u.is_pinned())
            .map(|u| (scorer.mean_composite(&u.members), u))
            .collect();
        free.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, unit) in free {
            let smallest = (0..board.group_count())
                .map(|g| board.size(g))
                .min()
                .unwrap_or(0);
            let mut candidates: Vec<usize> = (0..board.group_count())
                .filter(|&g| board.size(g) == smallest && board.accepts(unit, g))
                .collect();
            if candidates.is_empty() {
                let by_size = board.by_size();
                candidates = by_size
                    .iter()
                    .copied()
                    .filter(|&g| !board.violates(unit, g))
                    .collect();
                if candidates.is_empty() {
                    candidates = by_size;
                }
            }
            let g = self.pick(&candidates, unit, board, scorer).unwrap_or(0);
            board.force(unit, g);
        }
    }

    /// Lowest post-insertion average wins; near-ties go to gender balance.
    ///
    /// Returns a group whenever `candidates` is non-empty, even when the
    /// averages are not finite.
    fn pick(
        &self,
        candidates: &[usize],
        unit: &PlacementUnit,
        board: &Board<'_>,
        scorer: &mut Scorer<'_>,
    ) -> Option<usize> {
        let averages: Vec<(usize, f64)> = candidates
            .iter()
            .map(|&g| {
                let avg = scorer.counted_mean_composite(board.members(g).iter().chain(&unit.members));
                (g, avg)
            })
            .collect();
        let lowest = averages
            .iter()
            .map(|(_, avg)| *avg)
            .min_by(f64::total_cmp)?;
        let tied: Vec<usize> = averages
            .iter()
            .filter(|(_, avg)| *avg == lowest || avg - lowest <= self.tie_tolerance)
            .map(|(g, _)| *g)
            .collect();
        if tied.len() <= 1 {
            return tied.first().or(candidates.first()).copied();
        }

        let roster = scorer.roster();
        let (unit_m, unit_f) = gender_counts(roster, &unit.members);
        let mut best: Option<(usize, usize)> = None;
        for g in tied {
            let (m, f) = gender_counts(roster, board.members(g));
            let imbalance = (m + unit_m).abs_diff(f + unit_f);
            if best.map_or(true, |(_, b)| imbalance < b) {
                best = Some((g, imbalance));
            }
        }
        best.map(|(g, _)| g)
    }
}

fn gender_counts(roster: &Roster, ids: &[IndividualId]) -> (usize, usize) {
    ids.iter()
        .filter_map(|id| roster.get(id).and_then(|ind| ind.gender))
        .fold((0, 0), |(m, f), g| match g {
            Gender::Male => (m + 1, f),
            Gender::Female => (m, f + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Criterion, Individual};
    use crate::scoring::ScoreCache;

    fn run(roster: &Roster, units: &[PlacementUnit], caps: Vec<usize>, apart: &[(IndividualId, IndividualId)]) -> Vec<Vec<IndividualId>> {
        let criteria = vec![Criterion::new("Reading")];
        let mut cache = ScoreCache::new();
        let mut scorer = Scorer::new(roster, &criteria, &mut cache);
        let mut board = Board::new(caps, apart);
        BalancedPlacer::new(0.25).place(&mut board, units, &mut scorer);
        let (groups, _) = board.finish(|i| i.to_string());
        groups.into_iter().map(|g| g.members).collect()
    }

    fn single(id: &str) -> PlacementUnit {
        PlacementUnit {
            members: vec![id.to_string()],
            target: None,
        }
    }

    #[test]
    fn test_four_readers_two_groups() {
        let roster = Roster::from_individuals(vec![
            Individual::new("a", "A", "A").with_score("Reading", 80.0),
            Individual::new("b", "B", "B").with_score("Reading", 40.0),
            Individual::new("c", "C", "C").with_score("Reading", 60.0),
            Individual::new("d", "D", "D").with_score("Reading", 20.0),
        ]);
        let units: Vec<PlacementUnit> = ["a", "b", "c", "d"].iter().map(|id| single(id)).collect();
        let groups = run(&roster, &units, vec![2, 2], &[]);
        assert_eq!(groups, vec![vec!["a", "d"], vec!["c", "b"]]);
    }

    #[test]
    fn test_gender_breaks_near_ties() {
        let roster = Roster::from_individuals(vec![
            Individual::new("m1", "A", "A")
                .with_score("Reading", 60.0)
                .with_gender(Gender::Male),
            Individual::new("f1", "B", "B")
                .with_score("Reading", 60.0)
                .with_gender(Gender::Female),
            Individual::new("m2", "C", "C")
                .with_score("Reading", 50.0)
                .with_gender(Gender::Male),
        ]);
        let units = vec![single("m1"), single("f1"), single("m2")];
        let groups = run(&roster, &units, vec![2, 2], &[]);
        // both groups would average 55; m2 goes where it evens out genders
        assert_eq!(groups[0], vec!["m1"]);
        assert_eq!(groups[1], vec!["f1", "m2"]);
    }

    #[test]
    fn test_pinned_unit_relocates_on_separation() {
        let roster = Roster::from_individuals(vec![
            Individual::new("a", "A", "A").with_score("Reading", 10.0),
            Individual::new("b", "B", "B").with_score("Reading", 10.0),
        ]);
        let apart = vec![("a".to_string(), "b".to_string())];
        let units = vec![
            PlacementUnit {
                members: vec!["a".into()],
                target: Some(0),
            },
            PlacementUnit {
                members: vec!["b".into()],
                target: Some(0),
            },
        ];
        let groups = run(&roster, &units, vec![1, 1], &apart);
        assert_eq!(groups, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_free_unit_avoids_separation() {
        let roster = Roster::from_individuals(vec![
            Individual::new("a", "A", "A").with_score("Reading", 90.0),
            Individual::new("b", "B", "B").with_score("Reading", 80.0),
            Individual::new("c", "C", "C").with_score("Reading", 70.0),
            Individual::new("d", "D", "D").with_score("Reading", 10.0),
        ]);
        let apart = vec![("b".to_string(), "c".to_string())];
        let units: Vec<PlacementUnit> = ["a", "b", "c", "d"].iter().map(|id| single(id)).collect();
        let groups = run(&roster, &units, vec![2, 2], &apart);
        // c would average lower next to b, but that group is off limits
        assert_eq!(groups, vec![vec!["a", "c"], vec!["b", "d"]]);
    }

    #[test]
    fn test_unbounded_average_still_placed() {
        let roster = Roster::from_individuals(vec![
            Individual::new("big1", "A", "A").with_score("Reading", f64::MAX),
            Individual::new("big2", "B", "B").with_score("Reading", f64::MAX),
            Individual::new("a", "C", "C").with_score("Reading", 10.0),
            Individual::new("c", "D", "D").with_score("Reading", 20.0),
        ]);
        // the cluster's mean overflows to infinity
        let units = vec![
            PlacementUnit {
                members: vec!["big1".into(), "big2".into()],
                target: None,
            },
            single("a"),
            single("c"),
        ];
        let groups = run(&roster, &units, vec![2, 2], &[]);
        assert_eq!(groups, vec![vec!["big1", "big2"], vec!["c", "a"]]);
    }
}
