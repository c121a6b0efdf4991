//! Full placement run.

use super::balanced::BalancedPlacer;
use super::board::Board;
use super::capacity::plan_capacities;
use super::config::{PlacementConfig, PlacementMode};
use super::leveled::LeveledPlacer;
use super::types::PlacementResult;
use super::units::build_units;
use crate::roster::{Criterion, IndividualId, RelationKind, Roster};
use crate::scoring::{ScoreCache, Scorer};

/// Pairwise constraints for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairConstraints {
    /// Must-stay-together pairs.
    pub together: Vec<(IndividualId, IndividualId)>,
    /// Must-stay-apart pairs.
    pub apart: Vec<(IndividualId, IndividualId)>,
}

impl PairConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects both relation kinds from the roster's relation sets.
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            together: roster.pairs(RelationKind::KeepWith),
            apart: roster.pairs(RelationKind::KeepApart),
        }
    }

    pub fn with_together(mut self, a: impl Into<IndividualId>, b: impl Into<IndividualId>) -> Self {
        self.together.push((a.into(), b.into()));
        self
    }

    pub fn with_apart(mut self, a: impl Into<IndividualId>, b: impl Into<IndividualId>) -> Self {
        self.apart.push((a.into(), b.into()));
        self
    }
}

/// Partitions a roster into groups.
pub struct GroupingRunner;

impl GroupingRunner {
    /// Places every individual of the roster into `config.group_count`
    /// groups.
    ///
    /// Never fails: infeasible pins and separations are resolved by forced
    /// placements, reported in [`PlacementResult::fallbacks`]. An empty
    /// roster or a zero group count yields an empty result. Pins are read
    /// from the roster; pins outside the group range are ignored.
    pub fn run(
        roster: &Roster,
        criteria: &[Criterion],
        constraints: &PairConstraints,
        config: &PlacementConfig,
        cache: &mut ScoreCache,
    ) -> PlacementResult {
        let ids = roster.ids();
        if ids.is_empty() || config.group_count == 0 {
            tracing::debug!(
                event = "placement_skipped",
                individuals = ids.len(),
                groups = config.group_count,
            );
            return PlacementResult::default();
        }

        let capacities = plan_capacities(ids.len(), config.group_count);
        let plan = build_units(
            ids,
            &constraints.together,
            |id| roster.get(id).and_then(|ind| ind.pin),
            config.group_count,
        );
        tracing::debug!(
            event = "placement_start",
            mode = ?config.mode,
            individuals = ids.len(),
            groups = config.group_count,
            units = plan.units.len(),
        );

        let mut board = Board::new(capacities.clone(), &constraints.apart);
        let mut scorer = Scorer::new(roster, criteria, cache);
        match &config.mode {
            PlacementMode::Balanced => {
                BalancedPlacer::new(config.tie_tolerance).place(&mut board, &plan.units, &mut scorer)
            }
            PlacementMode::Leveled(basis) => {
                LeveledPlacer::new(basis).place(&mut board, &plan.units, &mut scorer)
            }
        }

        let (groups, fallbacks) = board.finish(|i| config.group_name(i));
        tracing::debug!(
            event = "placement_end",
            groups = groups.len(),
            fallbacks = fallbacks.len(),
        );
        PlacementResult {
            groups,
            capacities,
            fallbacks,
            pins: plan.pins.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Gender, Individual};
    use crate::scoring::{roster_average, RankingBasis};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn reading_roster(values: &[f64]) -> Roster {
        Roster::from_individuals(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Individual::new(format!("s{i}"), "S", format!("{i}")).with_score("Reading", v)),
        )
    }

    fn synthetic(people: &[(f64, bool)]) -> Roster {
        Roster::from_individuals(people.iter().enumerate().map(|(i, &(score, male))| {
            Individual::new(format!("s{i}"), "S", format!("{i}"))
                .with_score("Reading", score)
                .with_gender(if male { Gender::Male } else { Gender::Female })
        }))
    }

    fn id(i: usize) -> IndividualId {
        format!("s{i}")
    }

    fn criteria() -> Vec<Criterion> {
        vec![Criterion::new("Reading")]
    }

    // ---- examples ----

    #[test]
    fn test_four_readers_equal_averages() {
        let roster = reading_roster(&[80.0, 40.0, 60.0, 20.0]);
        let config = PlacementConfig::default().with_group_count(2);
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );

        assert_eq!(result.capacities, vec![2, 2]);
        for group in &result.groups {
            assert_eq!(group.len(), 2);
            let avg = roster_average(&roster, &group.members, "Reading");
            assert!((avg - 50.0).abs() < 1e-10);
        }
        assert!(result.fallbacks.is_empty());
    }

    #[test]
    fn test_huge_score_is_placed() {
        let roster = Roster::from_individuals(vec![
            Individual::new("big", "B", "B").with_score("Reading", 1e307),
            Individual::new("a", "A", "A").with_score("Reading", 10.0),
            Individual::new("c", "C", "C").with_score("Reading", 20.0),
        ]);
        let criteria = vec![Criterion::new("Reading").with_max(1.0)];
        let config = PlacementConfig::default().with_group_count(2);
        let result = GroupingRunner::run(
            &roster,
            &criteria,
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );

        let mut placed: Vec<&str> = result
            .groups
            .iter()
            .flat_map(|g| g.members.iter().map(String::as_str))
            .collect();
        placed.sort_unstable();
        assert_eq!(placed, vec!["a", "big", "c"]);
        assert!(result.fallbacks.is_empty());
    }

    #[test]
    fn test_repeatable() {
        let roster = reading_roster(&[12.0, 55.0, 55.0, 90.0, 33.0, 71.0, 8.0, 64.0, 47.0]);
        let constraints = PairConstraints::new().with_together("s1", "s5").with_apart("s3", "s7");
        let config = PlacementConfig::default().with_group_count(3);
        let first = GroupingRunner::run(&roster, &criteria(), &constraints, &config, &mut ScoreCache::new());
        let second = GroupingRunner::run(&roster, &criteria(), &constraints, &config, &mut ScoreCache::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_roster_and_zero_groups() {
        let config = PlacementConfig::default();
        let empty = GroupingRunner::run(
            &Roster::new(),
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );
        assert!(empty.groups.is_empty());

        let roster = reading_roster(&[1.0, 2.0]);
        let none = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config.with_group_count(0),
            &mut ScoreCache::new(),
        );
        assert!(none.groups.is_empty());
        assert!(none.capacities.is_empty());
    }

    #[test]
    fn test_more_groups_than_individuals() {
        let roster = reading_roster(&[10.0, 20.0]);
        let config = PlacementConfig::default().with_group_count(4);
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );
        assert_eq!(result.groups.len(), 4);
        assert_eq!(result.capacities, vec![1, 1, 0, 0]);
        assert_eq!(result.groups.iter().map(|g| g.len()).sum::<usize>(), 2);
    }

    #[test]
    fn test_group_names_and_ids() {
        let roster = reading_roster(&[10.0, 20.0]);
        let config = PlacementConfig::default()
            .with_group_count(2)
            .with_group_name(1, "Cedar");
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );
        assert_eq!(result.groups[0].name, "Group 1");
        assert_eq!(result.groups[1].name, "Cedar");
        assert_eq!(result.groups[1].id, "Group 2");
    }

    #[test]
    fn test_pin_propagates_through_cluster() {
        let mut roster = reading_roster(&[10.0, 20.0, 30.0, 40.0]);
        roster.set_pin("s0", Some(1));
        roster
            .add_relation("s0", "s2", RelationKind::KeepWith)
            .unwrap();
        let config = PlacementConfig::default().with_group_count(2);
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::from_roster(&roster),
            &config,
            &mut ScoreCache::new(),
        );
        assert_eq!(result.group_of("s0"), Some(1));
        assert_eq!(result.group_of("s2"), Some(1));
        assert_eq!(result.pins.get("s2"), Some(&1));
    }

    #[test]
    fn test_infeasible_separation_is_reported() {
        // three mutually separated individuals, two groups
        let roster = reading_roster(&[10.0, 20.0, 30.0]);
        let constraints = PairConstraints::new()
            .with_apart("s0", "s1")
            .with_apart("s1", "s2")
            .with_apart("s0", "s2");
        let config = PlacementConfig::default().with_group_count(2);
        let result = GroupingRunner::run(&roster, &criteria(), &constraints, &config, &mut ScoreCache::new());
        assert_eq!(result.groups.iter().map(|g| g.len()).sum::<usize>(), 3);
        assert!(result.fallbacks.iter().any(|f| f.separation_broken));
    }

    #[test]
    fn test_forced_pin_overfills_group() {
        let mut roster = reading_roster(&[10.0, 20.0, 30.0, 40.0]);
        for i in 0..3 {
            roster.set_pin(&id(i), Some(0));
        }
        let config = PlacementConfig::default().with_group_count(2);
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );
        assert_eq!(result.groups[0].len(), 3);
        assert_eq!(result.groups[0].capacity, 2);
        assert_eq!(result.group_of("s3"), Some(1));
        assert!(result.fallbacks.iter().any(|f| f.over_capacity && !f.separation_broken));
    }

    #[test]
    fn test_leveled_mode_bands() {
        let roster = reading_roster(&[50.0, 90.0, 10.0, 70.0]);
        let config = PlacementConfig::default()
            .with_group_count(2)
            .with_mode(PlacementMode::Leveled(RankingBasis::Composite));
        let result = GroupingRunner::run(
            &roster,
            &criteria(),
            &PairConstraints::new(),
            &config,
            &mut ScoreCache::new(),
        );
        assert_eq!(result.groups[0].members, vec!["s1", "s3"]);
        assert_eq!(result.groups[1].members, vec!["s0", "s2"]);
    }

    // ---- properties ----

    fn people_strategy() -> impl Strategy<Value = Vec<(f64, bool)>> {
        prop::collection::vec((0.0f64..100.0, any::<bool>()), 1..40)
    }

    fn mode(leveled: bool) -> PlacementMode {
        if leveled {
            PlacementMode::Leveled(RankingBasis::Composite)
        } else {
            PlacementMode::Balanced
        }
    }

    fn run_all(roster: &Roster, constraints: &PairConstraints, groups: usize, leveled: bool) -> PlacementResult {
        let config = PlacementConfig::default()
            .with_group_count(groups)
            .with_mode(mode(leveled));
        GroupingRunner::run(roster, &criteria(), constraints, &config, &mut ScoreCache::new())
    }

    fn pairs(raw: &[(usize, usize)], n: usize) -> Vec<(IndividualId, IndividualId)> {
        raw.iter()
            .map(|&(a, b)| (a % n, b % n))
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (id(a), id(b)))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_every_id_placed_once(
            people in people_strategy(),
            groups in 1usize..7,
            raw_together in prop::collection::vec((0usize..40, 0usize..40), 0..8),
            raw_apart in prop::collection::vec((0usize..40, 0usize..40), 0..8),
            raw_pins in prop::collection::vec((0usize..40, 0usize..8), 0..6),
            leveled in any::<bool>(),
        ) {
            let n = people.len();
            let mut roster = synthetic(&people);
            for (i, g) in raw_pins {
                roster.set_pin(&id(i % n), Some(g));
            }
            let constraints = PairConstraints {
                together: pairs(&raw_together, n),
                apart: pairs(&raw_apart, n),
            };
            let result = run_all(&roster, &constraints, groups, leveled);

            prop_assert_eq!(result.groups.len(), groups);
            let placed: Vec<&IndividualId> = result.groups.iter().flat_map(|g| g.members.iter()).collect();
            prop_assert_eq!(placed.len(), n);
            let unique: HashSet<&IndividualId> = placed.iter().copied().collect();
            prop_assert_eq!(unique.len(), n);
            prop_assert!(roster.ids().iter().all(|i| unique.contains(i)));
        }

        #[test]
        fn prop_unconstrained_sizes_balanced(people in people_strategy(), groups in 1usize..7, leveled in any::<bool>()) {
            let roster = synthetic(&people);
            let result = run_all(&roster, &PairConstraints::new(), groups, leveled);
            let sizes: Vec<usize> = result.groups.iter().map(|g| g.len()).collect();
            let max = sizes.iter().copied().max().unwrap_or(0);
            let min = sizes.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
            prop_assert!(result.fallbacks.is_empty());
        }

        #[test]
        fn prop_pins_hold(
            people in people_strategy(),
            groups in 1usize..7,
            raw_pins in prop::collection::vec((0usize..40, 0usize..7), 0..10),
            leveled in any::<bool>(),
        ) {
            let n = people.len();
            let mut roster = synthetic(&people);
            for (i, g) in raw_pins {
                roster.set_pin(&id(i % n), Some(g % groups));
            }
            let result = run_all(&roster, &PairConstraints::new(), groups, leveled);
            for ind in roster.iter() {
                if let Some(pin) = ind.pin {
                    prop_assert_eq!(result.group_of(&ind.id), Some(pin));
                }
            }
        }

        #[test]
        fn prop_together_holds(
            people in people_strategy(),
            groups in 1usize..7,
            raw_together in prop::collection::vec((0usize..40, 0usize..40), 0..10),
            leveled in any::<bool>(),
        ) {
            let n = people.len();
            let roster = synthetic(&people);
            let constraints = PairConstraints {
                together: pairs(&raw_together, n),
                apart: Vec::new(),
            };
            let result = run_all(&roster, &constraints, groups, leveled);
            for (a, b) in &constraints.together {
                prop_assert_eq!(result.group_of(a), result.group_of(b));
            }
        }

        #[test]
        fn prop_apart_holds_or_is_reported(
            people in people_strategy(),
            groups in 1usize..7,
            raw_apart in prop::collection::vec((0usize..40, 0usize..40), 0..10),
            leveled in any::<bool>(),
        ) {
            let n = people.len();
            let roster = synthetic(&people);
            let constraints = PairConstraints {
                together: Vec::new(),
                apart: pairs(&raw_apart, n),
            };
            let result = run_all(&roster, &constraints, groups, leveled);
            let broken = result.fallbacks.iter().any(|f| f.separation_broken);
            for (a, b) in &constraints.apart {
                if result.group_of(a) == result.group_of(b) {
                    prop_assert!(broken);
                }
            }
        }
    }
}
