//! Single-addition placement into existing groups.

use super::config::PlacementMode;
use super::types::Group;
use crate::roster::{Criterion, Roster};
use crate::scoring::{ScoreCache, Scorer};

/// Picks the group a newly added individual should join, leaving every
/// existing placement alone.
///
/// - Balanced: the group with the lowest average composite over its
///   non-excluded members; the first such group wins ties.
/// - Leveled: the group whose average on the ranking basis is closest to
///   the newcomer's own score. An empty group met before any average has
///   been computed is taken immediately; later empty groups are skipped.
///
/// Returns `None` when there are no groups.
pub fn place_new_individual(
    new_id: &str,
    groups: &[Group],
    roster: &Roster,
    criteria: &[Criterion],
    mode: &PlacementMode,
    cache: &mut ScoreCache,
) -> Option<usize> {
    let mut scorer = Scorer::new(roster, criteria, cache);
    let chosen = match mode {
        PlacementMode::Balanced => {
            let mut best: Option<(usize, f64)> = None;
            for (i, group) in groups.iter().enumerate() {
                let avg = scorer.counted_mean_composite(&group.members);
                if best.map_or(true, |(_, b)| avg < b) {
                    best = Some((i, avg));
                }
            }
            best.map(|(i, _)| i)
        }
        PlacementMode::Leveled(basis) => {
            let score = scorer.rank(new_id, basis);
            let mut best: Option<(usize, f64)> = None;
            for (i, group) in groups.iter().enumerate() {
                if group.is_empty() {
                    if best.is_none() {
                        best = Some((i, 0.0));
                        break;
                    }
                    continue;
                }
                let distance = (scorer.mean_rank(&group.members, basis) - score).abs();
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((i, distance));
                }
            }
            best.map(|(i, _)| i)
        }
    };
    tracing::debug!(event = "incremental_placement", id = new_id, group = ?chosen);
    chosen
}
