//! Group composition and member ordering for display.

use super::types::{GroupStats, MemberOrder};
use crate::roster::{Criterion, Gender, Individual, IndividualId, Roster};
use crate::scoring::{ScoreCache, Scorer};

/// Size and male/female counts of a member list. Individuals without a
/// gender count toward the size only.
pub fn group_stats(roster: &Roster, members: &[IndividualId]) -> GroupStats {
    let mut stats = GroupStats {
        size: members.len(),
        ..GroupStats::default()
    };
    for gender in members
        .iter()
        .filter_map(|id| roster.get(id).and_then(|ind| ind.gender))
    {
        match gender {
            Gender::Male => stats.male += 1,
            Gender::Female => stats.female += 1,
        }
    }
    stats
}

/// Reorders `members` in place. The sort is stable, and names compare
/// case-insensitively.
pub fn sort_members(
    members: &mut [IndividualId],
    order: MemberOrder,
    roster: &Roster,
    criteria: &[Criterion],
    cache: &mut ScoreCache,
) {
    match order {
        MemberOrder::CompositeHigh | MemberOrder::CompositeLow => {
            let mut scorer = Scorer::new(roster, criteria, cache);
            let mut keyed: Vec<(f64, IndividualId)> = members
                .iter()
                .map(|id| (scorer.composite(id), id.clone()))
                .collect();
            keyed.sort_by(|a, b| match order {
                MemberOrder::CompositeLow => a.0.total_cmp(&b.0),
                _ => b.0.total_cmp(&a.0),
            });
            for (slot, (_, id)) in members.iter_mut().zip(keyed) {
                *slot = id;
            }
        }
        MemberOrder::LastName => sort_by_name(members, roster, |ind| ind.last_name.clone()),
        MemberOrder::FirstName => sort_by_name(members, roster, |ind| ind.first_name.clone()),
        MemberOrder::FullName => sort_by_name(members, roster, |ind| ind.full_name()),
    }
}

fn sort_by_name<F>(members: &mut [IndividualId], roster: &Roster, name_of: F)
where
    F: Fn(&Individual) -> String,
{
    members.sort_by_cached_key(|id| {
        roster
            .get(id)
            .map(|ind| name_of(ind).to_lowercase())
            .unwrap_or_default()
    });
}
