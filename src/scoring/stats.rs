//! Roster-wide baselines.

use crate::roster::{IndividualId, Roster};

/// Unweighted mean raw value of `label` over the non-excluded members of `ids`.
///
/// Identifiers missing from the roster are skipped. Returns zero when
/// nobody is left to average.
pub fn roster_average(roster: &Roster, ids: &[IndividualId], label: &str) -> f64 {
    let values: Vec<f64> = ids
        .iter()
        .filter_map(|id| roster.get(id))
        .filter(|ind| !ind.excluded)
        .map(|ind| ind.raw_score(label))
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
