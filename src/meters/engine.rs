//! Per-group deviation meters.

use std::collections::HashMap;

use super::types::{Meter, MeterLevel, MeterThresholds};
use crate::grouping::Group;
use crate::roster::{Criterion, IndividualId, Roster};
use crate::scoring::{roster_average, CriteriaSignature};

/// Computes one meter per enabled criterion for `group`.
///
/// `all_ids` is the roster-wide baseline. Excluded individuals count in
/// neither average, and a roster average of 0 is treated as 1 when the
/// deviation is turned into a percentage.
pub fn compute_meters(
    group: &Group,
    roster: &Roster,
    criteria: &[Criterion],
    all_ids: &[IndividualId],
    thresholds: &MeterThresholds,
) -> Vec<Meter> {
    criteria
        .iter()
        .filter(|c| c.enabled)
        .map(|c| {
            let average = roster_average(roster, &group.members, &c.label);
            let baseline = roster_average(roster, all_ids, &c.label);
            let deviation = average - baseline;
            let divisor = if baseline == 0.0 { 1.0 } else { baseline };
            let deviation_pct = deviation / divisor * 100.0;
            Meter {
                label: c.label.clone(),
                average,
                percent_of_max: (average / c.effective_max() * 100.0).clamp(0.0, 100.0),
                roster_average: baseline,
                deviation,
                deviation_pct,
                level: MeterLevel::classify(deviation, deviation_pct, thresholds),
            }
        })
        .collect()
}

/// Memoized meters, keyed by group id, criteria signature and the group's
/// ordered member list.
///
/// Entries do not track roster contents or thresholds; call
/// [`MeterCache::invalidate`] whenever either changes.
#[derive(Debug, Clone, Default)]
pub struct MeterCache {
    entries: HashMap<String, Vec<Meter>>,
}

impl MeterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meters for `group`, computed on first request.
    pub fn meters(
        &mut self,
        group: &Group,
        roster: &Roster,
        criteria: &[Criterion],
        all_ids: &[IndividualId],
        thresholds: &MeterThresholds,
    ) -> Vec<Meter> {
        let key = format!(
            "{}|{}|{}",
            group.id,
            CriteriaSignature::of(criteria).as_str(),
            group.members.join(",")
        );
        self.entries
            .entry(key)
            .or_insert_with(|| compute_meters(group, roster, criteria, all_ids, thresholds))
            .clone()
    }

    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(event = "meter_cache_invalidated", entries = self.entries.len());
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
