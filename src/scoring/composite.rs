//! Composite score of one individual.

use std::fmt::Write;

use crate::roster::{Criterion, Individual};

/// Weighted sum of normalized criterion values.
///
/// Each raw value `r` is normalized to `r / max * 100` and multiplied by the
/// criterion's weight. Disabled criteria still count. Excluded individuals
/// always score zero. Totals that overflow saturate at `±f64::MAX`.
///
/// # Examples
///
/// ```
/// use u_roster::roster::{Criterion, Individual, Weight};
/// use u_roster::scoring::composite_score;
///
/// let criteria = vec![
///     Criterion::new("Reading"),
///     Criterion::new("Level").with_max(26.0).with_weight(Weight::High),
/// ];
/// let ind = Individual::new("a", "Ann", "Lee")
///     .with_score("Reading", 80.0)
///     .with_score("Level", 13.0);
/// // 80 * 1.0 + 50 * 2.0
/// assert!((composite_score(&ind, &criteria) - 180.0).abs() < 1e-9);
/// ```
pub fn composite_score(individual: &Individual, criteria: &[Criterion]) -> f64 {
    if individual.excluded {
        return 0.0;
    }
    let total: f64 = criteria
        .iter()
        .map(|c| {
            let normalized = individual.raw_score(&c.label) / c.effective_max() * 100.0;
            normalized * c.weight.multiplier()
        })
        .sum();
    if total.is_nan() {
        0.0
    } else {
        total.clamp(-f64::MAX, f64::MAX)
    }
}

/// Fingerprint of a criteria list, used as a cache key.
///
/// Changes whenever any label, weight, max or enabled flag changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriteriaSignature(String);

impl CriteriaSignature {
    pub fn of(criteria: &[Criterion]) -> Self {
        let mut sig = String::new();
        for (i, c) in criteria.iter().enumerate() {
            if i > 0 {
                sig.push('|');
            }
            let _ = write!(
                sig,
                "{}:{}:{}:{}",
                c.label,
                c.weight.multiplier(),
                c.max,
                c.enabled
            );
        }
        Self(sig)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
