//! Portable session snapshot.

use crate::grouping::Group;
use crate::roster::{Criterion, Individual, Weight, DEFAULT_MAX};

/// Snapshot format tag.
pub const SNAPSHOT_VERSION: &str = "bcs-1";

/// A criterion as stored in a snapshot.
///
/// `enabled` is left out on export; when absent on import it is derived
/// from the weight (shown when the weight is positive).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriterionRecord {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Weight,
    #[cfg_attr(feature = "serde", serde(default = "default_max"))]
    pub max: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub enabled: Option<bool>,
}

#[cfg(feature = "serde")]
fn default_max() -> f64 {
    DEFAULT_MAX
}

impl CriterionRecord {
    /// Export form: the enabled flag is stripped.
    pub fn export(criterion: &Criterion) -> Self {
        Self {
            label: criterion.label.clone(),
            weight: criterion.weight,
            max: criterion.max,
            enabled: None,
        }
    }

    pub fn into_criterion(self) -> Criterion {
        let enabled = self
            .enabled
            .unwrap_or_else(|| self.weight.multiplier() > 0.0);
        Criterion {
            label: self.label,
            weight: self.weight,
            max: if self.max.is_finite() { self.max } else { DEFAULT_MAX },
            enabled,
        }
    }
}

/// Everything needed to restore a session.
///
/// Optional sections that are missing on import keep the current session's
/// value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub version: String,

    /// Requested group count. Non-positive values are ignored on import.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_count: i64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub criteria: Option<Vec<CriterionRecord>>,

    pub individuals: Vec<Individual>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub group_names: Option<Vec<Option<String>>>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Option<Vec<Group>>,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::roster::Gender;

    fn snapshot() -> SessionSnapshot {
        let mut group = Group::new(0, "Oak", 2);
        group.members = vec!["ann".into(), "bo".into()];
        SessionSnapshot {
            version: SNAPSHOT_VERSION.into(),
            group_count: 1,
            criteria: Some(vec![CriterionRecord::export(
                &Criterion::new("Reading").with_weight(Weight::High),
            )]),
            individuals: vec![
                Individual::new("ann", "Ann", "Lee")
                    .with_score("Reading", 80.0)
                    .with_gender(Gender::Female),
                Individual::new("bo", "Bo", "Kim").with_pin(0),
            ],
            group_names: Some(vec![Some("Oak".into())]),
            groups: Some(vec![group]),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let snap = snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_enabled_not_written() {
        let json = serde_json::to_value(snapshot()).unwrap();
        let criterion = &json["criteria"][0];
        assert!(criterion.get("enabled").is_none());
        assert_eq!(criterion["weight"], serde_json::json!(2.0));
        assert_eq!(json["individuals"][0]["gender"], serde_json::json!("F"));
    }

    #[test]
    fn test_sparse_document() {
        let json = r#"{
            "version": "bcs-1",
            "individuals": [{ "id": "ann", "first_name": "Ann", "scores": { "Reading": 3 } }],
            "criteria": [{ "label": "Reading", "weight": 0.5 }]
        }"#;
        let snap: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.group_count, 0);
        assert!(snap.groups.is_none());
        let criterion = snap.criteria.unwrap().remove(0).into_criterion();
        assert_eq!(criterion.weight, Weight::Low);
        assert!((criterion.max - DEFAULT_MAX).abs() < 1e-10);
        assert!(criterion.enabled);
        assert!((snap.individuals[0].raw_score("Reading") - 3.0).abs() < 1e-10);
    }
}
