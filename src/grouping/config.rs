//! Placement configuration.

use super::types::default_group_name;
use crate::scoring::RankingBasis;

/// Placement strategy.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementMode {
    /// Keep group average composite scores as close as possible.
    #[default]
    Balanced,

    /// Fill groups in order from the highest-ranked units down, producing
    /// separated bands (group 1 highest).
    Leveled(RankingBasis),
}

/// Configuration for a placement run.
///
/// # Examples
///
/// ```
/// use u_roster::grouping::{PlacementConfig, PlacementMode};
/// use u_roster::scoring::RankingBasis;
///
/// let config = PlacementConfig::default()
///     .with_group_count(4)
///     .with_mode(PlacementMode::Leveled(RankingBasis::Composite))
///     .with_group_name(0, "Oak");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.group_name(0), "Oak");
/// assert_eq!(config.group_name(1), "Group 2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Number of groups to create.
    pub group_count: usize,

    /// Balanced or leveled placement.
    pub mode: PlacementMode,

    /// Display name overrides by group index. `None` or blank keeps the
    /// default name.
    pub group_names: Vec<Option<String>>,

    /// Balanced mode: candidate groups whose post-insertion average is
    /// within this distance of the lowest are tied and go to the gender
    /// tie-break.
    pub tie_tolerance: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            group_count: 6,
            mode: PlacementMode::Balanced,
            group_names: Vec::new(),
            tie_tolerance: 0.25,
        }
    }
}

impl PlacementConfig {
    pub fn with_group_count(mut self, n: usize) -> Self {
        self.group_count = n;
        self
    }

    pub fn with_mode(mut self, mode: PlacementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_group_names(mut self, names: Vec<Option<String>>) -> Self {
        self.group_names = names;
        self
    }

    pub fn with_group_name(mut self, index: usize, name: impl Into<String>) -> Self {
        if self.group_names.len() <= index {
            self.group_names.resize(index + 1, None);
        }
        self.group_names[index] = Some(name.into());
        self
    }

    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    /// Display name of group `index`.
    pub fn group_name(&self, index: usize) -> String {
        match self.group_names.get(index) {
            Some(Some(name)) if !name.trim().is_empty() => name.clone(),
            _ => default_group_name(index),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.group_count == 0 {
            return Err("group_count must be at least 1".into());
        }
        if !(self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0) {
            return Err("tie_tolerance must be non-negative".into());
        }
        if let PlacementMode::Leveled(RankingBasis::Criterion(label)) = &self.mode {
            if label.trim().is_empty() {
                return Err("leveled ranking criterion must have a label".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlacementConfig::default();
        assert_eq!(config.group_count, 6);
        assert_eq!(config.mode, PlacementMode::Balanced);
        assert!((config.tie_tolerance - 0.25).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_group_names() {
        let config = PlacementConfig::default()
            .with_group_name(2, "Maple")
            .with_group_name(0, "  ");
        assert_eq!(config.group_name(0), "Group 1");
        assert_eq!(config.group_name(1), "Group 2");
        assert_eq!(config.group_name(2), "Maple");
        assert_eq!(config.group_name(9), "Group 10");
    }

    #[test]
    fn test_validate() {
        assert!(PlacementConfig::default()
            .with_group_count(0)
            .validate()
            .is_err());
        assert!(PlacementConfig::default()
            .with_tie_tolerance(-1.0)
            .validate()
            .is_err());
        assert!(PlacementConfig::default()
            .with_mode(PlacementMode::Leveled(RankingBasis::Criterion(" ".into())))
            .validate()
            .is_err());
    }
}
