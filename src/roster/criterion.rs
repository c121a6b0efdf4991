//! Scoring criteria and their weights.

/// Importance of a criterion in the composite score.
///
/// The three named levels map to fixed multipliers; anything else is a
/// custom multiplier. A custom value equal to a named multiplier is
/// normalized to that level by [`Weight::from_multiplier`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub enum Weight {
    Low,
    Normal,
    High,
    Custom(f64),
}

const NAMED_WEIGHTS: [(Weight, &str, f64); 3] = [
    (Weight::Low, "Low", 0.5),
    (Weight::Normal, "Normal", 1.0),
    (Weight::High, "High", 2.0),
];

impl Weight {
    /// Multiplier applied to the normalized criterion value.
    pub fn multiplier(&self) -> f64 {
        match self {
            Weight::Custom(w) if w.is_finite() => *w,
            Weight::Custom(_) => 0.0,
            named => NAMED_WEIGHTS
                .iter()
                .find(|(w, _, _)| w == named)
                .map(|(_, _, m)| *m)
                .unwrap_or(0.0),
        }
    }

    /// Maps a multiplier back to a named level when one matches exactly.
    pub fn from_multiplier(multiplier: f64) -> Weight {
        NAMED_WEIGHTS
            .iter()
            .find(|(_, _, m)| *m == multiplier)
            .map(|(w, _, _)| *w)
            .unwrap_or(Weight::Custom(multiplier))
    }

    /// Display label: `Low`, `Normal`, `High` or `Custom`.
    pub fn label(&self) -> &'static str {
        NAMED_WEIGHTS
            .iter()
            .find(|(w, _, _)| w == self)
            .map(|(_, l, _)| *l)
            .unwrap_or("Custom")
    }

    /// Parses a named level (case-insensitive).
    pub fn from_label(label: &str) -> Option<Weight> {
        NAMED_WEIGHTS
            .iter()
            .find(|(_, l, _)| l.eq_ignore_ascii_case(label.trim()))
            .map(|(w, _, _)| *w)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::Normal
    }
}

impl From<f64> for Weight {
    fn from(multiplier: f64) -> Self {
        Weight::from_multiplier(multiplier)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.multiplier()
    }
}

/// Maximum used when a criterion has no positive maximum configured.
pub const DEFAULT_MAX: f64 = 100.0;

/// A named, weighted, bounded numeric attribute balanced across groups.
///
/// `enabled` only controls whether a meter is shown for the criterion;
/// every criterion contributes to the composite score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Criterion {
    pub label: String,
    pub weight: Weight,
    pub max: f64,
    pub enabled: bool,
}

impl Criterion {
    /// Creates a criterion with `Normal` weight, max 100, enabled.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            weight: Weight::Normal,
            max: DEFAULT_MAX,
            enabled: true,
        }
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `max` when positive, otherwise [`DEFAULT_MAX`].
    pub fn effective_max(&self) -> f64 {
        if self.max.is_finite() && self.max > 0.0 {
            self.max
        } else {
            DEFAULT_MAX
        }
    }
}
