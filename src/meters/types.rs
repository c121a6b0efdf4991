//! Meter and display statistic types.

/// Qualitative band of a group's deviation from the roster average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeterLevel {
    FarBelow,
    Below,
    Balanced,
    Above,
}

impl MeterLevel {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            MeterLevel::FarBelow => "Far Below Average",
            MeterLevel::Below => "Below Average",
            MeterLevel::Balanced => "Balanced",
            MeterLevel::Above => "Above Average",
        }
    }

    /// Classifies a signed deviation and its percentage of the roster
    /// average.
    pub fn classify(deviation: f64, deviation_pct: f64, thresholds: &MeterThresholds) -> Self {
        if deviation < 0.0 {
            if deviation_pct <= -thresholds.far_below {
                MeterLevel::FarBelow
            } else if deviation_pct <= -thresholds.below {
                MeterLevel::Below
            } else {
                MeterLevel::Balanced
            }
        } else if deviation > 0.0 && deviation_pct >= thresholds.above {
            MeterLevel::Above
        } else {
            MeterLevel::Balanced
        }
    }
}

/// Percentage thresholds separating the meter levels.
///
/// Deviations are expressed as a percentage of the roster average.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterThresholds {
    /// At or beyond this many percent below: far below.
    pub far_below: f64,
    /// At or beyond this many percent below (short of `far_below`): below.
    pub below: f64,
    /// At or beyond this many percent above: above.
    pub above: f64,
}

impl Default for MeterThresholds {
    fn default() -> Self {
        Self {
            far_below: 15.0,
            below: 10.0,
            above: 10.0,
        }
    }
}

impl MeterThresholds {
    pub fn with_far_below(mut self, pct: f64) -> Self {
        self.far_below = pct;
        self
    }

    pub fn with_below(mut self, pct: f64) -> Self {
        self.below = pct;
        self
    }

    pub fn with_above(mut self, pct: f64) -> Self {
        self.above = pct;
        self
    }

    /// Validates the thresholds.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("far_below", self.far_below),
            ("below", self.below),
            ("above", self.above),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be a non-negative percentage"));
            }
        }
        if self.far_below < self.below {
            return Err("far_below must be at least below".into());
        }
        Ok(())
    }
}

/// One group's standing on one criterion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    /// Criterion label.
    pub label: String,

    /// Mean raw value over the group's non-excluded members.
    pub average: f64,

    /// `average` as a percentage of the criterion maximum, clamped to 0–100.
    pub percent_of_max: f64,

    /// Mean raw value over the whole roster (non-excluded only).
    pub roster_average: f64,

    /// `average - roster_average`.
    pub deviation: f64,

    /// `deviation` as a percentage of the roster average (1 when that is 0).
    pub deviation_pct: f64,

    pub level: MeterLevel,
}

/// Size and gender composition of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupStats {
    pub size: usize,
    pub male: usize,
    pub female: usize,
}

/// Display order for a group's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberOrder {
    /// Composite score, highest first.
    #[default]
    CompositeHigh,
    /// Composite score, lowest first.
    CompositeLow,
    LastName,
    FirstName,
    FullName,
}
