//! Individuals and the ordered roster that holds them.

use std::collections::{BTreeSet, HashMap};

use super::relations::RelationKind;

/// Identifier of one individual on the roster.
pub type IndividualId = String;

/// Optional gender tag, used only as a placement tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    #[cfg_attr(feature = "serde", serde(rename = "M"))]
    Male,
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Female,
}

impl Gender {
    /// Parses a gender code (`M`/`F`, `male`/`female`, any case).
    ///
    /// Anything else yields `None`.
    pub fn parse(code: &str) -> Option<Gender> {
        match code.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            _ => None,
        }
    }

    /// Single-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// One person on the roster.
///
/// `keep_with` and `keep_apart` are symmetric relations: edit them through
/// [`Roster::add_relation`] and friends so both sides stay in step.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Individual {
    pub id: IndividualId,
    pub first_name: String,
    pub last_name: String,
    /// Unrecognized codes read as no gender.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::gender"))]
    pub gender: Option<Gender>,
    /// Raw value per criterion label. Missing labels count as zero, and so
    /// do values that do not read as a number.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lenient::scores"))]
    pub scores: HashMap<String, f64>,
    /// Excluded individuals score zero and are left out of averages.
    pub excluded: bool,
    /// Required group index, if any.
    pub pin: Option<usize>,
    pub keep_with: BTreeSet<IndividualId>,
    pub keep_apart: BTreeSet<IndividualId>,
    pub tags: Vec<String>,
    pub notes: String,
    pub previous_group: String,
}

impl Individual {
    /// Creates an individual with no scores and no constraints.
    pub fn new(
        id: impl Into<IndividualId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_score(mut self, label: impl Into<String>, value: f64) -> Self {
        self.scores.insert(label.into(), value);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_pin(mut self, group: usize) -> Self {
        self.pin = Some(group);
        self
    }

    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Raw value for `label`; absent or non-finite values read as zero.
    pub fn raw_score(&self, label: &str) -> f64 {
        match self.scores.get(label) {
            Some(v) if v.is_finite() => *v,
            _ => 0.0,
        }
    }

    /// The relation set of the given kind.
    pub fn relations(&self, kind: RelationKind) -> &BTreeSet<IndividualId> {
        match kind {
            RelationKind::KeepWith => &self.keep_with,
            RelationKind::KeepApart => &self.keep_apart,
        }
    }

    pub(super) fn relations_mut(&mut self, kind: RelationKind) -> &mut BTreeSet<IndividualId> {
        match kind {
            RelationKind::KeepWith => &mut self.keep_with,
            RelationKind::KeepApart => &mut self.keep_apart,
        }
    }
}

/// The full set of individuals, in a fixed iteration order.
///
/// Placement results depend on this order, never on hash-map iteration.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub(super) order: Vec<IndividualId>,
    pub(super) by_id: HashMap<IndividualId, Individual>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster; later duplicates of an identifier replace earlier ones.
    pub fn from_individuals<I: IntoIterator<Item = Individual>>(individuals: I) -> Self {
        let mut roster = Self::new();
        for individual in individuals {
            roster.insert(individual);
        }
        roster
    }

    /// Inserts or replaces an individual.
    ///
    /// A replaced individual keeps its position in the order. Returns `true`
    /// when the identifier was new.
    pub fn insert(&mut self, individual: Individual) -> bool {
        let id = individual.id.clone();
        let is_new = self.by_id.insert(id.clone(), individual).is_none();
        if is_new {
            self.order.push(id);
        }
        is_new
    }

    /// Removes an individual and every relation that points at it,
    /// including one-sided entries the removed individual does not list.
    pub fn remove(&mut self, id: &str) -> Option<Individual> {
        let removed = self.by_id.remove(id)?;
        self.order.retain(|x| x != id);
        for peer in self.by_id.values_mut() {
            peer.keep_with.remove(id);
            peer.keep_apart.remove(id);
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Individual> {
        self.by_id.get(id)
    }

    /// Mutable access for score, name and flag edits.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Individual> {
        self.by_id.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Identifiers in roster order.
    pub fn ids(&self) -> &[IndividualId] {
        &self.order
    }

    /// Individuals in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sets or clears the pin of one individual. Returns `false` if unknown.
    pub fn set_pin(&mut self, id: &str, pin: Option<usize>) -> bool {
        match self.by_id.get_mut(id) {
            Some(individual) => {
                individual.pin = pin;
                true
            }
            None => false,
        }
    }

    /// Every `(individual, peer)` pair of the given relation, in roster order.
    ///
    /// Symmetric relations show up once from each side.
    pub fn pairs(&self, kind: RelationKind) -> Vec<(IndividualId, IndividualId)> {
        self.iter()
            .flat_map(|ind| {
                ind.relations(kind)
                    .iter()
                    .map(move |peer| (ind.id.clone(), peer.clone()))
            })
            .collect()
    }

    /// Returns a free identifier built from `base`.
    ///
    /// `base` itself when unused, otherwise `base2`, `base3`, ...
    /// An empty base falls back to `fallback`.
    pub fn unique_id(&self, base: &str, fallback: &str) -> IndividualId {
        let base = if base.is_empty() { fallback } else { base };
        let mut candidate = base.to_string();
        let mut n = 1;
        while self.contains(&candidate) {
            n += 1;
            candidate = format!("{base}{n}");
        }
        candidate
    }
}

/// Forgiving readers for hand-edited or foreign documents.
#[cfg(feature = "serde")]
mod lenient {
    use std::collections::HashMap;

    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    use super::Gender;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    impl Loose {
        fn number(self) -> f64 {
            let v = match self {
                Loose::Number(v) => v,
                Loose::Text(s) => s.trim().parse().unwrap_or(0.0),
                Loose::Other(_) => 0.0,
            };
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
    }

    pub(super) fn scores<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<HashMap<String, Loose>> = Option::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(label, v)| (label, v.number()))
            .collect())
    }

    pub(super) fn gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(code) => Gender::parse(&code),
            _ => None,
        })
    }
}
