//! The session: one loaded roster, its criteria, its groups and caches.

use super::error::SessionError;
use super::snapshot::{CriterionRecord, SessionSnapshot, SNAPSHOT_VERSION};
use super::table::write_roster_csv;
use crate::grouping::{
    self, place_new_individual, GroupingRunner, Group, PairConstraints, PlacementConfig,
    PlacementResult,
};
use crate::meters::{
    group_stats, sort_members, GroupStats, MemberOrder, Meter, MeterCache, MeterThresholds,
};
use crate::roster::{
    normalize_key, Criterion, ImportedRoster, Individual, IndividualId, RelationKind, Roster,
    Weight,
};
use crate::scoring::{CriteriaSignature, ScoreCache};

/// Owns the roster, criteria and current groups, plus the score and meter
/// caches for them.
///
/// Every roster or criteria mutation goes through a method here and
/// clears both caches, so cached values never outlive the data they were
/// computed from. Caches are never shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct Session {
    roster: Roster,
    criteria: Vec<Criterion>,
    config: PlacementConfig,
    thresholds: MeterThresholds,
    placement: PlacementResult,
    scores: ScoreCache,
    meters: MeterCache,
    manual_changes: bool,
}

impl Session {
    pub fn new(config: PlacementConfig) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::InvalidConfig)?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Replaces roster and criteria with freshly ingested records. Groups are
    /// cleared.
    pub fn load(&mut self, imported: ImportedRoster) {
        tracing::info!(
            event = "roster_loaded",
            individuals = imported.roster.len(),
            criteria = imported.criteria.len(),
        );
        self.roster = imported.roster;
        self.criteria = imported.criteria;
        self.placement = PlacementResult::default();
        self.manual_changes = false;
        self.invalidate();
    }

    // ---- accessors ----

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &MeterThresholds {
        &self.thresholds
    }

    pub fn groups(&self) -> &[Group] {
        &self.placement.groups
    }

    /// Result of the last full run, with groups as edited since.
    pub fn placement(&self) -> &PlacementResult {
        &self.placement
    }

    /// Whether groups were edited by hand since the last full run or load.
    pub fn has_manual_changes(&self) -> bool {
        self.manual_changes
    }

    // ---- configuration ----

    pub fn set_config(&mut self, config: PlacementConfig) -> Result<(), SessionError> {
        config.validate().map_err(SessionError::InvalidConfig)?;
        self.config = config;
        Ok(())
    }

    pub fn set_thresholds(&mut self, thresholds: MeterThresholds) -> Result<(), SessionError> {
        thresholds.validate().map_err(SessionError::InvalidConfig)?;
        self.thresholds = thresholds;
        self.meters.invalidate();
        Ok(())
    }

    // ---- placement ----

    /// Full placement run; replaces every group.
    pub fn run(&mut self) -> &PlacementResult {
        self.scores.warm(&self.roster, &self.criteria);
        let constraints = PairConstraints::from_roster(&self.roster);
        self.placement = GroupingRunner::run(
            &self.roster,
            &self.criteria,
            &constraints,
            &self.config,
            &mut self.scores,
        );
        self.manual_changes = false;
        &self.placement
    }

    /// Moves one individual by hand and pins it to the destination.
    pub fn move_individual(&mut self, id: &str, to: usize) -> Result<usize, SessionError> {
        let from = grouping::move_individual(&mut self.placement.groups, &mut self.roster, id, to)?;
        if from != to {
            self.manual_changes = true;
            self.invalidate();
        }
        Ok(from)
    }

    // ---- individuals ----

    /// Adds a new individual and places it into an existing group.
    ///
    /// The identifier is derived from the name (lowercase alphanumerics,
    /// numeric suffix on collision); any id on `individual` is replaced.
    /// Returns the new id and the group it joined, if there are groups.
    pub fn add_individual(
        &mut self,
        mut individual: Individual,
    ) -> Result<(IndividualId, Option<usize>), SessionError> {
        individual.first_name = individual.first_name.trim().to_string();
        individual.last_name = individual.last_name.trim().to_string();
        if individual.full_name().is_empty() {
            return Err(SessionError::MissingName);
        }
        let base = normalize_key(&format!("{}{}", individual.first_name, individual.last_name));
        let id = self.roster.unique_id(&base, "individual");
        individual.id = id.clone();
        individual.pin = None;
        individual.keep_with.clear();
        individual.keep_apart.clear();

        self.roster.insert(individual);
        self.invalidate();

        let group = place_new_individual(
            &id,
            &self.placement.groups,
            &self.roster,
            &self.criteria,
            &self.config.mode,
            &mut self.scores,
        );
        if let Some(g) = group {
            self.placement.groups[g].members.push(id.clone());
        }
        tracing::info!(event = "individual_added", id = %id, group = ?group);
        Ok((id, group))
    }

    /// Deletes an individual from the roster, every group and every peer's
    /// relations.
    pub fn remove_individual(&mut self, id: &str) -> Result<Individual, SessionError> {
        let removed = self
            .roster
            .remove(id)
            .ok_or_else(|| SessionError::UnknownIndividual(id.to_string()))?;
        for group in &mut self.placement.groups {
            group.members.retain(|m| m != id);
        }
        self.invalidate();
        Ok(removed)
    }

    /// Applies an edit to one individual's scores, names or flags.
    ///
    /// The identifier and the relation sets are restored after the edit;
    /// relations change through [`Session::add_relation`] and friends.
    pub fn update_individual<F>(&mut self, id: &str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut Individual),
    {
        let individual = self
            .roster
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownIndividual(id.to_string()))?;
        let (keep_with, keep_apart) = (individual.keep_with.clone(), individual.keep_apart.clone());
        edit(individual);
        individual.id = id.to_string();
        individual.keep_with = keep_with;
        individual.keep_apart = keep_apart;
        self.invalidate();
        Ok(())
    }

    pub fn set_pin(&mut self, id: &str, pin: Option<usize>) -> Result<(), SessionError> {
        if !self.roster.set_pin(id, pin) {
            return Err(SessionError::UnknownIndividual(id.to_string()));
        }
        self.invalidate();
        Ok(())
    }

    // ---- relations ----

    pub fn add_relation(&mut self, from: &str, to: &str, kind: RelationKind) -> Result<(), SessionError> {
        self.roster.add_relation(from, to, kind)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove_relation(&mut self, from: &str, to: &str, kind: RelationKind) -> Result<bool, SessionError> {
        let changed = self.roster.remove_relation(from, to, kind)?;
        self.invalidate();
        Ok(changed)
    }

    pub fn clear_relations(&mut self, id: &str, kind: RelationKind) -> Result<usize, SessionError> {
        let released = self.roster.clear_relations(id, kind)?;
        self.invalidate();
        Ok(released)
    }

    // ---- criteria ----

    pub fn add_criterion(&mut self, criterion: Criterion) -> Result<(), SessionError> {
        if self.criteria.iter().any(|c| c.label == criterion.label) {
            return Err(SessionError::DuplicateCriterion(criterion.label));
        }
        self.criteria.push(criterion);
        self.invalidate();
        Ok(())
    }

    pub fn remove_criterion(&mut self, label: &str) -> Result<Criterion, SessionError> {
        let index = self.criterion_index(label)?;
        let removed = self.criteria.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Changes a criterion's weight. Counts as a manual change.
    pub fn set_weight(&mut self, label: &str, weight: Weight) -> Result<(), SessionError> {
        let index = self.criterion_index(label)?;
        self.criteria[index].weight = weight;
        self.manual_changes = true;
        self.invalidate();
        Ok(())
    }

    pub fn set_max(&mut self, label: &str, max: f64) -> Result<(), SessionError> {
        let index = self.criterion_index(label)?;
        self.criteria[index].max = max;
        self.invalidate();
        Ok(())
    }

    /// Shows or hides the meter of a criterion. Scoring is unaffected.
    pub fn set_enabled(&mut self, label: &str, enabled: bool) -> Result<(), SessionError> {
        let index = self.criterion_index(label)?;
        self.criteria[index].enabled = enabled;
        self.invalidate();
        Ok(())
    }

    fn criterion_index(&self, label: &str) -> Result<usize, SessionError> {
        self.criteria
            .iter()
            .position(|c| c.label == label)
            .ok_or_else(|| SessionError::UnknownCriterion(label.to_string()))
    }

    // ---- display ----

    /// Composite score of one individual (0 when unknown).
    pub fn composite(&mut self, id: &str) -> f64 {
        let signature = CriteriaSignature::of(&self.criteria);
        self.scores
            .score(&self.roster, id, &self.criteria, &signature)
    }

    pub fn meters(&mut self, group: usize) -> Result<Vec<Meter>, SessionError> {
        let g = self.group_at(group)?;
        Ok(self.meters.meters(
            &self.placement.groups[g],
            &self.roster,
            &self.criteria,
            self.roster.ids(),
            &self.thresholds,
        ))
    }

    pub fn group_stats(&self, group: usize) -> Result<GroupStats, SessionError> {
        let g = self.group_at(group)?;
        Ok(group_stats(&self.roster, &self.placement.groups[g].members))
    }

    /// Reorders the members of one group for display.
    pub fn sort_group(&mut self, group: usize, order: MemberOrder) -> Result<(), SessionError> {
        let g = self.group_at(group)?;
        sort_members(
            &mut self.placement.groups[g].members,
            order,
            &self.roster,
            &self.criteria,
            &mut self.scores,
        );
        Ok(())
    }

    fn group_at(&self, index: usize) -> Result<usize, SessionError> {
        if index < self.placement.groups.len() {
            Ok(index)
        } else {
            Err(SessionError::UnknownGroup {
                index,
                count: self.placement.groups.len(),
            })
        }
    }

    // ---- snapshot ----

    pub fn export(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            group_count: i64::try_from(self.config.group_count).unwrap_or(i64::MAX),
            criteria: Some(self.criteria.iter().map(CriterionRecord::export).collect()),
            individuals: self.roster.iter().cloned().collect(),
            group_names: Some(self.config.group_names.clone()),
            groups: Some(self.placement.groups.clone()),
        }
    }

    /// Writes the roster with its current groups as CSV.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        write_roster_csv(writer, &self.roster, &self.criteria, &self.placement.groups)
    }

    /// Restores a snapshot.
    ///
    /// Individuals without an id are dropped. Sections missing from the
    /// snapshot, and a non-positive group count, keep the current values.
    pub fn import(&mut self, snapshot: SessionSnapshot) {
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(event = "snapshot_version_mismatch", version = %snapshot.version);
        }
        let before = snapshot.individuals.len();
        self.roster = Roster::from_individuals(
            snapshot
                .individuals
                .into_iter()
                .filter(|ind| !ind.id.trim().is_empty()),
        );
        if let Some(records) = snapshot.criteria {
            self.criteria = records.into_iter().map(CriterionRecord::into_criterion).collect();
        }
        if let Ok(count) = usize::try_from(snapshot.group_count) {
            if count > 0 {
                self.config.group_count = count;
            }
        }
        if let Some(names) = snapshot.group_names {
            self.config.group_names = names;
        }
        if let Some(groups) = snapshot.groups {
            self.placement = PlacementResult {
                capacities: groups.iter().map(|g| g.capacity).collect(),
                groups,
                ..PlacementResult::default()
            };
        }
        self.manual_changes = false;
        self.invalidate();
        tracing::info!(
            event = "snapshot_imported",
            individuals = self.roster.len(),
            dropped = before - self.roster.len(),
            criteria = self.criteria.len(),
        );
    }

    fn invalidate(&mut self) {
        self.scores.invalidate();
        self.meters.invalidate();
    }
}
