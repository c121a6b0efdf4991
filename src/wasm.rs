//! JavaScript bindings for the placement engine.
//!
//! Every function takes and returns plain JS objects (via
//! `serde-wasm-bindgen`). Field names follow the Rust types and are
//! snake_case throughout, nested individuals and criteria included, so the
//! same objects match a session snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::grouping::{
    place_new_individual, Group, GroupingRunner, PairConstraints, PlacementConfig, PlacementMode,
};
use crate::meters::{compute_meters, MeterThresholds};
use crate::roster::{Criterion, Individual, IndividualId, Roster};
use crate::scoring::{composite_score, ScoreCache};

#[derive(Deserialize)]
struct GroupRosterInput {
    ids: Vec<IndividualId>,
    individuals: HashMap<IndividualId, Individual>,
    group_count: usize,
    criteria: Vec<Criterion>,
    #[serde(default)]
    together: Vec<(IndividualId, IndividualId)>,
    #[serde(default)]
    apart: Vec<(IndividualId, IndividualId)>,
    #[serde(default)]
    group_names: Vec<Option<String>>,
    #[serde(default)]
    mode: PlacementMode,
}

#[derive(Deserialize)]
struct MetersInput {
    group: Group,
    individuals: HashMap<IndividualId, Individual>,
    criteria: Vec<Criterion>,
    ids: Vec<IndividualId>,
    #[serde(default)]
    thresholds: Option<MeterThresholds>,
}

#[derive(Deserialize)]
struct PlaceNewInput {
    new_id: IndividualId,
    groups: Vec<Group>,
    individuals: HashMap<IndividualId, Individual>,
    criteria: Vec<Criterion>,
    #[serde(default)]
    mode: PlacementMode,
}

#[derive(Serialize)]
struct GroupRosterOutput {
    groups: Vec<Group>,
    capacities: Vec<usize>,
}

/// Builds a roster in `ids` order. Ids without a record become blank
/// individuals that score zero.
fn roster_from(ids: &[IndividualId], mut individuals: HashMap<IndividualId, Individual>) -> Roster {
    Roster::from_individuals(ids.iter().map(|id| {
        let mut ind = individuals.remove(id).unwrap_or_default();
        ind.id = id.clone();
        ind
    }))
}

/// Roster order for lookups that do not depend on it.
fn roster_from_map(individuals: HashMap<IndividualId, Individual>) -> Roster {
    let mut ids: Vec<IndividualId> = individuals.keys().cloned().collect();
    ids.sort();
    roster_from(&ids, individuals)
}

#[wasm_bindgen(js_name = computeScore)]
pub fn compute_score(individual: JsValue, criteria: JsValue) -> Result<f64, JsValue> {
    let individual: Individual = serde_wasm_bindgen::from_value(individual)?;
    let criteria: Vec<Criterion> = serde_wasm_bindgen::from_value(criteria)?;
    Ok(composite_score(&individual, &criteria))
}

#[wasm_bindgen(js_name = groupRoster)]
pub fn group_roster(input: JsValue) -> Result<JsValue, JsValue> {
    let input: GroupRosterInput = serde_wasm_bindgen::from_value(input)?;
    let roster = roster_from(&input.ids, input.individuals);
    let config = PlacementConfig::default()
        .with_group_count(input.group_count)
        .with_mode(input.mode)
        .with_group_names(input.group_names);
    let constraints = PairConstraints {
        together: input.together,
        apart: input.apart,
    };
    let result = GroupingRunner::run(
        &roster,
        &input.criteria,
        &constraints,
        &config,
        &mut ScoreCache::new(),
    );
    let output = GroupRosterOutput {
        groups: result.groups,
        capacities: result.capacities,
    };
    Ok(serde_wasm_bindgen::to_value(&output)?)
}

#[wasm_bindgen(js_name = computeMeters)]
pub fn compute_group_meters(input: JsValue) -> Result<JsValue, JsValue> {
    let input: MetersInput = serde_wasm_bindgen::from_value(input)?;
    let roster = roster_from(&input.ids, input.individuals);
    let meters = compute_meters(
        &input.group,
        &roster,
        &input.criteria,
        &input.ids,
        &input.thresholds.unwrap_or_default(),
    );
    Ok(serde_wasm_bindgen::to_value(&meters)?)
}

/// Returns the chosen group index, or `undefined` when there are no groups.
#[wasm_bindgen(js_name = placeNewIndividual)]
pub fn place_new(input: JsValue) -> Result<Option<usize>, JsValue> {
    let input: PlaceNewInput = serde_wasm_bindgen::from_value(input)?;
    let roster = roster_from_map(input.individuals);
    Ok(place_new_individual(
        &input.new_id,
        &input.groups,
        &roster,
        &input.criteria,
        &input.mode,
        &mut ScoreCache::new(),
    ))
}
