//! Partitioning a roster into groups.
//!
//! A full run ([`GroupingRunner::run`]) proceeds in three steps:
//!
//! 1. [`build_units`] merges keep-with pairs (union-find) into placement
//!    units and propagates pins across each cluster.
//! 2. [`plan_capacities`] spreads the roster evenly over the groups.
//! 3. A placer assigns every unit:
//!    - **Balanced**: highest-scoring units first, each into the smallest
//!      group whose average it would leave lowest, with gender balance as
//!      the near-tie breaker.
//!    - **Leveled**: units in descending rank fill groups in index order,
//!      producing score bands with group 1 on top.
//!
//! Placement never fails. When pins, capacities and separations cannot all
//! hold, units are forced into a group and the break is reported as a
//! [`Fallback`].
//!
//! Outside full runs, [`place_new_individual`] picks a group for one new
//! arrival and [`move_individual`] applies a manual reassignment.

mod balanced;
mod board;
mod capacity;
mod config;
mod incremental;
mod leveled;
mod moves;
mod runner;
mod types;
mod units;

pub use capacity::plan_capacities;
pub use config::{PlacementConfig, PlacementMode};
pub use incremental::place_new_individual;
pub use moves::{move_individual, MoveError};
pub use runner::{GroupingRunner, PairConstraints};
pub use types::{default_group_name, Fallback, Group, PlacementResult, PlacementUnit};
pub use units::{build_units, UnitPlan};
