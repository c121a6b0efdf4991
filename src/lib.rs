//! Balanced group placement for rosters.
//!
//! Splits a roster of individuals into a fixed number of groups so that
//! group averages on weighted criteria stay comparable, while honoring
//! three independent constraint systems:
//!
//! - **Capacity**: groups differ in size by at most one.
//! - **Pins**: an individual may be required in a specific group.
//! - **Pairs**: keep-with pairs share a group; keep-apart pairs never do.
//!
//! Placement is deterministic and total: for the same roster, criteria and
//! identifier order the result is identical, and jointly infeasible
//! constraints degrade into reported fallbacks instead of errors.
//!
//! # Modules
//!
//! - [`roster`]: individuals, criteria, weights, relations and record
//!   ingestion.
//! - [`scoring`]: composite scores, the score cache and roster averages.
//! - [`grouping`]: constraint grouping, capacity planning, balanced and
//!   leveled placement, incremental placement and manual moves.
//! - [`meters`]: per-group deviation meters and display statistics.
//! - [`session`]: the stateful front door that owns a roster, its groups
//!   and caches, with snapshot export and import.
//!
//! # Example
//!
//! ```
//! use u_roster::grouping::{GroupingRunner, PairConstraints, PlacementConfig};
//! use u_roster::roster::{Criterion, Individual, Roster};
//! use u_roster::scoring::ScoreCache;
//!
//! let roster = Roster::from_individuals(
//!     [("a", 80.0), ("b", 40.0), ("c", 60.0), ("d", 20.0)]
//!         .into_iter()
//!         .map(|(id, v)| Individual::new(id, id, "").with_score("Reading", v)),
//! );
//! let criteria = vec![Criterion::new("Reading")];
//! let config = PlacementConfig::default().with_group_count(2);
//!
//! let result = GroupingRunner::run(
//!     &roster,
//!     &criteria,
//!     &PairConstraints::from_roster(&roster),
//!     &config,
//!     &mut ScoreCache::new(),
//! );
//! assert_eq!(result.groups.len(), 2);
//! assert!(result.groups.iter().all(|g| g.len() == 2));
//! ```

pub mod grouping;
pub mod meters;
pub mod roster;
pub mod scoring;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;
