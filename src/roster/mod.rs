//! Roster data model.
//!
//! - [`Individual`]: one person, with raw scores per criterion, an optional
//!   group pin and symmetric keep-with / keep-apart relations.
//! - [`Roster`]: individuals keyed by identifier, iterated in a fixed order.
//! - [`Criterion`] and [`Weight`]: what is balanced, and how much it counts.
//! - [`RecordImporter`]: turns CSV text, or a header and rows of cells, into
//!   a roster and its criteria.
//!
//! Relation edits go through [`Roster::add_relation`] /
//! [`Roster::remove_relation`], which update both sides at once and reject
//! a keep-with over an existing keep-apart (and vice versa).

mod criterion;
mod ingest;
mod relations;
mod types;

pub use criterion::{Criterion, Weight, DEFAULT_MAX};
pub use ingest::{
    is_mostly_numeric, normalize_key, parse_raw_value, split_name, split_tags, ImportedRoster,
    IngestConfig, IngestError, RecordImporter,
};
pub use relations::{RelationError, RelationKind};
pub use types::{Gender, Individual, IndividualId, Roster};
