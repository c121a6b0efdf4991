//! Session state.
//!
//! A [`Session`] owns one loaded roster with its criteria, placement
//! configuration, current groups and the score and meter caches. All edits
//! (individuals, relations, criteria, manual moves) go through it so the
//! caches are invalidated in step. [`SessionSnapshot`] is the portable form
//! used to save and restore a session; [`write_roster_csv`] writes the
//! placed roster as a table.

mod error;
mod snapshot;
mod state;
mod table;

pub use error::SessionError;
pub use snapshot::{CriterionRecord, SessionSnapshot, SNAPSHOT_VERSION};
pub use state::Session;
pub use table::{write_roster_csv, UNASSIGNED};
