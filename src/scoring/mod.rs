//! Composite scoring and roster statistics.
//!
//! - [`composite_score`]: weighted sum of per-criterion values, each
//!   normalized to a 0–100 scale by the criterion's maximum.
//! - [`ScoreCache`]: per-session memo of composite scores, keyed by
//!   [`CriteriaSignature`] so configuration edits never hit stale entries.
//! - [`Scorer`]: the cache bound to one roster and criteria list for the
//!   duration of a placement call.
//! - [`roster_average`]: the roster-wide baseline that meters compare
//!   group averages against.

mod cache;
mod composite;
mod scorer;
mod stats;

pub use cache::ScoreCache;
pub use composite::{composite_score, CriteriaSignature};
pub use scorer::{RankingBasis, Scorer};
pub use stats::roster_average;
