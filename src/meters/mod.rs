//! Group statistics for display.
//!
//! [`compute_meters`] compares a group's average on each enabled criterion
//! with the roster-wide average and bands the percentage deviation:
//!
//! | deviation        | level                  |
//! |------------------|------------------------|
//! | ≤ −15%           | [`MeterLevel::FarBelow`] |
//! | ≤ −10%           | [`MeterLevel::Below`]    |
//! | ≥ +10%           | [`MeterLevel::Above`]    |
//! | otherwise        | [`MeterLevel::Balanced`] |
//!
//! The cut-offs come from [`MeterThresholds`]. [`MeterCache`] memoizes
//! meters per group, criteria signature and member list.

mod display;
mod engine;
mod types;

pub use display::{group_stats, sort_members};
pub use engine::{compute_meters, MeterCache};
pub use types::{GroupStats, Meter, MeterLevel, MemberOrder, MeterThresholds};
