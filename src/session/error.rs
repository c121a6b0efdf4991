use thiserror::Error;

use crate::grouping::MoveError;
use crate::roster::{IndividualId, RelationError};

/// Rejected session edit. The session is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown individual: {0}")]
    UnknownIndividual(IndividualId),

    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("criterion already exists: {0}")]
    DuplicateCriterion(String),

    #[error("individual needs a first or last name")]
    MissingName,

    #[error("group index {index} out of range ({count} groups)")]
    UnknownGroup { index: usize, count: usize },
}
