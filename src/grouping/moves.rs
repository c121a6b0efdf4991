//! Manual reassignment of one individual.

use thiserror::Error;

use super::types::Group;
use crate::roster::{IndividualId, RelationKind, Roster};

/// Why a manual move was refused. Nothing is changed when a move fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    #[error("unknown individual: {0}")]
    UnknownIndividual(IndividualId),

    #[error("group index {index} out of range ({count} groups)")]
    UnknownGroup { index: usize, count: usize },

    #[error("{0} is not placed in any group")]
    NotPlaced(IndividualId),

    #[error("cannot move {moving} into group {group}: must be separated from {blocking}")]
    SeparationConflict {
        moving: IndividualId,
        blocking: IndividualId,
        group: usize,
    },
}

/// Moves `id` into group `to` and pins it there, so a later full run keeps
/// it in place.
///
/// Refused when the destination holds a must-separate peer; the error names
/// that peer. Moving into the group the individual is already in is a
/// no-op and leaves the pin alone. Returns the source group index.
pub fn move_individual(
    groups: &mut [Group],
    roster: &mut Roster,
    id: &str,
    to: usize,
) -> Result<usize, MoveError> {
    if to >= groups.len() {
        return Err(MoveError::UnknownGroup {
            index: to,
            count: groups.len(),
        });
    }
    let individual = roster
        .get(id)
        .ok_or_else(|| MoveError::UnknownIndividual(id.to_string()))?;
    let from = groups
        .iter()
        .position(|g| g.contains(id))
        .ok_or_else(|| MoveError::NotPlaced(id.to_string()))?;
    if from == to {
        return Ok(from);
    }

    let apart = individual.relations(RelationKind::KeepApart);
    let blocking = groups[to].members.iter().find(|m| {
        apart.contains(m.as_str())
            || roster
                .get(m)
                .is_some_and(|peer| peer.relations(RelationKind::KeepApart).contains(id))
    });
    if let Some(blocking) = blocking {
        tracing::info!(event = "move_blocked", id, blocking = %blocking, group = to);
        return Err(MoveError::SeparationConflict {
            moving: id.to_string(),
            blocking: blocking.clone(),
            group: to,
        });
    }

    groups[from].members.retain(|m| m != id);
    groups[to].members.push(id.to_string());
    roster.set_pin(id, Some(to));
    tracing::info!(event = "manual_move", id, from, to);
    Ok(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Individual;

    fn setup() -> (Vec<Group>, Roster) {
        let mut roster = Roster::from_individuals(
            ["a", "b", "c", "d"]
                .into_iter()
                .map(|id| Individual::new(id, id, id)),
        );
        roster.add_relation("a", "d", RelationKind::KeepApart).unwrap();
        let mut g0 = Group::new(0, "G1", 2);
        g0.members = vec!["a".into(), "b".into()];
        let mut g1 = Group::new(1, "G2", 2);
        g1.members = vec!["c".into(), "d".into()];
        (vec![g0, g1], roster)
    }

    #[test]
    fn test_move_pins_destination() {
        let (mut groups, mut roster) = setup();
        assert_eq!(move_individual(&mut groups, &mut roster, "b", 1), Ok(0));
        assert_eq!(groups[0].members, vec!["a"]);
        assert_eq!(groups[1].members, vec!["c", "d", "b"]);
        assert_eq!(roster.get("b").and_then(|i| i.pin), Some(1));
    }

    #[test]
    fn test_separation_blocks_move() {
        let (mut groups, mut roster) = setup();
        let before = groups.clone();
        let err = move_individual(&mut groups, &mut roster, "a", 1).unwrap_err();
        assert_eq!(
            err,
            MoveError::SeparationConflict {
                moving: "a".into(),
                blocking: "d".into(),
                group: 1,
            }
        );
        assert_eq!(groups, before);
        assert_eq!(roster.get("a").and_then(|i| i.pin), None);
    }

    #[test]
    fn test_same_group_is_noop() {
        let (mut groups, mut roster) = setup();
        assert_eq!(move_individual(&mut groups, &mut roster, "a", 0), Ok(0));
        assert_eq!(roster.get("a").and_then(|i| i.pin), None);
    }

    #[test]
    fn test_rejections() {
        let (mut groups, mut roster) = setup();
        assert!(matches!(
            move_individual(&mut groups, &mut roster, "a", 5),
            Err(MoveError::UnknownGroup { index: 5, count: 2 })
        ));
        assert!(matches!(
            move_individual(&mut groups, &mut roster, "zz", 1),
            Err(MoveError::UnknownIndividual(_))
        ));
        roster.insert(Individual::new("e", "e", "e"));
        assert!(matches!(
            move_individual(&mut groups, &mut roster, "e", 1),
            Err(MoveError::NotPlaced(_))
        ));
    }
}
