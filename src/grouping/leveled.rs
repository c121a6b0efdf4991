//! Leveled placement: ordered score bands, group 1 highest.

use super::board::Board;
use super::types::PlacementUnit;
use crate::scoring::{RankingBasis, Scorer};

/// Fills groups in index order from the highest-ranked unit down.
pub(super) struct LeveledPlacer<'b> {
    basis: &'b RankingBasis,
}

impl<'b> LeveledPlacer<'b> {
    pub(super) fn new(basis: &'b RankingBasis) -> Self {
        Self { basis }
    }

    pub(super) fn place(&self, board: &mut Board<'_>, units: &[PlacementUnit], scorer: &mut Scorer<'_>) {
        for unit in units.iter() {
            let Some(target) = unit.target else {
                continue;
            };
            if !board.violates(unit, target) {
                // pins outrank capacity
                board.force(unit, target);
                continue;
            }
            match (0..board.group_count()).find(|&g| board.accepts(unit, g)) {
                Some(g) => board.place(unit, g),
                None => board.force(unit, target),
            }
        }

        let mut free: Vec<(f64, &PlacementUnit)> = units
            .iter()
            .filter(|u| !u.is_pinned())
            .map(|u| (scorer.mean_rank(&u.members, self.basis), u))
            .collect();
        free.sort_by(|a, b| b.0.total_cmp(&a.0));

        let last = board.group_count().saturating_sub(1);
        let mut current = 0;
        for (_, unit) in free {
            if let Some(g) = (current..board.group_count()).find(|&g| board.accepts(unit, g)) {
                board.place(unit, g);
                current = g;
            } else if let Some(g) = (0..board.group_count()).find(|&g| board.accepts(unit, g)) {
                board.place(unit, g);
            } else {
                board.force(unit, current);
            }

            if current < last && board.size(current) >= board.capacity(current) {
                current += 1;
            }
        }
    }
}
