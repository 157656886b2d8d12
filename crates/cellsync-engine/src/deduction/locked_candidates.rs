use cellsync_core::{DigitSet, House, Position};

use super::{BoxedDeduction, Deduction, HouseView, push_clear};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Locked Candidates";

/// A deduction that eliminates candidates using box/line intersections.
///
/// Analyzed on a box (pointing): when every position of a digit in the box
/// lies on one row or column, the digit is removed from the rest of that line.
///
/// Analyzed on a row or column (claiming): when every position of a digit in
/// the line lies in one box, the digit is removed from the rest of that box.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockedCandidates {}

impl LockedCandidates {
    /// Creates a new `LockedCandidates` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for LockedCandidates {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedDeduction {
        Box::new(*self)
    }

    fn analyze(
        &self,
        view: &HouseView<'_>,
        out: &mut Vec<UpdateRequest>,
    ) -> Result<(), Contradiction> {
        let house = view.house();
        for digit in view.unplaced_digits() {
            let positions: Vec<Position> = view
                .digit_cells(digit)
                .into_iter()
                .map(|i| view.position(i))
                .collect();
            let Some((&first, rest)) = positions.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let targets: Vec<House> = match house {
                House::Row { .. } | House::Column { .. } => {
                    if rest.iter().all(|pos| pos.box_index() == first.box_index()) {
                        vec![House::Box {
                            index: first.box_index(),
                        }]
                    } else {
                        vec![]
                    }
                }
                House::Box { .. } => {
                    let mut lines = Vec::new();
                    if rest.iter().all(|pos| pos.y() == first.y()) {
                        lines.push(House::Row { y: first.y() });
                    }
                    if rest.iter().all(|pos| pos.x() == first.x()) {
                        lines.push(House::Column { x: first.x() });
                    }
                    lines
                }
            };

            let mask = DigitSet::from_elem(digit);
            for target in targets {
                for pos in target.positions() {
                    if !house.contains(pos) {
                        push_clear(view.snapshot(), pos, mask, out);
                    }
                }
            }
        }
        Ok(())
    }
}
