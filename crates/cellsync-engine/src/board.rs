//! The committed board shared by all actors.

use std::{
    ops::Index,
    sync::atomic::{AtomicU16, Ordering},
};

use cellsync_core::{Digit, DigitGrid, DigitSet, House, Position};

use crate::{CellState, Contradiction};

/// The committed state of all 81 cells.
///
/// The board is borrowed by every actor for the duration of a solve. Slot `i`
/// is written only by the actor owning position `i`, and only while the
/// coordinator runs a commit barrier, so readers in any other phase observe a
/// stable board.
#[derive(Debug)]
pub struct Board {
    cells: [AtomicU16; 81],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with every cell unresolved.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| AtomicU16::new(CellState::unresolved().pack())),
        }
    }

    /// Reads the committed state of `pos`.
    #[must_use]
    pub fn get(&self, pos: Position) -> CellState {
        CellState::from_packed(self.cells[pos.index()].load(Ordering::Acquire))
    }

    /// Publishes the state of `pos`. Called by the owning actor on commit.
    pub(crate) fn publish(&self, pos: Position, state: CellState) {
        self.cells[pos.index()].store(state.pack(), Ordering::Release);
    }

    /// Copies the committed board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: std::array::from_fn(|i| self.get(Position::from_index(i))),
        }
    }
}

/// An owned copy of the committed board.
///
/// Snapshots are the read model for deductions, reports and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    cells: [CellState; 81],
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSnapshot {
    /// Creates a snapshot with every cell unresolved.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [CellState::unresolved(); 81],
        }
    }

    /// Creates a snapshot from explicit cell states, in row-major order.
    #[must_use]
    pub const fn from_cells(cells: [CellState; 81]) -> Self {
        Self { cells }
    }

    /// Returns the state of `pos`.
    #[must_use]
    pub const fn get(&self, pos: Position) -> CellState {
        self.cells[pos.index()]
    }

    /// Returns the candidates of `pos`.
    #[must_use]
    pub const fn candidates(&self, pos: Position) -> DigitSet {
        self.cells[pos.index()].candidates()
    }

    /// Returns the number of finalized cells.
    #[must_use]
    pub fn finalized_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_finalized()).count()
    }

    /// Returns `true` if every cell is finalized.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_finalized())
    }

    /// Returns an iterator over every position and its state.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        Position::ALL.into_iter().zip(self.cells.iter().copied())
    }

    /// Converts the snapshot into a grid of finalized values.
    #[must_use]
    pub fn to_digit_grid(&self) -> DigitGrid {
        let mut grid = DigitGrid::new();
        for (pos, cell) in self.iter() {
            grid[pos] = cell.value();
        }
        grid
    }

    /// Checks that no house holds the same finalized digit twice.
    ///
    /// Houses are checked in [`House::ALL`] order and the first duplicate is
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction::DuplicateValue`] for the first duplicate found.
    pub fn check_consistency(&self) -> Result<(), Contradiction> {
        for house in House::ALL {
            let mut seen = DigitSet::EMPTY;
            for pos in house.positions() {
                if let Some(digit) = self.get(pos).value()
                    && !seen.insert(digit)
                {
                    return Err(Contradiction::DuplicateValue { house, digit });
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if `digit` is finalized somewhere in `house`.
    #[must_use]
    pub fn is_placed(&self, house: House, digit: Digit) -> bool {
        house
            .positions()
            .into_iter()
            .any(|pos| self.get(pos).value() == Some(digit))
    }
}

impl Index<Position> for BoardSnapshot {
    type Output = CellState;

    fn index(&self, pos: Position) -> &CellState {
        &self.cells[pos.index()]
    }
}
