//! Grids of optional digits.

use std::{
    fmt::{self, Display},
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::{Digit, Position};

/// A 9×9 grid where each cell is either empty or holds a digit.
///
/// `DigitGrid` is the exchange format at the edges of the solver: puzzles are
/// loaded into it, and solved boards are converted back into it for display.
///
/// The compact text notation accepted by [`FromStr`] uses `1`-`9` for digits
/// and `.`, `_`, or `0` for empty cells; whitespace is ignored.
///
/// # Examples
///
/// ```
/// use cellsync_core::{Digit, DigitGrid, Position};
///
/// let grid: DigitGrid = "
///     53_ _7_ ___
///     6__ 195 ___
///     _98 ___ _6_
///     8__ _6_ __3
///     4__ 8_3 __1
///     7__ _2_ __6
///     _6_ ___ 28_
///     ___ 419 __5
///     ___ _8_ _79
/// "
/// .parse()?;
///
/// assert_eq!(grid[Position::new(0, 0)], Some(Digit::D5));
/// assert_eq!(grid[Position::new(2, 0)], None);
/// assert_eq!(grid.filled_count(), 30);
/// # Ok::<(), cellsync_core::ParseDigitGridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitGrid {
    cells: [Option<Digit>; 81],
}

impl Default for DigitGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitGrid {
    /// Creates an empty grid.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: [None; 81] }
    }

    /// Returns the digit at `pos`, if any.
    #[must_use]
    pub const fn get(&self, pos: Position) -> Option<Digit> {
        self.cells[pos.index()]
    }

    /// Sets or clears the digit at `pos`.
    pub fn set(&mut self, pos: Position, digit: Option<Digit>) {
        self.cells[pos.index()] = digit;
    }

    /// Returns the number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns `true` if every cell holds a digit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns an iterator over the filled cells in row-major order.
    pub fn givens(&self) -> impl Iterator<Item = (Position, Digit)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|pos| self.get(pos).map(|digit| (pos, digit)))
    }
}

impl Index<Position> for DigitGrid {
    type Output = Option<Digit>;

    fn index(&self, pos: Position) -> &Option<Digit> {
        &self.cells[pos.index()]
    }
}

impl IndexMut<Position> for DigitGrid {
    fn index_mut(&mut self, pos: Position) -> &mut Option<Digit> {
        &mut self.cells[pos.index()]
    }
}

/// Error returned when parsing a [`DigitGrid`] from the compact notation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseDigitGridError {
    /// A character other than a digit, an empty-cell marker, or whitespace.
    #[display("unexpected character {ch:?} at cell {cell}")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Number of cells read before it.
        cell: usize,
    },
    /// The input did not describe exactly 81 cells.
    #[display("expected 81 cells, found {found}")]
    CellCount {
        /// Number of cells found.
        found: usize,
    },
}

impl FromStr for DigitGrid {
    type Err = ParseDigitGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid = Self::new();
        let mut count = 0;
        for ch in s.chars().filter(|ch| !ch.is_whitespace()) {
            let digit = match ch {
                '.' | '_' | '0' => None,
                '1'..='9' => Digit::try_from_value(ch as u8 - b'0'),
                _ => return Err(ParseDigitGridError::InvalidCharacter { ch, cell: count }),
            };
            if count < 81 {
                grid.cells[count] = digit;
            }
            count += 1;
        }
        if count != 81 {
            return Err(ParseDigitGridError::CellCount { found: count });
        }
        Ok(grid)
    }
}

/// Writes the grid in the compact notation, one row per line with a space
/// between boxes.
impl Display for DigitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in Position::ROWS.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, pos) in row.iter().enumerate() {
                if x > 0 && x % 3 == 0 {
                    f.write_str(" ")?;
                }
                match self.get(*pos) {
                    Some(digit) => Display::fmt(&digit, f)?,
                    None => f.write_str("_")?,
                }
            }
        }
        Ok(())
    }
}
