//! Board positions.

use std::fmt::{self, Display};

/// A cell position on the 9×9 board.
///
/// `x` is the column (0-8, left to right) and `y` is the row (0-8, top to
/// bottom). Positions order row-major, so sorting a list of positions yields
/// reading order.
///
/// # Examples
///
/// ```
/// use cellsync_core::Position;
///
/// let pos = Position::new(4, 7);
/// assert_eq!(pos.x(), 4);
/// assert_eq!(pos.y(), 7);
/// assert_eq!(pos.index(), 7 * 9 + 4);
/// assert_eq!(pos.box_index(), 7);
/// assert_eq!(pos.to_string(), "r7c4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    // Field order gives the derived `Ord` its row-major ordering.
    y: u8,
    x: u8,
}

impl Position {
    /// All 81 positions in row-major order.
    pub const ALL: [Self; 81] = {
        let mut all = [Self { x: 0, y: 0 }; 81];
        let mut i = 0;
        #[expect(clippy::cast_possible_truncation)]
        while i < 81 {
            all[i] = Self {
                x: (i % 9) as u8,
                y: (i / 9) as u8,
            };
            i += 1;
        }
        all
    };

    /// Positions of each row, indexed by `y`.
    pub const ROWS: [[Self; 9]; 9] = {
        let mut rows = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut y = 0;
        while y < 9 {
            let mut x = 0;
            while x < 9 {
                rows[y as usize][x as usize] = Self::new(x, y);
                x += 1;
            }
            y += 1;
        }
        rows
    };

    /// Positions of each column, indexed by `x`.
    pub const COLUMNS: [[Self; 9]; 9] = {
        let mut columns = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut x = 0;
        while x < 9 {
            let mut y = 0;
            while y < 9 {
                columns[x as usize][y as usize] = Self::new(x, y);
                y += 1;
            }
            x += 1;
        }
        columns
    };

    /// Positions of each box, indexed by box index (left to right, top to
    /// bottom); each box lists its cells in reading order.
    pub const BOXES: [[Self; 9]; 9] = {
        let mut boxes = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut b = 0;
        while b < 9 {
            let mut i = 0;
            while i < 9 {
                boxes[b as usize][i as usize] = Self::from_box(b, i);
                i += 1;
            }
            b += 1;
        }
        boxes
    };

    /// Creates a position from column `x` and row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < 9 && y < 9);
        Self { x, y }
    }

    /// Creates a position from its row-major index (0-80).
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in the range 0-80.
    #[must_use]
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < 81);
        Self::ALL[index]
    }

    /// Creates the position of cell `i` (0-8, reading order) inside box
    /// `box_index`.
    ///
    /// # Panics
    ///
    /// Panics if either argument is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn from_box(box_index: u8, i: u8) -> Self {
        assert!(box_index < 9 && i < 9);
        let origin = Self::box_origin(box_index);
        Self::new(origin.x + i % 3, origin.y + i / 3)
    }

    /// Returns the top-left position of box `box_index`.
    #[must_use]
    #[inline]
    pub const fn box_origin(box_index: u8) -> Self {
        assert!(box_index < 9);
        Self::new((box_index % 3) * 3, (box_index / 3) * 3)
    }

    /// Returns the column (0-8).
    #[must_use]
    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row (0-8).
    #[must_use]
    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the row-major index (0-80).
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * 9 + self.x as usize
    }

    /// Returns the index of the box containing this position.
    #[must_use]
    #[inline]
    pub const fn box_index(self) -> u8 {
        (self.y / 3) * 3 + self.x / 3
    }

    /// Returns the index of this position inside its box (0-8, reading order).
    #[must_use]
    #[inline]
    pub const fn box_cell_index(self) -> u8 {
        (self.y % 3) * 3 + self.x % 3
    }

    /// Returns `true` if `other` shares a row, column, or box with `self`.
    ///
    /// A position is not its own peer.
    #[must_use]
    pub const fn is_peer_of(self, other: Self) -> bool {
        (self.x != other.x || self.y != other.y)
            && (self.x == other.x || self.y == other.y || self.box_index() == other.box_index())
    }

    /// Returns the 20 distinct positions sharing a row, column, or box with
    /// this one, in row-major order.
    ///
    /// ```
    /// use cellsync_core::Position;
    ///
    /// let pos = Position::new(4, 4);
    /// assert_eq!(pos.peers().count(), 20);
    /// assert!(pos.peers().all(|peer| peer != pos));
    /// ```
    pub fn peers(self) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |other| self.is_peer_of(*other))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.y, self.x)
    }
}
