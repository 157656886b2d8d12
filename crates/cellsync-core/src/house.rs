use std::{
    fmt::{self, Display},
    iter::FusedIterator,
    ops::{BitOr, BitOrAssign},
};

use crate::Position;

/// A Sudoku house (row, column, or 3×3 box).
///
/// Every house exposes the same view of its nine cells: a local cell index
/// 0-8 that maps one-to-one onto board positions, so analysis code does not
/// need to know which kind of house it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum House {
    /// A row identified by its y coordinate (0-8).
    Row {
        /// Row index (0-8).
        y: u8,
    },
    /// A column identified by its x coordinate (0-8).
    Column {
        /// Column index (0-8).
        x: u8,
    },
    /// A 3×3 box identified by its index (0-8, left to right, top to bottom).
    Box {
        /// Box index (0-8).
        index: u8,
    },
}

impl House {
    /// Array containing all rows (0-8).
    pub const ROWS: [Self; 9] = {
        let mut rows = [Self::Row { y: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            rows[i as usize] = Self::Row { y: i };
            i += 1;
        }
        rows
    };

    /// Array containing all columns (0-8).
    pub const COLUMNS: [Self; 9] = {
        let mut columns = [Self::Column { x: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            columns[i as usize] = Self::Column { x: i };
            i += 1;
        }
        columns
    };

    /// Array containing all boxes (0-8).
    pub const BOXES: [Self; 9] = {
        let mut boxes = [Self::Box { index: 0 }; 9];
        let mut i = 0;
        while i < 9 {
            boxes[i as usize] = Self::Box { index: i };
            i += 1;
        }
        boxes
    };

    /// Array containing all houses in row, column, box order.
    pub const ALL: [Self; 27] = {
        let mut all = [Self::Row { y: 0 }; 27];
        let mut i = 0;
        #[expect(clippy::cast_possible_truncation)]
        while i < 9 {
            all[i] = Self::Row { y: i as u8 };
            all[i + 9] = Self::Column { x: i as u8 };
            all[i + 18] = Self::Box { index: i as u8 };
            i += 1;
        }
        all
    };

    /// Returns the three houses containing `pos`: its row, column, and box.
    #[must_use]
    pub const fn containing(pos: Position) -> [Self; 3] {
        [
            Self::Row { y: pos.y() },
            Self::Column { x: pos.x() },
            Self::Box {
                index: pos.box_index(),
            },
        ]
    }

    /// Converts a cell index within the house (0-8) into an absolute [`Position`].
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    #[must_use]
    #[inline]
    pub const fn position_from_cell_index(self, i: u8) -> Position {
        assert!(i < 9);
        match self {
            House::Row { y } => Position::new(i, y),
            House::Column { x } => Position::new(x, i),
            House::Box { index } => Position::from_box(index, i),
        }
    }

    /// Returns the cell index of `pos` within this house, if it belongs to it.
    #[must_use]
    pub const fn cell_index_of(self, pos: Position) -> Option<u8> {
        match self {
            House::Row { y } if pos.y() == y => Some(pos.x()),
            House::Column { x } if pos.x() == x => Some(pos.y()),
            House::Box { index } if pos.box_index() == index => Some(pos.box_cell_index()),
            _ => None,
        }
    }

    /// Returns `true` if `pos` belongs to this house.
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        self.cell_index_of(pos).is_some()
    }

    /// Returns all positions contained in this house, ordered by cell index.
    #[must_use]
    pub const fn positions(self) -> [Position; 9] {
        match self {
            House::Row { y } => Position::ROWS[y as usize],
            House::Column { x } => Position::COLUMNS[x as usize],
            House::Box { index } => Position::BOXES[index as usize],
        }
    }
}

impl Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            House::Row { y } => write!(f, "row {y}"),
            House::Column { x } => write!(f, "column {x}"),
            House::Box { index } => write!(f, "box {index}"),
        }
    }
}

/// A set of cell indices (0-8) within a house.
///
/// # Examples
///
/// ```
/// use cellsync_core::HouseMask;
///
/// let mut mask = HouseMask::new();
/// mask.insert(0);
/// mask.insert(4);
///
/// assert_eq!(mask.len(), 2);
/// assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 4]);
/// assert_eq!(HouseMask::from_iter([7]).as_single(), Some(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HouseMask {
    bits: u16,
}

impl HouseMask {
    /// The empty mask.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Adds a cell index.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range 0-8.
    pub fn insert(&mut self, i: u8) {
        assert!(i < 9);
        self.bits |= 1 << i;
    }

    /// Returns `true` if the mask contains cell index `i`.
    #[must_use]
    pub const fn contains(self, i: u8) -> bool {
        i < 9 && self.bits & (1 << i) != 0
    }

    /// Returns the number of cell indices in the mask.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the mask is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the only cell index of a singleton mask.
    #[must_use]
    pub fn as_single(self) -> Option<u8> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// Returns an iterator over the cell indices in ascending order.
    #[must_use]
    pub const fn iter(self) -> HouseMaskIter {
        HouseMaskIter { bits: self.bits }
    }
}

impl BitOr for HouseMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for HouseMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl FromIterator<u8> for HouseMask {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut mask = Self::new();
        for i in iter {
            mask.insert(i);
        }
        mask
    }
}

impl IntoIterator for HouseMask {
    type Item = u8;
    type IntoIter = HouseMaskIter;

    fn into_iter(self) -> HouseMaskIter {
        self.iter()
    }
}

/// Iterator over the cell indices of a [`HouseMask`].
#[derive(Debug, Clone)]
pub struct HouseMaskIter {
    bits: u16,
}

impl Iterator for HouseMaskIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let i = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for HouseMaskIter {}
impl FusedIterator for HouseMaskIter {}
