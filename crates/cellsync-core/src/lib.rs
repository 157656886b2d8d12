//! Core data types for the cellsync Sudoku solver.
//!
//! This crate provides the value types shared by the solving engine and its
//! front ends:
//!
//! - [`Digit`] and [`DigitSet`] for digits and candidate sets
//! - [`Position`] for board coordinates
//! - [`House`] and [`HouseMask`] for rows, columns and boxes
//! - [`DigitGrid`] for puzzles and solutions
//! - [`parse_puzzle`] and [`load_puzzle`] for the puzzle file format
//!
//! # Examples
//!
//! ```
//! use cellsync_core::{House, Position};
//!
//! let pos = Position::new(4, 7);
//! let [row, column, box_] = House::containing(pos);
//! assert_eq!(row, House::Row { y: 7 });
//! assert_eq!(column, House::Column { x: 4 });
//! assert_eq!(box_, House::Box { index: 7 });
//! ```

pub use self::{digit::*, digit_grid::*, digit_set::*, house::*, position::*, puzzle_file::*};

mod digit;
mod digit_grid;
mod digit_set;
mod house;
mod position;
mod puzzle_file;
