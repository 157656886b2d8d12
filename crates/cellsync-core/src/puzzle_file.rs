//! Puzzle file loading.
//!
//! A puzzle file holds nine lines, one per row. Each line lists nine numbers
//! separated by `,` inside a box and terminated by `;` after every third
//! field:
//!
//! ```text
//! 5,3,0;0,7,0;0,0,0;
//! 6,0,0;1,9,5;0,0,0;
//! ...
//! ```
//!
//! `0` marks an unknown cell and `1`-`9` a given. Surrounding whitespace and
//! blank lines are ignored.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Digit, DigitGrid, Position};

/// Error returned when a puzzle file cannot be loaded.
///
/// Line and field numbers are 1-based.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[display("failed to read {path:?}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file does not contain exactly nine rows.
    #[display("expected 9 rows, found {found}")]
    LineCount {
        /// Number of non-blank lines found.
        found: usize,
    },
    /// A row does not contain exactly nine fields.
    #[display("line {line}: expected 9 fields, found {found}")]
    FieldCount {
        /// Line number.
        line: usize,
        /// Number of fields found.
        found: usize,
    },
    /// A row has the right number of fields but misplaced `,`/`;` separators.
    #[display("line {line}: expected fields grouped as `d,d,d;d,d,d;d,d,d;`")]
    Delimiter {
        /// Line number.
        line: usize,
    },
    /// A field is not a number.
    #[display("line {line}, field {field}: {text:?} is not a number")]
    InvalidNumber {
        /// Line number.
        line: usize,
        /// Field number.
        field: usize,
        /// Field text after trimming.
        text: String,
    },
    /// A field is an integer outside 0-9, however many digits it has.
    #[display("line {line}, field {field}: {text} is outside 0-9")]
    OutOfRange {
        /// Line number.
        line: usize,
        /// Field number.
        field: usize,
        /// Field text after trimming.
        text: String,
    },
}

impl LoadError {
    /// Returns the 1-based line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } | Self::LineCount { .. } => None,
            Self::FieldCount { line, .. }
            | Self::Delimiter { line }
            | Self::InvalidNumber { line, .. }
            | Self::OutOfRange { line, .. } => Some(*line),
        }
    }
}

/// Reads and parses a puzzle file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, or any parse error
/// reported by [`parse_puzzle`].
pub fn load_puzzle(path: impl AsRef<Path>) -> Result<DigitGrid, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_puzzle(&text)
}

/// Parses the contents of a puzzle file.
///
/// Each row is validated in order: field count, separator layout, numeric
/// form, then range.
///
/// # Errors
///
/// Returns the first [`LoadError`] found, scanning rows top to bottom.
///
/// # Examples
///
/// ```
/// use cellsync_core::{Digit, LoadError, Position, parse_puzzle};
///
/// let text = "5,3,0;0,7,0;0,0,0;\n".repeat(9);
/// let grid = parse_puzzle(&text)?;
/// assert_eq!(grid[Position::new(0, 0)], Some(Digit::D5));
///
/// let err = parse_puzzle("1,2,3;4,5,6;7,8;\n").unwrap_err();
/// assert!(matches!(err, LoadError::FieldCount { line: 1, found: 8 }));
/// # Ok::<(), LoadError>(())
/// ```
pub fn parse_puzzle(text: &str) -> Result<DigitGrid, LoadError> {
    let mut grid = DigitGrid::new();
    let mut rows = 0;
    for (line_index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = line_index + 1;
        let digits = parse_row(line, line_number)?;
        if rows < 9 {
            for (pos, digit) in Position::ROWS[rows].into_iter().zip(digits) {
                grid[pos] = digit;
            }
        }
        rows += 1;
    }
    if rows != 9 {
        return Err(LoadError::LineCount { found: rows });
    }
    Ok(grid)
}

fn parse_row(line: &str, line_number: usize) -> Result<[Option<Digit>; 9], LoadError> {
    // A well-formed row ends with `;`, leaving one empty piece after the split.
    let pieces: Vec<&str> = line.split([',', ';']).collect();
    let fields = match pieces.split_last() {
        Some((last, rest)) if last.trim().is_empty() => rest,
        _ => &pieces[..],
    };
    if fields.len() != 9 {
        return Err(LoadError::FieldCount {
            line: line_number,
            found: fields.len(),
        });
    }

    let separators: Vec<char> = line.chars().filter(|ch| matches!(ch, ',' | ';')).collect();
    let expected = [',', ',', ';', ',', ',', ';', ',', ',', ';'];
    if separators != expected {
        return Err(LoadError::Delimiter { line: line_number });
    }

    let mut digits = [None; 9];
    for (i, field) in fields.iter().enumerate() {
        let field_number = i + 1;
        let text = field.trim();
        if !is_integer(text) {
            return Err(LoadError::InvalidNumber {
                line: line_number,
                field: field_number,
                text: text.to_owned(),
            });
        }
        // Integers too wide for `i64` are out of range too.
        digits[i] = match text.parse::<i64>().map(u8::try_from) {
            Ok(Ok(0)) => None,
            Ok(Ok(v @ 1..=9)) => Digit::try_from_value(v),
            _ => {
                return Err(LoadError::OutOfRange {
                    line: line_number,
                    field: field_number,
                    text: text.to_owned(),
                });
            }
        };
    }
    Ok(digits)
}

/// Returns `true` if `text` is a decimal integer with an optional sign.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Formats a grid in the puzzle file format, `0` for empty cells.
///
/// The output is accepted by [`parse_puzzle`].
#[must_use]
pub fn to_puzzle_file(grid: &DigitGrid) -> String {
    let mut out = String::with_capacity(9 * 19);
    for row in Position::ROWS {
        for (x, pos) in row.into_iter().enumerate() {
            let value = grid[pos].map_or(0, Digit::value);
            let sep = if x % 3 == 2 { ';' } else { ',' };
            out.push(char::from(b'0' + value));
            out.push(sep);
        }
        out.push('\n');
    }
    out
}
