//! Text renderings of a grid.

use std::fmt::Write as _;

use cellsync_core::{DigitGrid, Position};

const TOP: &str = "┏━━━━━━━┳━━━━━━━┳━━━━━━━┓";
const MIDDLE: &str = "┣━━━━━━━╋━━━━━━━╋━━━━━━━┫";
const BOTTOM: &str = "┗━━━━━━━┻━━━━━━━┻━━━━━━━┛";

/// Renders `grid` inside heavy box borders, leaving unresolved cells blank.
pub(crate) fn boxed(grid: &DigitGrid) -> String {
    let mut out = String::new();
    for (y, row) in Position::ROWS.iter().enumerate() {
        let border = match y {
            0 => TOP,
            3 | 6 => MIDDLE,
            _ => "",
        };
        if !border.is_empty() {
            out.push_str(border);
            out.push('\n');
        }
        for (x, pos) in row.iter().enumerate() {
            if x % 3 == 0 {
                out.push('┃');
            }
            out.push(' ');
            match grid[*pos] {
                Some(digit) => {
                    let _ = write!(out, "{digit}");
                }
                None => out.push(' '),
            }
            if x % 3 == 2 {
                out.push(' ');
            }
        }
        out.push_str("┃\n");
    }
    out.push_str(BOTTOM);
    out.push('\n');
    out
}

/// Renders `grid` on one line, row by row, with `.` for unresolved cells.
pub(crate) fn compact(grid: &DigitGrid) -> String {
    let mut out: String = Position::ALL
        .into_iter()
        .map(|pos| grid[pos].map_or('.', |digit| char::from(b'0' + digit.value())))
        .collect();
    out.push('\n');
    out
}
