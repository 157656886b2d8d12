use cellsync_core::Digit;

use super::{BoxedDeduction, Deduction, HouseView};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Hidden Single";

/// A deduction that places digits with only one position in a house.
///
/// A "hidden single" occurs when a digit can go in exactly one cell of a row,
/// column, or box, even though that cell may still have other candidates.
///
/// # Examples
///
/// ```
/// use cellsync_core::House;
/// use cellsync_engine::{
///     BoardSnapshot,
///     deduction::{Deduction, HiddenSingle, HouseView},
/// };
///
/// let snapshot = BoardSnapshot::new();
/// let view = HouseView::new(House::Row { y: 0 }, &snapshot);
/// let mut requests = Vec::new();
/// HiddenSingle::new().analyze(&view, &mut requests)?;
/// assert!(requests.is_empty());
/// # Ok::<(), cellsync_engine::Contradiction>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle {}

impl HiddenSingle {
    /// Creates a new `HiddenSingle` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for HiddenSingle {
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
        for digit in Digit::ALL {
            if let Some(i) = view.digit_cells(digit).as_single()
                && !view.cell(i).is_finalized()
            {
                out.push(UpdateRequest::set(view.position(i), digit));
            }
        }
        Ok(())
    }
}
