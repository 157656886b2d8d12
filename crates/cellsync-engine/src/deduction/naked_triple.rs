use super::{BoxedDeduction, Deduction, HouseView, naked_subsets};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Naked Triple";

/// A deduction that finds three cells of a house whose candidates together
/// are exactly three digits.
///
/// Each cell of the triple holds two or three of the digits. The digits are
/// removed from every other cell of the house.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedTriple {}

impl NakedTriple {
    /// Creates a new `NakedTriple` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for NakedTriple {
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
        naked_subsets(view, 3, out)
    }
}
