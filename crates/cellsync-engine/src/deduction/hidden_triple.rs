use super::{BoxedDeduction, Deduction, HouseView, hidden_subsets};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Hidden Triple";

/// A deduction that finds three digits confined to the same three cells of a
/// house.
///
/// Each digit of the triple needs two or three positions, and together they
/// may cover no more than three cells. Other candidates are removed from
/// those cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenTriple {}

impl HiddenTriple {
    /// Creates a new `HiddenTriple` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for HiddenTriple {
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
        hidden_subsets(view, 3, out)
    }
}
