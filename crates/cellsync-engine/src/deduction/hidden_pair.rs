use super::{BoxedDeduction, Deduction, HouseView, hidden_subsets};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Hidden Pair";

/// A deduction that finds two digits confined to the same two cells of a
/// house.
///
/// When two unplaced digits can only go in the same two cells, those cells
/// must hold exactly those digits, so every other candidate is removed from
/// them.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenPair {}

impl HiddenPair {
    /// Creates a new `HiddenPair` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for HiddenPair {
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
        hidden_subsets(view, 2, out)
    }
}
