use super::{BoxedDeduction, Deduction, HouseView, naked_subsets};
use crate::{Contradiction, UpdateRequest};

const NAME: &str = "Naked Pair";

/// A deduction that finds two cells of a house with the same two candidates.
///
/// The two digits must occupy those two cells, so they are removed from
/// every other cell of the house. A third cell restricted to the same pair
/// is a [`Contradiction::SubsetConflict`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedPair {}

impl NakedPair {
    /// Creates a new `NakedPair` deduction.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl Deduction for NakedPair {
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
        naked_subsets(view, 2, out)
    }
}
