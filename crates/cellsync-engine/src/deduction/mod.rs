//! Deduction rules run over a single house.
//!
//! Each deduction implements the [`Deduction`] trait. It inspects one house of
//! a committed [`BoardSnapshot`] and emits [`UpdateRequest`]s that remove
//! candidates the house rules out. Deductions never mutate the board; the
//! requests they produce are staged and delivered in the next round.
//!
//! Every deduction emits only requests that would change the snapshot, so a
//! board at a fixed point produces no requests.

use std::fmt::Debug;

use cellsync_core::{Digit, DigitSet, House, HouseMask, Position};

pub use self::{
    hidden_pair::HiddenPair, hidden_single::HiddenSingle, hidden_triple::HiddenTriple,
    locked_candidates::LockedCandidates, naked_pair::NakedPair, naked_triple::NakedTriple,
};
use crate::{BoardSnapshot, CellState, Contradiction, UpdateRequest};

mod hidden_pair;
mod hidden_single;
mod hidden_triple;
mod locked_candidates;
mod naked_pair;
mod naked_triple;

/// Returns every available deduction.
///
/// Deductions are ordered from simplest to most involved.
///
/// # Examples
///
/// ```
/// use cellsync_engine::deduction;
///
/// let names: Vec<_> = deduction::all_deductions().iter().map(|d| d.name()).collect();
/// assert_eq!(names[0], "Hidden Single");
/// assert_eq!(names.len(), 6);
/// ```
#[must_use]
pub fn all_deductions() -> Vec<BoxedDeduction> {
    let mut deductions = basic_deductions();
    deductions.extend([
        Box::new(HiddenPair::new()) as BoxedDeduction,
        Box::new(HiddenTriple::new()),
        Box::new(NakedPair::new()),
        Box::new(NakedTriple::new()),
    ]);
    deductions
}

/// Returns the hidden single and locked candidates deductions.
#[must_use]
pub fn basic_deductions() -> Vec<BoxedDeduction> {
    let mut deductions = fundamental_deductions();
    deductions.push(Box::new(LockedCandidates::new()));
    deductions
}

/// Returns the fundamental deduction set: hidden singles only.
///
/// Naked singles need no deduction of their own; a cell finalizes as soon as
/// one candidate remains.
#[must_use]
pub fn fundamental_deductions() -> Vec<BoxedDeduction> {
    vec![Box::new(HiddenSingle::new())]
}

/// A deduction rule over one house.
pub trait Deduction: Debug + Send + Sync {
    /// Returns the name of the deduction.
    fn name(&self) -> &'static str;

    /// Returns a boxed clone of the deduction.
    fn clone_box(&self) -> BoxedDeduction;

    /// Analyzes one house and appends the resulting requests to `out`.
    ///
    /// Requests may target cells outside the house.
    ///
    /// # Errors
    ///
    /// Returns a [`Contradiction`] if the house cannot be completed.
    fn analyze(&self, view: &HouseView<'_>, out: &mut Vec<UpdateRequest>)
    -> Result<(), Contradiction>;
}

/// A boxed deduction.
pub type BoxedDeduction = Box<dyn Deduction>;

impl Clone for BoxedDeduction {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Runs `deductions` over `house`.
///
/// Before any deduction runs, every digit must still have at least one
/// position in the house. Returns the requests in deduction order together
/// with the number each deduction produced.
///
/// # Errors
///
/// Returns [`Contradiction::NoPositionForDigit`] if a digit has nowhere to go,
/// or the first contradiction reported by a deduction.
pub fn analyze_house(
    deductions: &[BoxedDeduction],
    house: House,
    snapshot: &BoardSnapshot,
) -> Result<(Vec<UpdateRequest>, Vec<usize>), Contradiction> {
    let view = HouseView::new(house, snapshot);
    view.check_coverage()?;
    let mut requests = Vec::new();
    let mut counts = Vec::with_capacity(deductions.len());
    for deduction in deductions {
        let before = requests.len();
        deduction.analyze(&view, &mut requests)?;
        counts.push(requests.len() - before);
    }
    Ok((requests, counts))
}

/// The cells of one house as seen in a snapshot, addressed by cell index.
#[derive(Debug, Clone)]
pub struct HouseView<'a> {
    house: House,
    snapshot: &'a BoardSnapshot,
    positions: [Position; 9],
    cells: [CellState; 9],
    digit_cells: [HouseMask; 9],
}

impl<'a> HouseView<'a> {
    /// Creates a view of `house`.
    #[must_use]
    pub fn new(house: House, snapshot: &'a BoardSnapshot) -> Self {
        let positions = house.positions();
        let cells = positions.map(|pos| snapshot.get(pos));
        let mut digit_cells = [HouseMask::new(); 9];
        for (i, cell) in (0..).zip(cells) {
            for digit in cell.candidates() {
                digit_cells[usize::from(digit.index())].insert(i);
            }
        }
        Self {
            house,
            snapshot,
            positions,
            cells,
            digit_cells,
        }
    }

    /// Returns the house.
    #[must_use]
    pub fn house(&self) -> House {
        self.house
    }

    /// Returns the whole snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &'a BoardSnapshot {
        self.snapshot
    }

    /// Returns the position of cell `i`.
    #[must_use]
    pub fn position(&self, i: u8) -> Position {
        self.positions[usize::from(i)]
    }

    /// Returns the state of cell `i`.
    #[must_use]
    pub fn cell(&self, i: u8) -> CellState {
        self.cells[usize::from(i)]
    }

    /// Returns the cells where `digit` is still a candidate.
    #[must_use]
    pub fn digit_cells(&self, digit: Digit) -> HouseMask {
        self.digit_cells[usize::from(digit.index())]
    }

    /// Returns `true` if a finalized cell of the house holds `digit`.
    #[must_use]
    pub fn is_placed(&self, digit: Digit) -> bool {
        self.digit_cells(digit)
            .iter()
            .any(|i| self.cell(i).value() == Some(digit))
    }

    /// Returns the digits not yet finalized in the house.
    #[must_use]
    pub fn unplaced_digits(&self) -> DigitSet {
        Digit::ALL
            .into_iter()
            .filter(|digit| !self.is_placed(*digit))
            .collect()
    }

    /// Returns the cells that are not finalized.
    #[must_use]
    pub fn unresolved_cells(&self) -> HouseMask {
        (0..9).filter(|i| !self.cell(*i).is_finalized()).collect()
    }

    /// Checks that every digit has at least one position in the house.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction::NoPositionForDigit`] for the smallest digit
    /// with no position.
    pub fn check_coverage(&self) -> Result<(), Contradiction> {
        match Digit::ALL
            .into_iter()
            .find(|digit| self.digit_cells(*digit).is_empty())
        {
            Some(digit) => Err(Contradiction::NoPositionForDigit {
                house: self.house,
                digit,
            }),
            None => Ok(()),
        }
    }
}

/// Appends `Clear(mask)` for `pos` if it would remove a candidate.
fn push_clear(
    snapshot: &BoardSnapshot,
    pos: Position,
    mask: DigitSet,
    out: &mut Vec<UpdateRequest>,
) {
    let cell = snapshot.get(pos);
    if !cell.is_finalized() && cell.candidates().intersects(mask) {
        out.push(UpdateRequest::clear(pos, mask));
    }
}

/// Calls `f` with every `k`-element combination of `items`, in lexicographic
/// order, stopping at the first error.
fn for_each_combination<T, F>(items: &[T], k: usize, mut f: F) -> Result<(), Contradiction>
where
    T: Copy,
    F: FnMut(&[T]) -> Result<(), Contradiction>,
{
    fn recurse<T, F>(
        items: &[T],
        k: usize,
        start: usize,
        current: &mut Vec<T>,
        f: &mut F,
    ) -> Result<(), Contradiction>
    where
        T: Copy,
        F: FnMut(&[T]) -> Result<(), Contradiction>,
    {
        if current.len() == k {
            return f(current);
        }
        for i in start..items.len() {
            current.push(items[i]);
            recurse(items, k, i + 1, current, f)?;
            current.pop();
        }
        Ok(())
    }

    let mut current = Vec::with_capacity(k);
    recurse(items, k, 0, &mut current, &mut f)
}

/// Finds `size` digits whose positions together span `size` cells and clears
/// every other digit from those cells.
///
/// Only unplaced digits with between 2 and `size` positions form groups. More
/// digits confined to the group's cells than there are cells is a
/// [`Contradiction::SubsetConflict`].
fn hidden_subsets(
    view: &HouseView<'_>,
    size: usize,
    out: &mut Vec<UpdateRequest>,
) -> Result<(), Contradiction> {
    let digits: Vec<Digit> = view
        .unplaced_digits()
        .into_iter()
        .filter(|digit| (2..=size).contains(&view.digit_cells(*digit).len()))
        .collect();
    for_each_combination(&digits, size, |group| {
        let cells = group
            .iter()
            .fold(HouseMask::new(), |acc, digit| acc | view.digit_cells(*digit));
        if cells.len() > size {
            return Ok(());
        }
        let confined: DigitSet = view
            .unplaced_digits()
            .into_iter()
            .filter(|digit| {
                let positions = view.digit_cells(*digit);
                !positions.is_empty() && (positions | cells) == cells
            })
            .collect();
        if cells.len() < size || confined.len() > size {
            return Err(Contradiction::SubsetConflict {
                house: view.house(),
                digits: confined,
            });
        }
        let subset: DigitSet = group.iter().copied().collect();
        for i in cells {
            push_clear(view.snapshot(), view.position(i), !subset, out);
        }
        Ok(())
    })
}

/// Finds `size` unresolved cells whose candidates together cover `size`
/// digits and clears those digits from every other cell of the house.
///
/// Only cells with between 2 and `size` candidates take part. More cells
/// confined to the digits than there are digits is a
/// [`Contradiction::SubsetConflict`].
fn naked_subsets(
    view: &HouseView<'_>,
    size: usize,
    out: &mut Vec<UpdateRequest>,
) -> Result<(), Contradiction> {
    let cells: Vec<u8> = view
        .unresolved_cells()
        .into_iter()
        .filter(|i| (2..=size).contains(&view.cell(*i).candidates().len()))
        .collect();
    for_each_combination(&cells, size, |group| {
        let digits = group
            .iter()
            .fold(DigitSet::EMPTY, |acc, i| acc | view.cell(*i).candidates());
        if digits.len() > size {
            return Ok(());
        }
        let confined: HouseMask = view
            .unresolved_cells()
            .into_iter()
            .filter(|i| view.cell(*i).candidates().is_subset(digits))
            .collect();
        if digits.len() < size || confined.len() > size {
            return Err(Contradiction::SubsetConflict {
                house: view.house(),
                digits,
            });
        }
        for i in view.unresolved_cells() {
            if !group.contains(&i) {
                push_clear(view.snapshot(), view.position(i), digits, out);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SnapshotBuilder;

    #[test]
    fn test_rule_sets_are_nested() {
        let names = |deductions: Vec<BoxedDeduction>| -> Vec<&'static str> {
            deductions.iter().map(|d| d.name()).collect()
        };
        assert_eq!(names(fundamental_deductions()), vec!["Hidden Single"]);
        assert_eq!(
            names(basic_deductions()),
            vec!["Hidden Single", "Locked Candidates"]
        );
        let all = names(all_deductions());
        assert_eq!(&all[..2], &["Hidden Single", "Locked Candidates"]);
        assert!(all.contains(&"Naked Triple"));
    }

    #[test]
    fn test_missing_digit_is_reported_before_any_deduction() {
        let snapshot = SnapshotBuilder::new()
            .remove(Position::ROWS[2], [Digit::D4])
            .build();
        let result = analyze_house(&all_deductions(), House::Row { y: 2 }, &snapshot);
        assert_eq!(
            result,
            Err(Contradiction::NoPositionForDigit {
                house: House::Row { y: 2 },
                digit: Digit::D4,
            })
        );
    }

    #[test]
    fn test_fixed_point_emits_nothing() {
        let snapshot = BoardSnapshot::new();
        for house in House::ALL {
            let (requests, counts) = analyze_house(&all_deductions(), house, &snapshot).unwrap();
            assert!(requests.is_empty());
            assert!(counts.iter().all(|count| *count == 0));
        }
    }

    #[test]
    fn test_combinations_are_lexicographic() {
        let mut seen = Vec::new();
        for_each_combination(&[1, 2, 3, 4], 2, |group| {
            seen.push(group.to_vec());
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4],
            ]
        );
    }

    #[test]
    fn test_house_view_indexes_digits_by_cell() {
        let snapshot = SnapshotBuilder::new()
            .remove(Position::BOXES[0][1..].iter().copied(), [Digit::D2])
            .build();
        let view = HouseView::new(House::Box { index: 0 }, &snapshot);
        assert_eq!(view.digit_cells(Digit::D2).as_single(), Some(0));
        assert_eq!(view.digit_cells(Digit::D3).len(), 9);
        assert_eq!(view.unplaced_digits(), DigitSet::FULL);
        assert_eq!(view.unresolved_cells().len(), 9);
    }
}
