//! Test utilities for deduction implementations.
//!
//! [`SnapshotBuilder`] assembles a board state by removing candidates, and
//! [`DeductionTester`] runs a deduction over every house of that board and
//! checks the resulting changes.

use cellsync_core::{Digit, DigitGrid, DigitSet, House, Position};

use crate::{
    BoardSnapshot, CellState, Contradiction, UpdateBatch, UpdateRequest,
    deduction::{Deduction, analyze_house},
};

/// Builds a [`BoardSnapshot`] for tests.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotBuilder {
    cells: [CellState; 81],
}

impl SnapshotBuilder {
    /// Starts from a board with every cell unresolved.
    pub(crate) fn new() -> Self {
        Self {
            cells: [CellState::unresolved(); 81],
        }
    }

    /// Removes `digits` from every cell in `positions`.
    #[track_caller]
    pub(crate) fn remove<P, D>(mut self, positions: P, digits: D) -> Self
    where
        P: IntoIterator<Item = Position>,
        D: IntoIterator<Item = Digit>,
    {
        let mask = DigitSet::from_iter(digits);
        for pos in positions {
            self = self.remove_mask(pos, mask);
        }
        self
    }

    /// Removes `mask` from the cell at `pos`.
    #[track_caller]
    pub(crate) fn remove_mask(mut self, pos: Position, mask: DigitSet) -> Self {
        let cell = &mut self.cells[pos.index()];
        if let Some(next) = cell.apply(pos, &UpdateRequest::clear(pos, mask)).unwrap() {
            *cell = next;
        }
        self
    }

    /// Finalizes `pos` to `digit` and removes `digit` from its peers.
    #[track_caller]
    pub(crate) fn place(mut self, pos: Position, digit: Digit) -> Self {
        self.cells[pos.index()] = CellState::solved(digit);
        self.remove(pos.peers(), [digit])
    }

    pub(crate) fn build(self) -> BoardSnapshot {
        BoardSnapshot::from_cells(self.cells)
    }
}

/// A test harness for verifying deduction implementations.
///
/// `DeductionTester` keeps the initial and current board. Applying a
/// deduction analyzes every house against the current board, then folds the
/// requests per cell and applies each batch once, as one engine round does.
///
/// All assertion methods panic with detailed messages on failure, using
/// `#[track_caller]` to report the correct source location.
#[derive(Debug)]
pub(crate) struct DeductionTester {
    initial: BoardSnapshot,
    current: BoardSnapshot,
    requests: Vec<UpdateRequest>,
}

impl DeductionTester {
    /// Creates a new tester from an initial board.
    pub(crate) fn new(initial: BoardSnapshot) -> Self {
        Self {
            current: initial.clone(),
            initial,
            requests: Vec::new(),
        }
    }

    /// Creates a tester from a grid string, placing each given and removing
    /// it from its peers.
    ///
    /// # Panics
    ///
    /// Panics if the string cannot be parsed as a grid.
    #[track_caller]
    pub(crate) fn from_str(s: &str) -> Self {
        let grid: DigitGrid = s.parse().unwrap();
        let builder = grid
            .givens()
            .fold(SnapshotBuilder::new(), |builder, (pos, digit)| {
                builder.place(pos, digit)
            });
        Self::new(builder.build())
    }

    fn analyze_all<T>(&self, deduction: &T) -> Result<Vec<UpdateRequest>, Contradiction>
    where
        T: Deduction,
    {
        let deductions = [deduction.clone_box()];
        let mut requests = Vec::new();
        for house in House::ALL {
            let (found, _) = analyze_house(&deductions, house, &self.current)?;
            requests.extend(found);
        }
        Ok(requests)
    }

    /// Runs the deduction over all houses and applies its requests.
    ///
    /// # Panics
    ///
    /// Panics if the deduction reports a contradiction or a request empties a
    /// cell.
    #[track_caller]
    pub(crate) fn apply_once<T>(mut self, deduction: &T) -> Self
    where
        T: Deduction,
    {
        let requests = self.analyze_all(deduction).unwrap();
        let mut batches = [UpdateBatch::new(); 81];
        for request in &requests {
            batches[request.target.index()].push(request);
        }
        let cells: [CellState; 81] = std::array::from_fn(|i| {
            let pos = Position::from_index(i);
            let cell = self.current.get(pos);
            let batch = batches[i];
            if batch.is_empty() {
                return cell;
            }
            cell.apply(pos, &batch.to_request(pos)).unwrap().unwrap_or(cell)
        });
        self.current = BoardSnapshot::from_cells(cells);
        self.requests.extend(requests);
        self
    }

    /// Runs the deduction over all houses and returns the contradiction it
    /// reports.
    ///
    /// # Panics
    ///
    /// Panics if no contradiction is reported.
    #[track_caller]
    pub(crate) fn analyze_err<T>(&self, deduction: &T) -> Contradiction
    where
        T: Deduction,
    {
        match self.analyze_all(deduction) {
            Ok(requests) => panic!(
                "Expected {} to report a contradiction, but it emitted {requests:?}",
                deduction.name()
            ),
            Err(err) => err,
        }
    }

    /// Asserts that a cell was finalized with the given digit.
    ///
    /// # Panics
    ///
    /// Panics if the cell was initially final or is not now final with
    /// `digit`.
    #[track_caller]
    pub(crate) fn assert_placed(self, pos: Position, digit: Digit) -> Self {
        let initial = self.initial.get(pos);
        let current = self.current.get(pos);
        assert!(
            !initial.is_finalized(),
            "Expected initial cell at {pos} to be unresolved, but it was {initial}"
        );
        assert_eq!(
            current.value(),
            Some(digit),
            "Expected cell at {pos} to be finalized as {digit}, but it is {current}"
        );
        self
    }

    /// Asserts that a cell's candidates are exactly `digits`.
    ///
    /// # Panics
    ///
    /// Panics if the candidates differ.
    #[track_caller]
    pub(crate) fn assert_candidates<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let current = self.current.candidates(pos);
        assert_eq!(
            current, digits,
            "Expected candidates at {pos} to be {digits}, but they are {current}"
        );
        self
    }

    /// Asserts that exactly the specified candidates were removed from a cell.
    ///
    /// # Panics
    ///
    /// Panics if the removed candidates don't exactly match the specified set.
    #[track_caller]
    pub(crate) fn assert_removed_exact<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates(pos);
        let current = self.current.candidates(pos);
        let removed = initial.difference(current);
        assert_eq!(
            removed, digits,
            "Expected exactly {digits} to be removed from {pos}, but removed candidates are {removed} (initial: {initial}, current: {current})"
        );
        self
    }

    /// Asserts that a cell's state has not changed.
    ///
    /// # Panics
    ///
    /// Panics if the cell differs from the initial state.
    #[track_caller]
    pub(crate) fn assert_no_change(self, pos: Position) -> Self {
        let initial = self.initial.get(pos);
        let current = self.current.get(pos);
        assert_eq!(
            initial, current,
            "Expected no change at {pos}, but it changed from {initial} to {current}"
        );
        self
    }

    /// Asserts that no requests were emitted.
    ///
    /// # Panics
    ///
    /// Panics if any request was emitted.
    #[track_caller]
    pub(crate) fn assert_no_requests(self) -> Self {
        assert!(
            self.requests.is_empty(),
            "Expected no requests, but got {:?}",
            self.requests
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_clears_peers() {
        let snapshot = SnapshotBuilder::new()
            .place(Position::new(4, 4), Digit::D5)
            .build();
        assert_eq!(snapshot.get(Position::new(4, 4)).value(), Some(Digit::D5));
        for peer in Position::new(4, 4).peers() {
            assert!(!snapshot.candidates(peer).contains(Digit::D5));
        }
        assert!(snapshot.candidates(Position::new(0, 0)).contains(Digit::D5));
    }

    #[test]
    fn test_from_str_places_givens() {
        let tester = DeductionTester::from_str(
            "
            1__ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
            ___ ___ __9
        ",
        );
        assert_eq!(tester.initial.finalized_count(), 2);
        assert!(!tester.initial.candidates(Position::new(8, 0)).contains(Digit::D1));
        assert!(!tester.initial.candidates(Position::new(8, 0)).contains(Digit::D9));
    }

    #[test]
    #[should_panic(expected = "Expected no change")]
    fn test_assert_no_change_detects_changes() {
        let snapshot = SnapshotBuilder::new()
            .remove(
                Position::ROWS[0].into_iter().filter(|pos| pos.x() != 0),
                [Digit::D3],
            )
            .build();
        DeductionTester::new(snapshot)
            .apply_once(&crate::deduction::HiddenSingle::new())
            .assert_no_change(Position::new(0, 0));
    }
}
