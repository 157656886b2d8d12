//! Per-cell state and its transition rules.

use std::fmt::{self, Display};

use cellsync_core::{Digit, DigitSet, Position};

use crate::{Contradiction, UpdateKind, UpdateRequest};

const FINALIZED_BIT: u16 = 1 << 15;

/// The state of one cell: its remaining candidates and whether it is final.
///
/// A cell is finalized exactly when one candidate remains; once finalized it
/// never changes again. The packed `u16` form stores the candidate mask in
/// bits 0-8 and the finalized flag in bit 15.
///
/// # Examples
///
/// ```
/// use cellsync_core::{Digit, DigitSet};
/// use cellsync_engine::CellState;
///
/// let cell = CellState::unresolved();
/// assert_eq!(cell.candidates(), DigitSet::FULL);
/// assert!(!cell.is_finalized());
///
/// let solved = CellState::solved(Digit::D4);
/// assert_eq!(solved.value(), Some(Digit::D4));
/// assert_eq!(CellState::unpack(solved.pack()), Some(solved));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellState {
    candidates: DigitSet,
    finalized: bool,
}

impl Default for CellState {
    fn default() -> Self {
        Self::unresolved()
    }
}

impl CellState {
    /// A cell with every digit still possible.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            candidates: DigitSet::FULL,
            finalized: false,
        }
    }

    /// A finalized cell holding `digit`.
    #[must_use]
    pub const fn solved(digit: Digit) -> Self {
        Self {
            candidates: DigitSet::from_elem(digit),
            finalized: true,
        }
    }

    /// Returns the remaining candidates.
    #[must_use]
    pub const fn candidates(self) -> DigitSet {
        self.candidates
    }

    /// Returns `true` once the cell has settled on a single digit.
    #[must_use]
    pub const fn is_finalized(self) -> bool {
        self.finalized
    }

    /// Returns the digit of a finalized cell.
    #[must_use]
    pub fn value(self) -> Option<Digit> {
        if self.finalized {
            self.candidates.as_single()
        } else {
            None
        }
    }

    /// Packs the state into a `u16`.
    #[must_use]
    pub const fn pack(self) -> u16 {
        let flag = if self.finalized { FINALIZED_BIT } else { 0 };
        self.candidates.bits() | flag
    }

    /// Unpacks a state produced by [`pack`](Self::pack).
    ///
    /// Returns `None` for bit patterns no valid state packs to.
    #[must_use]
    pub fn unpack(bits: u16) -> Option<Self> {
        let finalized = bits & FINALIZED_BIT != 0;
        let candidates = DigitSet::from_bits(bits & !FINALIZED_BIT)?;
        if finalized && candidates.len() != 1 {
            return None;
        }
        Some(Self {
            candidates,
            finalized,
        })
    }

    /// Decodes a packed state without validating it.
    pub(crate) const fn from_packed(bits: u16) -> Self {
        Self {
            candidates: match DigitSet::from_bits(bits & DigitSet::FULL.bits()) {
                Some(candidates) => candidates,
                None => DigitSet::EMPTY,
            },
            finalized: bits & FINALIZED_BIT != 0,
        }
    }

    /// Applies an update addressed to the cell at `position`.
    ///
    /// Returns the new state, or `None` if the update leaves the cell as it
    /// was. Finalized cells ignore every update.
    ///
    /// - `Set` narrows the candidates to the request mask. The result is
    ///   intersected with the current candidates, so candidates never grow.
    /// - `Clear` removes the request mask from the candidates.
    ///
    /// Either kind finalizes the cell when exactly one candidate remains.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction::EmptyCandidates`] if the update would leave the
    /// cell with no candidates.
    pub fn apply(
        self,
        position: Position,
        request: &UpdateRequest,
    ) -> Result<Option<Self>, Contradiction> {
        if self.finalized {
            return Ok(None);
        }
        let new = match request.kind {
            UpdateKind::Set => self.candidates & request.mask,
            UpdateKind::Clear => self.candidates.difference(request.mask),
        };
        if new.is_empty() {
            return Err(Contradiction::EmptyCandidates { position });
        }
        if new == self.candidates {
            return Ok(None);
        }
        Ok(Some(Self {
            candidates: new,
            finalized: new.len() == 1,
        }))
    }
}

/// Formats a finalized cell as its digit and an unresolved cell as its
/// candidate list, e.g. `[1357]`.
impl Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(digit) => Display::fmt(&digit, f),
            None => Display::fmt(&self.candidates, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const POS: Position = Position::new(3, 5);

    fn digits(ds: &[Digit]) -> DigitSet {
        ds.iter().copied().collect()
    }

    #[test]
    fn test_set_finalizes_unresolved_cell() {
        let cell = CellState::unresolved();
        let next = cell
            .apply(POS, &UpdateRequest::set(POS, Digit::D7))
            .unwrap()
            .unwrap();
        assert_eq!(next, CellState::solved(Digit::D7));
    }

    #[test]
    fn test_set_never_grows_candidates() {
        let cell = CellState::unresolved()
            .apply(POS, &UpdateRequest::clear(POS, digits(&[Digit::D1, Digit::D2])))
            .unwrap()
            .unwrap();
        let next = cell
            .apply(POS, &UpdateRequest::set_mask(POS, DigitSet::FULL))
            .unwrap();
        assert_eq!(next, None);

        let next = cell
            .apply(POS, &UpdateRequest::set_mask(POS, digits(&[Digit::D1, Digit::D3])))
            .unwrap()
            .unwrap();
        assert_eq!(next, CellState::solved(Digit::D3));
    }

    #[test]
    fn test_clear_to_single_candidate_finalizes() {
        let cell = CellState::unresolved();
        let next = cell
            .apply(POS, &UpdateRequest::clear(POS, !DigitSet::from_elem(Digit::D2)))
            .unwrap()
            .unwrap();
        assert!(next.is_finalized());
        assert_eq!(next.value(), Some(Digit::D2));
    }

    #[test]
    fn test_clear_of_absent_digit_is_noop() {
        let cell = CellState::unresolved()
            .apply(POS, &UpdateRequest::clear(POS, DigitSet::from_elem(Digit::D9)))
            .unwrap()
            .unwrap();
        let again = cell.apply(POS, &UpdateRequest::clear(POS, DigitSet::from_elem(Digit::D9)));
        assert_eq!(again, Ok(None));
    }

    #[test]
    fn test_finalized_cell_ignores_updates() {
        let cell = CellState::solved(Digit::D5);
        assert_eq!(
            cell.apply(POS, &UpdateRequest::clear(POS, DigitSet::FULL)),
            Ok(None)
        );
        assert_eq!(cell.apply(POS, &UpdateRequest::set(POS, Digit::D1)), Ok(None));
    }

    #[test]
    fn test_emptying_candidates_is_a_contradiction() {
        let cell = CellState::unresolved();
        assert_eq!(
            cell.apply(POS, &UpdateRequest::clear(POS, DigitSet::FULL)),
            Err(Contradiction::EmptyCandidates { position: POS })
        );

        let two = CellState::unresolved()
            .apply(POS, &UpdateRequest::set_mask(POS, digits(&[Digit::D1, Digit::D2])))
            .unwrap()
            .unwrap();
        assert_eq!(
            two.apply(POS, &UpdateRequest::set(POS, Digit::D3)),
            Err(Contradiction::EmptyCandidates { position: POS })
        );
    }

    #[test]
    fn test_pack_rejects_invalid_patterns() {
        assert_eq!(CellState::unpack(FINALIZED_BIT | 0b11), None);
        assert_eq!(CellState::unpack(0x200), None);
        assert_eq!(
            CellState::unpack(0),
            Some(CellState {
                candidates: DigitSet::EMPTY,
                finalized: false,
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellState::solved(Digit::D8).to_string(), "8");
        assert_eq!(CellState::unresolved().to_string(), "[123456789]");
    }

    fn update_request() -> impl Strategy<Value = UpdateRequest> {
        (any::<bool>(), 0u16..=0x1ff).prop_map(|(set, bits)| {
            let mask = DigitSet::from_bits(bits).unwrap();
            if set {
                UpdateRequest::set_mask(POS, mask)
            } else {
                UpdateRequest::clear(POS, mask)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_candidates_only_shrink(requests in proptest::collection::vec(update_request(), 0..20)) {
            let mut cell = CellState::unresolved();
            for request in &requests {
                match cell.apply(POS, request) {
                    Ok(Some(next)) => {
                        prop_assert!(next.candidates().is_subset(cell.candidates()));
                        prop_assert_ne!(next.candidates(), cell.candidates());
                        prop_assert_eq!(next.is_finalized(), next.candidates().len() == 1);
                        cell = next;
                    }
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
            prop_assert_eq!(CellState::unpack(cell.pack()), Some(cell));
        }
    }
}
