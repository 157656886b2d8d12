use std::fmt::{self, Display};

use cellsync_core::{Digit, DigitSet, Position};

/// What an [`UpdateRequest`] does to its target's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum UpdateKind {
    /// Narrow the candidates to the mask.
    Set,
    /// Remove the mask from the candidates.
    Clear,
}

/// A request to change one cell's candidates.
///
/// Requests are produced by finalizing cells and by deductions, staged in the
/// relay, and consumed once by the target cell's actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateRequest {
    /// The cell to update.
    pub target: Position,
    /// Whether to narrow or remove.
    pub kind: UpdateKind,
    /// The digits the update refers to.
    pub mask: DigitSet,
}

impl UpdateRequest {
    /// Requests that `target` be set to `digit`.
    #[must_use]
    pub const fn set(target: Position, digit: Digit) -> Self {
        Self::set_mask(target, DigitSet::from_elem(digit))
    }

    /// Requests that `target`'s candidates be narrowed to `mask`.
    #[must_use]
    pub const fn set_mask(target: Position, mask: DigitSet) -> Self {
        Self {
            target,
            kind: UpdateKind::Set,
            mask,
        }
    }

    /// Requests that `mask` be removed from `target`'s candidates.
    #[must_use]
    pub const fn clear(target: Position, mask: DigitSet) -> Self {
        Self {
            target,
            kind: UpdateKind::Clear,
            mask,
        }
    }
}

impl Display for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            UpdateKind::Set => "set",
            UpdateKind::Clear => "clear",
        };
        write!(f, "{verb} {} at {}", self.mask, self.target)
    }
}

/// The combined effect of every update a cell receives in one round.
///
/// Pushing keeps the intersection of all `Set` masks minus the union of all
/// `Clear` masks, so the result does not depend on the order requests arrive
/// in.
///
/// # Examples
///
/// ```
/// use cellsync_core::{Digit, DigitSet, Position};
/// use cellsync_engine::{UpdateBatch, UpdateRequest};
///
/// let pos = Position::new(0, 0);
/// let mut batch = UpdateBatch::new();
/// batch.push(&UpdateRequest::clear(pos, DigitSet::from_elem(Digit::D1)));
/// batch.push(&UpdateRequest::set_mask(pos, [Digit::D1, Digit::D2].into_iter().collect()));
/// assert_eq!(batch.kept(), DigitSet::from_elem(Digit::D2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateBatch {
    kept: DigitSet,
    len: usize,
}

impl Default for UpdateBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateBatch {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kept: DigitSet::FULL,
            len: 0,
        }
    }

    /// Folds `request` into the batch.
    pub fn push(&mut self, request: &UpdateRequest) {
        self.kept = match request.kind {
            UpdateKind::Set => self.kept & request.mask,
            UpdateKind::Clear => self.kept.difference(request.mask),
        };
        self.len += 1;
    }

    /// Returns the digits every request in the batch allows.
    #[must_use]
    pub const fn kept(&self) -> DigitSet {
        self.kept
    }

    /// Returns the number of requests folded in.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no request has been folded in.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Empties the batch, returning what it held.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns a single request with the same effect as the whole batch.
    #[must_use]
    pub const fn to_request(&self, target: Position) -> UpdateRequest {
        UpdateRequest::set_mask(target, self.kept)
    }
}

impl<'a> Extend<&'a UpdateRequest> for UpdateBatch {
    fn extend<I: IntoIterator<Item = &'a UpdateRequest>>(&mut self, iter: I) {
        for request in iter {
            self.push(request);
        }
    }
}
