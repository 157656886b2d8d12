use std::io;

use cellsync_core::{Digit, DigitSet, House, Position};

use crate::coordinator::Phase;

/// A logical inconsistency found in the puzzle while solving.
///
/// Contradictions mean the givens admit no solution (or that a contradiction
/// was derived from them); they are never caused by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Contradiction {
    /// An update would leave a cell without candidates.
    #[display("no candidates left at {position}")]
    EmptyCandidates {
        /// The cell that ran out of candidates.
        position: Position,
    },
    /// A digit has no remaining position in a house.
    #[display("digit {digit} has no position in {house}")]
    NoPositionForDigit {
        /// The house being analyzed.
        house: House,
        /// The digit with no position.
        digit: Digit,
    },
    /// Two finalized cells in one house hold the same digit.
    #[display("digit {digit} appears twice in {house}")]
    DuplicateValue {
        /// The house holding the duplicate.
        house: House,
        /// The duplicated digit.
        digit: Digit,
    },
    /// A group of digits is confined to fewer cells than it has members.
    #[display("digits {digits} cannot all be placed in {house}")]
    SubsetConflict {
        /// The house being analyzed.
        house: House,
        /// The digits of the conflicting group.
        digits: DigitSet,
    },
}

/// Errors that abort a solve.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolverError {
    /// The puzzle is contradictory.
    #[display("contradiction: {_0}")]
    #[from]
    Contradiction(Contradiction),
    /// More requests were staged in one round than the relay can hold.
    #[display("relay overflow: more than {capacity} requests staged in one round")]
    RelayOverflow {
        /// Configured relay capacity.
        capacity: usize,
    },
    /// A request could not be delivered because the target actor is gone.
    #[display("actor {position} disconnected")]
    ActorDisconnected {
        /// The unreachable actor.
        position: Position,
    },
    /// Every actor dropped its acknowledgement sender.
    #[display("barrier acknowledgement channel disconnected")]
    BarrierDisconnected,
    /// An actor thread panicked.
    #[display("actor {position} panicked")]
    ActorPanicked {
        /// The actor whose thread panicked.
        position: Position,
    },
    /// A barrier did not complete within the configured timeout.
    #[display("barrier timeout in {phase}: {received} of {expected} acknowledgements")]
    BarrierTimeout {
        /// Phase the coordinator was waiting in.
        phase: Phase,
        /// Acknowledgements received before the timeout.
        received: usize,
        /// Acknowledgements expected.
        expected: usize,
    },
    /// An actor was still unresolved when the solve was reported as solved.
    #[display("actor {position} not finalized at shutdown")]
    UnfinalizedAtShutdown {
        /// The unresolved actor.
        position: Position,
    },
    /// An actor thread could not be spawned.
    #[display("failed to spawn actor thread")]
    #[from]
    Spawn(io::Error),
    /// The engine configuration is unusable.
    #[display("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: &'static str,
    },
}

impl SolverError {
    /// Returns the contradiction if this error is one.
    #[must_use]
    pub fn as_contradiction(&self) -> Option<&Contradiction> {
        match self {
            Self::Contradiction(contradiction) => Some(contradiction),
            _ => None,
        }
    }
}
