use cellsync_core::{House, Position};

use crate::{SolverError, UpdateRequest};

/// A command sent to a cell actor's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Queue an update for the actor's cell.
    Update(UpdateRequest),
    /// Apply the updates queued this round as one batch and acknowledge.
    Quiesce {
        /// The round being closed.
        round: usize,
    },
    /// Publish the actor's cell into the committed board.
    Commit,
    /// Run the configured deductions over a house.
    Analyze(House),
}

/// A barrier acknowledgement sent from an actor to the coordinator.
#[derive(Debug)]
pub(crate) enum Ack {
    /// Reply to [`Command::Quiesce`].
    Quiesced {
        position: Position,
        changed: bool,
        error: Option<SolverError>,
    },
    /// Reply to [`Command::Commit`].
    Committed,
    /// Reply to [`Command::Analyze`], carrying the number of requests each
    /// deduction staged.
    Analyzed {
        house: House,
        result: Result<Vec<usize>, SolverError>,
    },
}
