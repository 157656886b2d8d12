//! Round sequencing.
//!
//! The coordinator drives the solve through a fixed cycle of phases:
//!
//! ```text
//! Seeding -> Draining -> Applying -> Analyzing -> Draining -> ...
//!                            |            |
//!                            v            v
//!                          Done        Stalled
//! ```
//!
//! Each phase that involves the actors ends with a barrier: the coordinator
//! sends one command to every participating actor and waits for the same
//! number of acknowledgements.

use std::sync::atomic::{AtomicUsize, Ordering};

use cellsync_core::{DigitGrid, House, Position};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};

use crate::{
    Board, BoardSnapshot, EngineConfig, Outcome, Relay, RoundStats, SolveStats, SolverError,
    UpdateRequest, barrier,
    message::{Ack, Command},
};

/// A step of the coordinator's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    /// Staging one request per given.
    #[display("seeding")]
    Seeding,
    /// Forwarding staged requests to actor inboxes.
    #[display("draining")]
    Draining,
    /// Waiting for actors to apply their inboxes and commit.
    #[display("applying")]
    Applying,
    /// Running deductions on representative actors.
    #[display("analyzing")]
    Analyzing,
    /// Every cell is finalized.
    #[display("done")]
    Done,
    /// A round made no progress.
    #[display("stalled")]
    Stalled,
}

/// Returns the actor that analyzes `house`.
///
/// Rows are analyzed on the diagonal, columns one cell to the right of it
/// (wrapping), and boxes on their top-right cell, so each actor runs at most
/// two analyses per round.
#[must_use]
pub const fn representative(house: House) -> Position {
    match house {
        House::Row { y } => Position::new(y, y),
        House::Column { x } => Position::new(x, (x + 8) % 9),
        House::Box { index } => Position::new((index % 3) * 3 + 2, (index / 3) * 3),
    }
}

/// What the coordinator hands back when a solve finishes without error.
#[derive(Debug)]
pub(crate) struct Finished {
    pub(crate) outcome: Outcome,
    pub(crate) board: BoardSnapshot,
    pub(crate) stats: SolveStats,
    pub(crate) history: Vec<BoardSnapshot>,
}

pub(crate) struct Coordinator<'a> {
    config: &'a EngineConfig,
    board: &'a Board,
    relay: &'a Relay,
    completed: &'a AtomicUsize,
    inboxes: Vec<Sender<Command>>,
    acks: Receiver<Ack>,
    phase: Phase,
    round: usize,
    stats: SolveStats,
    history: Vec<BoardSnapshot>,
}

impl<'a> Coordinator<'a> {
    pub(crate) fn new(
        config: &'a EngineConfig,
        board: &'a Board,
        relay: &'a Relay,
        completed: &'a AtomicUsize,
        inboxes: Vec<Sender<Command>>,
        acks: Receiver<Ack>,
    ) -> Self {
        let names = config.deductions().iter().map(|d| d.name()).collect();
        Self {
            config,
            board,
            relay,
            completed,
            inboxes,
            acks,
            phase: Phase::Seeding,
            round: 0,
            stats: SolveStats::new(names),
            history: Vec::new(),
        }
    }

    fn transition(&mut self, phase: Phase) {
        debug!("round {}: {} -> {}", self.round, self.phase, phase);
        self.phase = phase;
    }

    fn send(&self, position: Position, command: Command) -> Result<(), SolverError> {
        self.inboxes[position.index()]
            .send(command)
            .map_err(|_| SolverError::ActorDisconnected { position })
    }

    fn broadcast(&self, command: Command) -> Result<(), SolverError> {
        Position::ALL
            .into_iter()
            .try_for_each(|pos| self.send(pos, command))
    }

    fn collect(&self, expected: usize) -> Result<Vec<Ack>, SolverError> {
        barrier::collect(
            &self.acks,
            self.phase,
            expected,
            self.config.barrier_timeout(),
        )
    }

    pub(crate) fn run(mut self, puzzle: &DigitGrid) -> Result<Finished, SolverError> {
        debug!("seeding {} givens", puzzle.filled_count());
        for (pos, digit) in puzzle.givens() {
            self.relay.stage(UpdateRequest::set(pos, digit))?;
        }

        loop {
            self.round += 1;
            let staged_before = self.relay.staged_count();

            self.transition(Phase::Draining);
            let delivered = self.relay.drain(&self.inboxes)?;

            self.transition(Phase::Applying);
            self.apply()?;
            let snapshot = self.board.snapshot();
            snapshot.check_consistency()?;
            if self.config.records_history() {
                self.history.push(snapshot.clone());
            }
            let staged_after_apply = self.relay.staged_count();
            let finalized = self.completed.load(Ordering::Acquire);
            let mut round = RoundStats {
                round: self.round,
                delivered,
                staged_by_finalization: staged_after_apply - staged_before,
                staged_by_analysis: 0,
                finalized,
            };

            if finalized == Position::ALL.len() {
                self.stats.push_round(round);
                self.transition(Phase::Done);
                return Ok(self.finish(Outcome::Solved, snapshot));
            }

            self.transition(Phase::Analyzing);
            self.analyze()?;
            round.staged_by_analysis = self.relay.staged_count() - staged_after_apply;
            self.stats.push_round(round);

            if round.staged() == 0 {
                self.transition(Phase::Stalled);
                warn!(
                    "stalled after {} rounds with {finalized} of 81 cells finalized",
                    self.round
                );
                return Ok(self.finish(Outcome::Stalled, snapshot));
            }
        }
    }

    fn finish(self, outcome: Outcome, board: BoardSnapshot) -> Finished {
        Finished {
            outcome,
            board,
            stats: self.stats,
            history: self.history,
        }
    }

    /// Runs the quiesce and commit barriers.
    fn apply(&mut self) -> Result<(), SolverError> {
        self.broadcast(Command::Quiesce { round: self.round })?;
        let acks = self.collect(Position::ALL.len())?;
        let mut changed = 0;
        let mut first_error: Option<(Position, SolverError)> = None;
        for ack in acks {
            if let Ack::Quiesced {
                position,
                changed: cell_changed,
                error,
            } = ack
            {
                changed += usize::from(cell_changed);
                if let Some(error) = error
                    && first_error.as_ref().is_none_or(|(first, _)| position < *first)
                {
                    first_error = Some((position, error));
                }
            }
        }
        if let Some((_, error)) = first_error {
            return Err(error);
        }
        debug!("round {}: {changed} cells changed", self.round);

        self.broadcast(Command::Commit)?;
        self.collect(Position::ALL.len())?;
        Ok(())
    }

    /// Runs one analysis per house and waits for all of them.
    fn analyze(&mut self) -> Result<(), SolverError> {
        for house in House::ALL {
            self.send(representative(house), Command::Analyze(house))?;
        }
        let acks = self.collect(House::ALL.len())?;
        let mut first_error: Option<(House, SolverError)> = None;
        for ack in acks {
            if let Ack::Analyzed { house, result } = ack {
                match result {
                    Ok(counts) => self.stats.add_applications(&counts),
                    Err(error) => {
                        if first_error.as_ref().is_none_or(|(first, _)| house < *first) {
                            first_error = Some((house, error));
                        }
                    }
                }
            }
        }
        match first_error {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }
}
