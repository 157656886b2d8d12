use std::{
    sync::{OnceLock, atomic::AtomicUsize},
    thread,
};

use cellsync_core::{DigitGrid, Position};
use log::{debug, info};

use crate::{
    Board, EngineConfig, Relay, SolveReport, SolverError,
    actor::{ActorContext, CellActor},
    coordinator::{Coordinator, Finished},
    signal::{ShutdownSignal, Termination},
};

/// The solving engine.
///
/// Each call to [`solve`](Self::solve) starts one thread per cell, runs the
/// round coordinator on the calling thread, and joins every actor before
/// returning.
///
/// # Examples
///
/// ```
/// use cellsync_core::DigitGrid;
/// use cellsync_engine::Engine;
///
/// let puzzle: DigitGrid = "
///     53_ _7_ ___
///     6__ 195 ___
///     _98 ___ _6_
///     8__ _6_ __3
///     4__ 8_3 __1
///     7__ _2_ __6
///     _6_ ___ 28_
///     ___ 419 __5
///     ___ _8_ _79
/// "
/// .parse()?;
///
/// let report = Engine::default().solve(&puzzle)?;
/// assert!(report.outcome.is_solved());
/// assert!(report.grid().is_full());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Solves `puzzle` by deduction.
    ///
    /// A puzzle the configured deductions cannot finish is not an error; the
    /// report's outcome is [`Outcome::Stalled`](crate::Outcome::Stalled) and
    /// its board holds whatever was deduced.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Contradiction`] if the puzzle is inconsistent,
    /// or another [`SolverError`] if the engine itself fails. Every actor has
    /// been shut down and joined when this returns.
    pub fn solve(&self, puzzle: &DigitGrid) -> Result<SolveReport, SolverError> {
        self.config.validate()?;
        let config = &self.config;

        let board = Board::new();
        let relay = Relay::new(config.relay_capacity());
        let completed = AtomicUsize::new(0);
        let termination = OnceLock::new();
        let (ack_sender, ack_receiver) = crossbeam_channel::unbounded();
        let (change_sender, change_receiver) = if config.records_changes() {
            let (sender, receiver) = crossbeam_channel::unbounded();
            (Some(sender), Some(receiver))
        } else {
            (None, None)
        };

        let finished = thread::scope(|scope| {
            let (signal, listener) = ShutdownSignal::new(&termination);
            let context = ActorContext {
                board: &board,
                relay: &relay,
                completed: &completed,
                deductions: config.deductions(),
                acks: ack_sender,
                changes: change_sender,
            };

            let mut inboxes = Vec::with_capacity(Position::ALL.len());
            let mut handles = Vec::with_capacity(Position::ALL.len());
            let mut spawn_error = None;
            for pos in Position::ALL {
                let (sender, receiver) = crossbeam_channel::bounded(config.inbox_capacity());
                let actor = CellActor::new(pos, context.clone());
                let listener = listener.clone();
                let spawned = thread::Builder::new()
                    .name(format!("cell-{pos}"))
                    .spawn_scoped(scope, move || actor.run(&receiver, &listener));
                match spawned {
                    Ok(handle) => {
                        inboxes.push(sender);
                        handles.push((pos, handle));
                    }
                    Err(err) => {
                        spawn_error = Some(err);
                        break;
                    }
                }
            }
            drop(context);
            drop(listener);
            debug!("spawned {} cell actors", handles.len());

            let result = match spawn_error {
                Some(err) => {
                    drop(inboxes);
                    Err(SolverError::Spawn(err))
                }
                None => Coordinator::new(
                    config,
                    &board,
                    &relay,
                    &completed,
                    inboxes,
                    ack_receiver,
                )
                .run(puzzle),
            };

            let kind = match &result {
                Ok(finished) if finished.outcome.is_solved() => Termination::Solved,
                Ok(_) => Termination::Stalled,
                Err(_) => Termination::Aborted,
            };
            signal.fire(kind);

            let mut actor_error = None;
            for (position, handle) in handles {
                let joined = match handle.join() {
                    Ok(Ok(_)) => continue,
                    Ok(Err(err)) => err,
                    Err(_) => SolverError::ActorPanicked { position },
                };
                actor_error.get_or_insert(joined);
            }

            let finished = result?;
            match actor_error {
                Some(err) => Err(err),
                None => Ok(finished),
            }
        })?;

        let Finished {
            outcome,
            board,
            stats,
            history,
        } = finished;
        info!(
            "{outcome} after {} rounds, {} of 81 cells finalized",
            stats.total_rounds(),
            board.finalized_count()
        );
        let change_log = change_receiver
            .map(|receiver| receiver.try_iter().collect())
            .unwrap_or_default();
        Ok(SolveReport {
            outcome,
            board,
            stats,
            history,
            change_log,
        })
    }
}
