//! Cell actors.
//!
//! Each of the 81 cells is owned by one actor running on its own thread. The
//! actor is the only code that mutates its cell: requests from finalizing
//! peers and deductions arrive in its inbox, and the coordinator's round
//! commands tell it when to acknowledge, publish, and analyze.
//!
//! Updates are not applied as they arrive. They are folded into an
//! [`UpdateBatch`] and the cell changes once, when the round is quiesced, so
//! the result of a round does not depend on delivery order.

use std::sync::atomic::{AtomicUsize, Ordering};

use cellsync_core::{DigitSet, House, Position};
use crossbeam_channel::{Receiver, Sender, select};
use log::{debug, trace};

use crate::{
    Board, CellState, ChangeRecord, Relay, SolverError, UpdateBatch, UpdateRequest,
    deduction::{self, BoxedDeduction},
    message::{Ack, Command},
    signal::{ShutdownListener, Termination},
};

/// State shared by every actor of one solve.
#[derive(Debug, Clone)]
pub(crate) struct ActorContext<'a> {
    pub(crate) board: &'a Board,
    pub(crate) relay: &'a Relay,
    pub(crate) completed: &'a AtomicUsize,
    pub(crate) deductions: &'a [BoxedDeduction],
    pub(crate) acks: Sender<Ack>,
    pub(crate) changes: Option<Sender<ChangeRecord>>,
}

/// The owner of one cell.
#[derive(Debug)]
pub(crate) struct CellActor<'a> {
    position: Position,
    state: CellState,
    /// Updates delivered since the last quiesce.
    batch: UpdateBatch,
    failed: bool,
    error: Option<SolverError>,
    context: ActorContext<'a>,
}

impl<'a> CellActor<'a> {
    pub(crate) fn new(position: Position, context: ActorContext<'a>) -> Self {
        Self {
            position,
            state: CellState::unresolved(),
            batch: UpdateBatch::new(),
            failed: false,
            error: None,
            context,
        }
    }

    /// Processes commands until shutdown, returning the final cell state.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnfinalizedAtShutdown`] if the solve is reported
    /// solved while this cell is unresolved.
    pub(crate) fn run(
        mut self,
        inbox: &Receiver<Command>,
        shutdown: &ShutdownListener<'_>,
    ) -> Result<CellState, SolverError> {
        loop {
            if let Some(termination) = shutdown.termination() {
                return self.shut_down(termination);
            }
            select! {
                recv(inbox) -> command => {
                    let Ok(command) = command else {
                        let termination = shutdown.termination().unwrap_or(Termination::Aborted);
                        return self.shut_down(termination);
                    };
                    if let Some(termination) = shutdown.termination() {
                        return self.shut_down(termination);
                    }
                    self.handle(command);
                }
                recv(shutdown.receiver()) -> _ => {
                    let termination = shutdown.termination().unwrap_or(Termination::Aborted);
                    return self.shut_down(termination);
                }
            }
        }
    }

    fn shut_down(self, termination: Termination) -> Result<CellState, SolverError> {
        trace!("{} shutting down ({termination:?})", self.position);
        if termination.is_solved() && !self.state.is_finalized() {
            return Err(SolverError::UnfinalizedAtShutdown {
                position: self.position,
            });
        }
        Ok(self.state)
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Update(request) => self.enqueue(&request),
            Command::Quiesce { round } => {
                let changed = self.settle(round);
                let ack = Ack::Quiesced {
                    position: self.position,
                    changed,
                    error: self.error.take(),
                };
                self.send(ack);
            }
            Command::Commit => {
                self.context.board.publish(self.position, self.state);
                self.send(Ack::Committed);
            }
            Command::Analyze(house) => {
                let result = self.analyze(house);
                self.send(Ack::Analyzed { house, result });
            }
        }
    }

    fn send(&self, ack: Ack) {
        // The coordinator only drops the receiver once it has stopped
        // waiting, after which acknowledgements are moot.
        let _ = self.context.acks.send(ack);
    }

    fn fail(&mut self, error: SolverError) {
        debug!("{} failed: {error}", self.position);
        self.failed = true;
        self.error.get_or_insert(error);
    }

    fn enqueue(&mut self, request: &UpdateRequest) {
        debug_assert_eq!(request.target, self.position);
        if !self.failed {
            trace!("{}: queue {request}", self.position);
            self.batch.push(request);
        }
    }

    /// Applies the round's batch, returning whether the cell changed.
    fn settle(&mut self, round: usize) -> bool {
        let batch = self.batch.take();
        if self.failed || batch.is_empty() {
            return false;
        }
        let before = self.state;
        match before.apply(self.position, &batch.to_request(self.position)) {
            Ok(None) => false,
            Ok(Some(after)) => {
                trace!(
                    "{}: {before} -> {after} ({} requests)",
                    self.position,
                    batch.len()
                );
                self.state = after;
                if let Some(changes) = &self.context.changes {
                    let _ = changes.send(ChangeRecord {
                        round,
                        actor: self.position,
                        target: self.position,
                        before,
                        after,
                    });
                }
                if after.is_finalized() {
                    self.on_finalized(after);
                }
                true
            }
            Err(contradiction) => {
                self.fail(contradiction.into());
                false
            }
        }
    }

    fn on_finalized(&mut self, state: CellState) {
        let mask: DigitSet = state.candidates();
        for peer in self.position.peers() {
            if self.context.board.get(peer).is_finalized() {
                continue;
            }
            if let Err(err) = self.context.relay.stage(UpdateRequest::clear(peer, mask)) {
                self.fail(err);
                return;
            }
        }
        self.context.completed.fetch_add(1, Ordering::AcqRel);
    }

    fn analyze(&self, house: House) -> Result<Vec<usize>, SolverError> {
        let snapshot = self.context.board.snapshot();
        let (requests, counts) =
            deduction::analyze_house(self.context.deductions, house, &snapshot)?;
        for request in requests {
            self.context.relay.stage(request)?;
        }
        Ok(counts)
    }
}
