//! Round-deferred delivery of update requests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::trace;

use crate::{SolverError, UpdateRequest, message::Command};

/// Bounded staging queue between request producers and cell inboxes.
///
/// Producers [`stage`](Relay::stage) requests at any time. Requests reach
/// their target only when the coordinator calls [`drain`](Relay::drain),
/// which forwards the number of requests queued when the drain starts;
/// anything staged while it runs waits for the next drain.
#[derive(Debug)]
pub struct Relay {
    sender: Sender<UpdateRequest>,
    receiver: Receiver<UpdateRequest>,
    capacity: usize,
    staged: AtomicUsize,
}

impl Relay {
    /// Creates a relay holding at most `capacity` requests.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            staged: AtomicUsize::new(0),
        }
    }

    /// Appends a request to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::RelayOverflow`] if the queue is full.
    pub fn stage(&self, request: UpdateRequest) -> Result<(), SolverError> {
        trace!("stage {request}");
        match self.sender.try_send(request) {
            Ok(()) => {
                self.staged.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                Err(SolverError::RelayOverflow {
                    capacity: self.capacity,
                })
            }
        }
    }

    /// Returns the total number of requests staged so far.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.staged.load(Ordering::Relaxed)
    }

    /// Returns the number of requests currently waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Forwards the requests queued at the start of the call to their
    /// targets' inboxes, returning how many were delivered.
    ///
    /// `inboxes` is indexed by [`Position::index`](cellsync_core::Position::index).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ActorDisconnected`] if a target inbox is closed.
    pub(crate) fn drain(&self, inboxes: &[Sender<Command>]) -> Result<usize, SolverError> {
        let count = self.receiver.len();
        for _ in 0..count {
            let Ok(request) = self.receiver.try_recv() else {
                break;
            };
            trace!("deliver {request}");
            let position = request.target;
            inboxes[position.index()]
                .send(Command::Update(request))
                .map_err(|_| SolverError::ActorDisconnected { position })?;
        }
        Ok(count)
    }
}
