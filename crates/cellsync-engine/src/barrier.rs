use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::{SolverError, coordinator::Phase, message::Ack};

/// Waits for `expected` acknowledgements, failing after `timeout`.
pub(crate) fn collect(
    acks: &Receiver<Ack>,
    phase: Phase,
    expected: usize,
    timeout: Duration,
) -> Result<Vec<Ack>, SolverError> {
    let deadline = Instant::now().checked_add(timeout);
    let mut received = Vec::with_capacity(expected);
    while received.len() < expected {
        let ack = match deadline {
            Some(deadline) => acks.recv_deadline(deadline),
            None => acks.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match ack {
            Ok(ack) => received.push(ack),
            Err(RecvTimeoutError::Timeout) => {
                return Err(SolverError::BarrierTimeout {
                    phase,
                    received: received.len(),
                    expected,
                });
            }
            Err(RecvTimeoutError::Disconnected) => return Err(SolverError::BarrierDisconnected),
        }
    }
    Ok(received)
}
