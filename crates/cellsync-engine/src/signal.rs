//! One-shot shutdown broadcast.

use std::sync::OnceLock;

use crossbeam_channel::{Receiver, Sender};

/// Why a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Termination {
    /// Every cell was finalized.
    Solved,
    /// A round made no progress.
    Stalled,
    /// The solve failed.
    Aborted,
}

/// The sending half of the shutdown broadcast.
///
/// Firing records the termination kind and then closes the channel, which
/// wakes every [`ShutdownListener`] at once.
#[derive(Debug)]
pub(crate) struct ShutdownSignal<'a> {
    termination: &'a OnceLock<Termination>,
    sender: Sender<()>,
}

/// The receiving half of the shutdown broadcast.
#[derive(Debug, Clone)]
pub(crate) struct ShutdownListener<'a> {
    termination: &'a OnceLock<Termination>,
    receiver: Receiver<()>,
}

impl<'a> ShutdownSignal<'a> {
    pub(crate) fn new(termination: &'a OnceLock<Termination>) -> (Self, ShutdownListener<'a>) {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        (
            Self {
                termination,
                sender,
            },
            ShutdownListener {
                termination,
                receiver,
            },
        )
    }

    pub(crate) fn fire(self, termination: Termination) {
        // The slot is only ever set here, and `self` is consumed.
        let _ = self.termination.set(termination);
        drop(self.sender);
    }
}

impl ShutdownListener<'_> {
    /// Channel that disconnects when the signal fires.
    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }

    /// Returns the termination kind once the signal has fired.
    pub(crate) fn termination(&self) -> Option<Termination> {
        self.termination.get().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_fire_wakes_all_listeners() {
        let slot = OnceLock::new();
        let (signal, listener) = ShutdownSignal::new(&slot);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let listener = listener.clone();
                    scope.spawn(move || {
                        assert!(listener.receiver().recv().is_err());
                        listener.termination()
                    })
                })
                .collect();
            assert_eq!(listener.termination(), None);
            signal.fire(Termination::Stalled);
            for handle in handles {
                assert_eq!(handle.join().unwrap(), Some(Termination::Stalled));
            }
        });
    }
}
