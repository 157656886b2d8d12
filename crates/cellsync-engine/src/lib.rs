//! A deductive Sudoku solver built from concurrent cell actors.
//!
//! Every cell of the board is owned by an actor on its own thread. Actors
//! never touch each other's state: a cell that becomes finalized stages
//! requests to clear its digit from its peers, and house deductions stage
//! requests for the cells they constrain. Staged requests wait in a
//! [`Relay`] until the coordinator starts the next round, so every actor
//! applies a round's updates against the same committed board.
//!
//! A round is:
//!
//! 1. drain the relay into the actors' inboxes,
//! 2. let every actor apply its inbox and publish its cell,
//! 3. run the configured [`deduction`]s once per house.
//!
//! The solve ends when every cell is finalized, when a round stages nothing,
//! or when a [`Contradiction`] is found.
//!
//! # Examples
//!
//! ```
//! use cellsync_core::DigitGrid;
//! use cellsync_engine::{Engine, EngineConfig, Outcome, deduction};
//!
//! let puzzle: DigitGrid = "
//!     1__ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//!     ___ ___ ___
//! "
//! .parse()?;
//!
//! let config = EngineConfig::default().with_deductions(deduction::fundamental_deductions());
//! let report = Engine::new(config).solve(&puzzle)?;
//! assert_eq!(report.outcome, Outcome::Stalled);
//! assert_eq!(report.board.finalized_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    board::*,
    cell::*,
    config::*,
    coordinator::{Phase, representative},
    engine::*,
    error::*,
    relay::*,
    report::*,
    signal::Termination,
    update::*,
};

mod actor;
mod barrier;
mod board;
mod cell;
mod config;
mod coordinator;
pub mod deduction;
mod engine;
mod error;
mod message;
mod relay;
mod report;
mod signal;
mod update;

#[cfg(test)]
mod testing;
