//! Results of a solve.

use cellsync_core::{DigitGrid, Position};

use crate::{BoardSnapshot, CellState};

/// How a successful solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Outcome {
    /// Every cell was finalized.
    #[display("solved")]
    Solved,
    /// A round staged no requests before every cell was finalized.
    #[display("stalled")]
    Stalled,
}

/// Counters for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundStats {
    /// Round number, starting at 1.
    pub round: usize,
    /// Requests delivered to actors at the start of the round.
    pub delivered: usize,
    /// Requests staged by cells finalizing while applying.
    pub staged_by_finalization: usize,
    /// Requests staged by deductions while analyzing.
    pub staged_by_analysis: usize,
    /// Finalized cells after the round's commit.
    pub finalized: usize,
}

impl RoundStats {
    /// Total requests staged during the round.
    #[must_use]
    pub fn staged(&self) -> usize {
        self.staged_by_finalization + self.staged_by_analysis
    }
}

/// Statistics collected over a solve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveStats {
    deduction_names: Vec<&'static str>,
    applications: Vec<usize>,
    rounds: Vec<RoundStats>,
}

impl SolveStats {
    pub(crate) fn new(deduction_names: Vec<&'static str>) -> Self {
        let applications = vec![0; deduction_names.len()];
        Self {
            deduction_names,
            applications,
            rounds: Vec::new(),
        }
    }

    pub(crate) fn add_applications(&mut self, counts: &[usize]) {
        for (total, count) in self.applications.iter_mut().zip(counts) {
            *total += count;
        }
    }

    pub(crate) fn push_round(&mut self, round: RoundStats) {
        self.rounds.push(round);
    }

    /// Returns the number of rounds run.
    #[must_use]
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Returns the per-round counters.
    #[must_use]
    pub fn rounds(&self) -> &[RoundStats] {
        &self.rounds
    }

    /// Returns each deduction's name with the number of requests it staged.
    pub fn applications(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.deduction_names
            .iter()
            .copied()
            .zip(self.applications.iter().copied())
    }

    /// Returns the number of requests staged by the named deduction.
    #[must_use]
    pub fn applications_of(&self, name: &str) -> Option<usize> {
        self.applications()
            .find(|(deduction, _)| *deduction == name)
            .map(|(_, count)| count)
    }
}

/// One state change made by a cell actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Round in which the change was applied.
    pub round: usize,
    /// The actor that made the change.
    pub actor: Position,
    /// The cell whose state changed.
    pub target: Position,
    /// State before the change.
    pub before: CellState,
    /// State after the change.
    pub after: CellState,
}

/// The result of [`Engine::solve`](crate::Engine::solve).
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Whether the puzzle was solved.
    pub outcome: Outcome,
    /// The committed board at the end of the solve.
    pub board: BoardSnapshot,
    /// Round and deduction statistics.
    pub stats: SolveStats,
    /// Board after each commit, when history recording is enabled.
    pub history: Vec<BoardSnapshot>,
    /// Every state change, when change logging is enabled.
    pub change_log: Vec<ChangeRecord>,
}

impl SolveReport {
    /// Returns the finalized values as a grid.
    #[must_use]
    pub fn grid(&self) -> DigitGrid {
        self.board.to_digit_grid()
    }
}
