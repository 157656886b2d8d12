//! End-to-end solves through the public engine API.

use cellsync_core::{Digit, DigitGrid, DigitSet, House, Position};
use cellsync_engine::{
    Contradiction, Engine, EngineConfig, Outcome, SolveReport, SolverError, UpdateKind, deduction,
};

const EASY: &str = "
    53_ _7_ ___
    6__ 195 ___
    _98 ___ _6_
    8__ _6_ __3
    4__ 8_3 __1
    7__ _2_ __6
    _6_ ___ 28_
    ___ 419 __5
    ___ _8_ _79
";

const EASY_SOLUTION: &str = "
    534 678 912
    672 195 348
    198 342 567
    859 761 423
    426 853 791
    713 924 856
    961 537 284
    287 419 635
    345 286 179
";

// Needs pairs and triples once singles and locked candidates run dry.
const SUBSETS: &str = "
    __9 7__ _32
    _5_ 2__ _4_
    ___ __9 ___
    ___ __8 ___
    _4_ 59_ _1_
    _8_ __1 __5
    __3 ___ _6_
    6__ 98_ ___
    __7 _2_ ___
";

const SUBSETS_SOLUTION: &str = "
    169 754 832
    358 216 947
    274 839 651
    531 478 296
    746 592 318
    982 361 475
    823 147 569
    615 983 724
    497 625 183
";

const HARD: &str = "
    8__ ___ ___
    __3 6__ ___
    _7_ _9_ 2__
    _5_ __7 ___
    ___ _45 7__
    ___ 1__ _3_
    __1 ___ _68
    __8 5__ _1_
    _9_ ___ 4__
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn grid(s: &str) -> DigitGrid {
    s.parse().unwrap()
}

fn solve(puzzle: &str, config: EngineConfig) -> Result<SolveReport, SolverError> {
    init_logger();
    Engine::new(config).solve(&grid(puzzle))
}

#[track_caller]
fn assert_agrees_with(report: &SolveReport, solution: &DigitGrid) {
    for (pos, cell) in report.board.iter() {
        if let Some(digit) = cell.value() {
            assert_eq!(
                Some(digit),
                solution[pos],
                "finalized {pos} disagrees with the solution"
            );
        }
    }
}

#[test]
fn test_single_given_stalls() {
    let mut puzzle = DigitGrid::new();
    puzzle.set(Position::new(0, 0), Some(Digit::D1));
    init_logger();
    let config = EngineConfig::default().with_deductions(deduction::fundamental_deductions());
    let report = Engine::new(config).solve(&puzzle).unwrap();

    assert_eq!(report.outcome, Outcome::Stalled);
    assert_eq!(report.board.finalized_count(), 1);
    assert_eq!(report.board.get(Position::new(0, 0)).value(), Some(Digit::D1));
    for peer in Position::new(0, 0).peers() {
        assert!(!report.board.candidates(peer).contains(Digit::D1));
    }
    assert!(report.board.candidates(Position::new(8, 8)).contains(Digit::D1));
    assert_eq!(report.stats.total_rounds(), 2);
}

#[test]
fn test_empty_grid_stalls_immediately() {
    let report = solve(&"_".repeat(81), EngineConfig::default()).unwrap();
    assert_eq!(report.outcome, Outcome::Stalled);
    assert_eq!(report.board.finalized_count(), 0);
    assert_eq!(report.stats.total_rounds(), 1);
}

#[test]
fn test_easy_puzzle_solves_with_singles() {
    let config = EngineConfig::default().with_deductions(deduction::fundamental_deductions());
    let report = solve(EASY, config).unwrap();

    assert_eq!(report.outcome, Outcome::Solved);
    assert_eq!(report.grid(), grid(EASY_SOLUTION));
    assert!(report.board.is_solved());
    assert!(report.board.check_consistency().is_ok());
}

#[test]
fn test_subset_puzzle_needs_subset_deductions() {
    let report = solve(SUBSETS, EngineConfig::default()).unwrap();
    assert_eq!(report.outcome, Outcome::Solved);
    assert_eq!(report.grid(), grid(SUBSETS_SOLUTION));
    let subset_requests: usize = ["Hidden Pair", "Hidden Triple", "Naked Pair", "Naked Triple"]
        .into_iter()
        .filter_map(|name| report.stats.applications_of(name))
        .sum();
    assert!(subset_requests > 0);

    let config = EngineConfig::default().with_deductions(deduction::basic_deductions());
    let report = solve(SUBSETS, config).unwrap();
    assert_eq!(report.outcome, Outcome::Stalled);
    assert!(!report.board.is_solved());
    assert_agrees_with(&report, &grid(SUBSETS_SOLUTION));
}

#[test]
fn test_hard_puzzle_stalls_without_guessing() {
    let report = solve(HARD, EngineConfig::default()).unwrap();
    assert_eq!(report.outcome, Outcome::Stalled);
    assert!(report.board.check_consistency().is_ok());
    let last = report.stats.rounds().last().unwrap();
    assert_eq!(last.staged(), 0);
}

#[test]
fn test_duplicate_givens_are_a_contradiction() {
    let mut puzzle = grid(EASY);
    puzzle.set(Position::new(2, 0), Some(Digit::D5));
    init_logger();
    let err = Engine::default().solve(&puzzle).unwrap_err();
    assert_eq!(
        err.as_contradiction(),
        Some(&Contradiction::DuplicateValue {
            house: House::Row { y: 0 },
            digit: Digit::D5,
        })
    );
}

// r0c0 loses 1-8 to its row and 9 to its column in the same round.
const EMPTIED_CORNER: &str = "
    _12 345 678
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    9__ ___ ___
";

// The 1 in box 0 leaves row 0 with no cell for 1 while each blank keeps {2, 3}.
const ROW_WITHOUT_ONE: &str = "
    ___ 456 789
    1__ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
    ___ ___ ___
";

#[test]
fn test_emptied_cell_is_reported_every_run() {
    for _ in 0..50 {
        let err = solve(EMPTIED_CORNER, EngineConfig::default()).unwrap_err();
        assert_eq!(
            err.as_contradiction(),
            Some(&Contradiction::EmptyCandidates {
                position: Position::new(0, 0),
            }),
            "{err}"
        );
    }
}

#[test]
fn test_digit_without_position_is_reported_every_run() {
    for _ in 0..20 {
        let err = solve(ROW_WITHOUT_ONE, EngineConfig::default()).unwrap_err();
        assert_eq!(
            err.as_contradiction(),
            Some(&Contradiction::NoPositionForDigit {
                house: House::Row { y: 0 },
                digit: Digit::D1,
            }),
            "{err}"
        );
    }
}

#[test]
fn test_every_deduction_lands_in_the_next_round() {
    for puzzle in [EASY, SUBSETS, HARD] {
        let report = solve(puzzle, EngineConfig::default().with_history(true)).unwrap();
        let deductions = deduction::all_deductions();
        for (round, pair) in report.history.windows(2).enumerate() {
            let (committed, next) = (&pair[0], &pair[1]);
            for house in House::ALL {
                let (requests, _) =
                    deduction::analyze_house(&deductions, house, committed).unwrap();
                for request in requests {
                    let after = next.candidates(request.target);
                    let applied = match request.kind {
                        UpdateKind::Set => after.is_subset(request.mask),
                        UpdateKind::Clear => !after.intersects(request.mask),
                    };
                    assert!(
                        applied,
                        "round {}: {request} from {house} missing from the next commit ({after})",
                        round + 1
                    );
                }
            }
        }
    }
}

#[test]
fn test_hidden_singles_are_exhausted_at_a_stall() {
    let config = EngineConfig::default()
        .with_deductions(deduction::fundamental_deductions())
        .with_history(true);
    let report = solve(SUBSETS, config).unwrap();
    assert_eq!(report.outcome, Outcome::Stalled);
    let last = report.history.last().unwrap();
    assert_eq!(last, &report.board);
    for house in House::ALL {
        let (requests, _) =
            deduction::analyze_house(&deduction::fundamental_deductions(), house, last).unwrap();
        assert!(requests.is_empty(), "{house}: {requests:?}");
    }
    for (pos, cell) in last.iter() {
        assert!(cell.is_finalized() || cell.candidates().len() > 1, "{pos}");
        assert_ne!(cell.candidates(), DigitSet::EMPTY);
    }
}

#[test]
fn test_candidates_only_shrink_between_commits() {
    let report = solve(SUBSETS, EngineConfig::default().with_history(true)).unwrap();
    assert_eq!(report.history.len(), report.stats.total_rounds());
    for pair in report.history.windows(2) {
        for pos in Position::ALL {
            let before = pair[0].get(pos);
            let after = pair[1].get(pos);
            assert!(after.candidates().is_subset(before.candidates()), "{pos}");
            assert!(!before.is_finalized() || after == before, "{pos}");
        }
    }
}

#[test]
fn test_only_owner_changes_its_cell() {
    let report = solve(EASY, EngineConfig::default().with_change_log(true)).unwrap();
    assert!(!report.change_log.is_empty());
    for change in &report.change_log {
        assert_eq!(change.actor, change.target);
        assert!(change.after.candidates().is_subset(change.before.candidates()));
        assert_ne!(change.after, change.before);
    }
    for pos in Position::ALL {
        let finalizations = report
            .change_log
            .iter()
            .filter(|change| change.target == pos && change.after.is_finalized())
            .count();
        assert_eq!(finalizations, 1, "{pos}");
    }
}

#[test]
fn test_round_stats_are_recorded() {
    let report = solve(EASY, EngineConfig::default()).unwrap();
    let rounds = report.stats.rounds();
    assert_eq!(rounds[0].round, 1);
    assert_eq!(rounds[0].delivered, 30);
    assert!(rounds.windows(2).all(|pair| pair[0].finalized <= pair[1].finalized));
    assert_eq!(rounds.last().unwrap().finalized, 81);
}

#[test]
fn test_seeding_overflow() {
    let err = solve(EASY, EngineConfig::default().with_relay_capacity(10)).unwrap_err();
    assert!(matches!(err, SolverError::RelayOverflow { capacity: 10 }));
}

#[test]
fn test_finalization_overflow() {
    let err = solve(EASY, EngineConfig::default().with_relay_capacity(40)).unwrap_err();
    assert!(matches!(err, SolverError::RelayOverflow { capacity: 40 }));
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = solve(EASY, EngineConfig::default().with_inbox_capacity(0)).unwrap_err();
    assert!(matches!(err, SolverError::InvalidConfig { .. }));
}

#[test]
fn test_engine_can_be_reused() {
    init_logger();
    let engine = Engine::default();
    let first = engine.solve(&grid(EASY)).unwrap();
    let second = engine.solve(&grid(EASY)).unwrap();
    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.stats.total_rounds(), second.stats.total_rounds());
}
