use std::collections::HashMap;

use gravity_uct::{
    Board, Cell, Position, RolloutKind, SearchConfig, SearchError, Tactic, UctEngine,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn board_from(rows: &[&str], forbidden: Option<Position>) -> Board {
    let rows: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    'X' => Cell::Opponent,
                    'O' => Cell::Machine,
                    _ => Cell::Empty,
                })
                .collect()
        })
        .collect();
    Board::from_rows(&rows, forbidden).unwrap()
}

fn iterations_only(iterations: usize) -> SearchConfig {
    SearchConfig::default()
        .without_time_limit()
        .with_max_iterations(iterations)
}

#[test]
fn test_takes_immediate_win_without_searching() {
    init_logging();
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            "XX.....",
            "OOO...X",
        ],
        None,
    );
    let mut engine = UctEngine::with_seed(iterations_only(1_000), 1);

    let mv = engine.search(&board, Some(Position::new(5, 6))).unwrap();

    assert_eq!(mv, Position::new(5, 3));
    assert_eq!(engine.get_statistics().iterations, 0);
    assert_eq!(
        engine.get_statistics().tactic,
        Some(Tactic::Win(Position::new(5, 3)))
    );
    assert!(engine.tree().is_none());
}

#[test]
fn test_blocks_opponent_win() {
    init_logging();
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            "OO.....",
            "XXX...O",
        ],
        None,
    );
    let mut engine = UctEngine::with_seed(iterations_only(1_000), 1);

    let mv = engine.search(&board, Some(Position::new(5, 2))).unwrap();

    assert_eq!(mv, Position::new(5, 3));
    assert_eq!(engine.get_statistics().iterations, 0);
    assert_eq!(
        engine.get_statistics().tactic,
        Some(Tactic::Block(Position::new(5, 3)))
    );
}

#[test]
fn test_win_beats_block() {
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            "......O",
            "X.....O",
            "XXX...O",
        ],
        None,
    );
    let mut engine = UctEngine::with_seed(iterations_only(1_000), 1);

    let mv = engine.search(&board, None).unwrap();

    assert_eq!(mv, Position::new(2, 6));
    assert_eq!(
        engine.get_statistics().tactic,
        Some(Tactic::Win(Position::new(2, 6)))
    );
}

#[test]
fn test_tactics_respect_forbidden_cell() {
    // Column 3 cannot complete the row because its bottom cell is forbidden
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "OOO....",
        ],
        Some(Position::new(5, 3)),
    );
    assert_eq!(board.tops()[3], 5);
    let mut engine = UctEngine::with_seed(iterations_only(200), 1);

    let mv = engine.search(&board, None).unwrap();

    assert_eq!(engine.get_statistics().tactic, None);
    assert_eq!(engine.get_statistics().iterations, 200);
    assert_ne!(mv, Position::new(5, 3));
    assert_eq!(Some(mv), board.landing(mv.col));
}

#[test]
fn test_tactical_check_can_be_disabled() {
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            "XX.....",
            "OOO...X",
        ],
        None,
    );
    let config = iterations_only(2_000).with_tactical_check(false);
    let mut engine = UctEngine::with_seed(config, 4);

    let mv = engine.search(&board, None).unwrap();

    assert_eq!(engine.get_statistics().iterations, 2_000);
    assert!(engine.get_statistics().tactic.is_none());
    // The winning child is terminal and scores +1 on every visit
    assert_eq!(mv, Position::new(5, 3));
}

#[test]
fn test_tree_bookkeeping_invariants() {
    init_logging();
    let board = Board::new(6, 7, None).unwrap();
    let mut engine = UctEngine::with_seed(iterations_only(3_000), 21);

    engine.search(&board, None).unwrap();

    let tree = engine.tree().unwrap();
    let root = tree.node(tree.root());
    assert_eq!(root.visits, 3_000);
    assert_eq!(engine.get_statistics().tree_size, tree.len());

    let child_visits: u64 = root.child_ids().map(|id| tree.node(id).visits).sum();
    assert_eq!(child_visits, root.visits);

    for node in tree.nodes() {
        assert!(node.visits >= 1);
        assert!(node.total_reward.abs() <= node.visits as f64);

        let expanded = node.child_ids().count();
        assert_eq!(
            expanded + node.untried.len(),
            node.board.open_columns().len()
        );
    }
}

#[test]
fn test_seeded_searches_are_deterministic() {
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            "...O...",
            "..XXO..",
        ],
        None,
    );
    let run = |seed| {
        let mut engine = UctEngine::with_seed(iterations_only(4_000), seed);
        let mv = engine.search(&board, Some(Position::new(4, 3))).unwrap();
        let stats: Vec<(Option<Position>, u64, f64)> = engine
            .tree()
            .unwrap()
            .nodes()
            .map(|n| (n.last_move, n.visits, n.total_reward))
            .collect();
        (mv, stats)
    };

    let (move_a, stats_a) = run(99);
    let (move_b, stats_b) = run(99);

    assert_eq!(move_a, move_b);
    assert_eq!(stats_a, stats_b);
}

#[test]
fn test_returned_move_is_playable() {
    let board = board_from(
        &[
            "...X...",
            "...O...",
            "...X...",
            "...O...",
            "...X...",
            "...O...",
        ],
        Some(Position::new(2, 0)),
    );
    for rollout in [RolloutKind::Uniform, RolloutKind::CenterWeighted] {
        let config = iterations_only(1_500).with_rollout(rollout);
        let mut engine = UctEngine::with_seed(config, 8);

        let mv = engine.search(&board, Some(Position::new(0, 3))).unwrap();

        assert_ne!(mv.col, 3);
        assert_eq!(Some(mv), board.landing(mv.col));
    }
}

#[test]
fn test_each_search_builds_a_fresh_tree() {
    let board = Board::new(6, 7, None).unwrap();
    let mut engine = UctEngine::with_seed(iterations_only(500), 2);

    engine.search(&board, None).unwrap();
    let first = engine.tree().unwrap().node(engine.tree().unwrap().root()).visits;
    engine.search(&board, None).unwrap();
    let tree = engine.tree().unwrap();

    assert_eq!(first, 500);
    assert_eq!(tree.node(tree.root()).visits, 500);
}

#[test]
fn test_full_board_has_no_moves() {
    let board = board_from(&["XO", "OX"], None);
    let mut engine = UctEngine::with_seed(iterations_only(10), 1);

    assert!(matches!(
        engine.search(&board, None),
        Err(SearchError::NoLegalMoves)
    ));
}

#[test]
fn test_last_move_out_of_bounds_is_rejected() {
    let board = Board::new(6, 7, None).unwrap();
    let mut engine = UctEngine::with_seed(iterations_only(10), 1);

    assert!(matches!(
        engine.search(&board, Some(Position::new(6, 0))),
        Err(SearchError::InvalidBoard(_))
    ));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let board = Board::new(6, 7, None).unwrap();
    let mut engine = UctEngine::with_seed(iterations_only(0), 1);

    assert!(matches!(
        engine.search(&board, None),
        Err(SearchError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_empty_board_prefers_center_columns() {
    init_logging();
    let board = Board::new(6, 7, None).unwrap();
    let mut votes: HashMap<usize, usize> = HashMap::new();

    for seed in 0..5 {
        let mut engine = UctEngine::with_seed(iterations_only(10_000), seed);
        let mv = engine.search(&board, None).unwrap();
        assert_eq!(mv.row, 5);
        *votes.entry(mv.col).or_default() += 1;
    }

    let (mode, _) = votes
        .iter()
        .max_by_key(|(col, count)| (**count, std::cmp::Reverse(**col)))
        .unwrap();
    assert!(
        (2..=4).contains(mode),
        "expected a central column, got votes {:?}",
        votes
    );
}

#[test]
fn test_custom_oracle_changes_tactics() {
    let board = board_from(
        &[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "OO....X",
        ],
        None,
    );
    let mut engine = UctEngine::with_seed(iterations_only(100), 1)
        .with_oracle(gravity_uct::ConnectFour::with_run_length(3));

    let mv = engine.search(&board, None).unwrap();

    assert_eq!(mv, Position::new(5, 2));
    assert_eq!(
        engine.get_statistics().tactic,
        Some(Tactic::Win(Position::new(5, 2)))
    );
}

#[test]
fn test_custom_policies_are_used() {
    use gravity_uct::policy::{rollout::UniformRollout, selection::UcbPolicy};

    let board = Board::new(6, 7, None).unwrap();
    let mut engine = UctEngine::with_seed(iterations_only(300), 6)
        .with_selection_policy(UcbPolicy::new(1.4))
        .with_rollout_policy(UniformRollout::new());

    let mv = engine.search(&board, None).unwrap();

    assert_eq!(mv.row, 5);
    assert_eq!(engine.config().max_iterations, 300);
    assert_eq!(engine.get_statistics().iterations, 300);
}
