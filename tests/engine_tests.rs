//! Integration tests for the match engine through the public facade

use shape_match::core::{find_matches, Grid, ScriptedSource, Session, SimpleRng};
use shape_match::types::{
    default_tier_table, geometric_shapes, Coord, DifficultyConfig, GameEvent, KindId,
    SessionStatus, SwapOutcome,
};

fn config(moves_allowed: u32, target_score: u32) -> DifficultyConfig {
    DifficultyConfig {
        moves_allowed,
        target_score,
        pool: geometric_shapes()[..8].to_vec(),
        grid_size: 8,
    }
}

/// 8x8 grid without runs: every row and every column holds distinct neighbours.
fn diagonal_grid() -> Grid {
    let kinds = (0..8u8)
        .flat_map(|r| (0..8u8).map(move |c| KindId((3 * r + c) % 8)))
        .collect();
    Grid::from_kinds(8, kinds).unwrap()
}

/// (0,0)=A, (0,1)=B, (0,2)=A, (1,1)=A with A = kind 0.
fn three_in_a_row_setup() -> Grid {
    let mut grid = diagonal_grid();
    grid.put_new(Coord::new(0, 2), KindId(0));
    grid.put_new(Coord::new(1, 1), KindId(0));
    grid
}

#[test]
fn test_adjacent_swap_without_run_is_rejected() {
    // Row 0 = [A, A, B, C, D, E, F, G]
    let mut grid = diagonal_grid();
    grid.put_new(Coord::new(0, 1), KindId(0));
    assert!(find_matches(&grid).is_empty());

    let mut session = Session::with_grid(config(25, 100), grid.clone(), SimpleRng::new(1)).unwrap();
    let outcome = session.request_swap(Coord::new(0, 2), Coord::new(0, 1)).unwrap();

    assert_eq!(outcome, SwapOutcome::Invalid);
    assert!(!outcome.accepted());
    assert_eq!(session.grid(), &grid);
    assert_eq!(session.moves_remaining(), 25);
    assert_eq!(session.score(), 0);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::InvalidMove {
            a: Coord::new(0, 2),
            b: Coord::new(0, 1)
        }]
    );
}

#[test]
fn test_swap_into_row_of_three() {
    let grid = three_in_a_row_setup();
    assert!(find_matches(&grid).is_empty());

    let rng = ScriptedSource::new(vec![1, 2, 4], 7);
    let mut session = Session::with_grid(config(25, 100), grid, rng).unwrap();
    let outcome = session.request_swap(Coord::new(0, 1), Coord::new(1, 1)).unwrap();

    assert_eq!(outcome, SwapOutcome::Matched);
    assert!(outcome.accepted());
    assert_eq!(session.score(), 30);
    assert_eq!(session.moves_remaining(), 24);
    assert!(find_matches(session.grid()).is_empty());
    assert!(!session.is_processing());
    // B now sits where the swapped A was.
    assert_eq!(session.grid().kind(Coord::new(1, 1)), KindId(1));
}

#[test]
fn test_non_adjacent_swap_changes_nothing() {
    let grid = three_in_a_row_setup();
    let mut session = Session::with_grid(config(25, 100), grid.clone(), SimpleRng::new(3)).unwrap();

    for (a, b) in [
        (Coord::new(0, 0), Coord::new(0, 2)),
        (Coord::new(0, 0), Coord::new(1, 1)),
        (Coord::new(3, 3), Coord::new(3, 3)),
    ] {
        let outcome = session.request_swap(a, b).unwrap();
        assert_eq!(outcome, SwapOutcome::NotAdjacent);
    }
    assert_eq!(session.grid(), &grid);
    assert_eq!(session.moves_remaining(), 25);
    assert!(session.pending_events().is_empty());
}

#[test]
fn test_last_move_short_of_target_loses() {
    let rng = ScriptedSource::new(vec![1, 2, 4], 7);
    let mut session = Session::with_grid(config(1, 100), three_in_a_row_setup(), rng).unwrap();
    session.request_swap(Coord::new(0, 1), Coord::new(1, 1)).unwrap();

    assert_eq!(session.status(), SessionStatus::Lost);
    assert!(session.game_over());
    assert_eq!(
        session.drain_events().last(),
        Some(&GameEvent::SessionEnded {
            won: false,
            final_score: 30
        })
    );

    // Terminal: further input is ignored.
    let outcome = session.request_swap(Coord::new(2, 2), Coord::new(2, 3)).unwrap();
    assert_eq!(outcome, SwapOutcome::Ignored);
}

#[test]
fn test_last_move_reaching_target_wins() {
    let rng = ScriptedSource::new(vec![1, 2, 4], 7);
    let mut session = Session::with_grid(config(1, 30), three_in_a_row_setup(), rng).unwrap();
    session.request_swap(Coord::new(0, 1), Coord::new(1, 1)).unwrap();

    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.score(), 30);
}

#[test]
fn test_seeded_play_keeps_invariants() {
    for seed in [1u32, 7, 42, 1234, 99_999] {
        let mut session =
            Session::for_level(default_tier_table(), geometric_shapes(), 1, SimpleRng::new(seed))
                .unwrap();
        session.settle();
        assert!(find_matches(session.grid()).is_empty(), "seed {seed}");

        let mut turns = 0;
        while !session.game_over() && turns < 100 {
            turns += 1;
            let Some((a, b)) = session.hint() else {
                session.retry();
                session.settle();
                continue;
            };

            let before_score = session.score();
            let before_moves = session.moves_remaining();
            session.drain_events();

            let outcome = session.request_swap(a, b).unwrap();
            assert_eq!(outcome, SwapOutcome::Matched, "seed {seed}");
            assert_eq!(session.moves_remaining(), before_moves - 1);
            assert!(session.score() > before_score);
            assert_eq!((session.score() - before_score) % 10, 0);

            // Detection is idempotent and the grid is stable after settling.
            let first = find_matches(session.grid());
            assert_eq!(first, find_matches(session.grid()));
            assert!(first.is_empty());

            let deltas: u32 = session
                .drain_events()
                .iter()
                .filter_map(|e| match e {
                    GameEvent::ScoreChanged { delta, .. } => Some(*delta),
                    _ => None,
                })
                .sum();
            assert_eq!(deltas, session.score() - before_score);
        }
        assert!(session.game_over(), "seed {seed}");
    }
}

#[test]
fn test_retry_and_advance_through_tiers() {
    let mut session =
        Session::for_level(default_tier_table(), geometric_shapes(), 3, SimpleRng::new(5)).unwrap();
    session.settle();
    assert_eq!(session.pool().len(), 4);
    assert_eq!(session.moves_remaining(), 25);

    session.advance().unwrap();
    session.settle();
    assert_eq!(session.level(), 4);
    assert_eq!(session.pool().len(), 6);
    assert_eq!(session.target_score(), 200);
    assert_eq!(session.moves_remaining(), 20);

    session.retry();
    session.settle();
    assert_eq!(session.level(), 4);
    assert_eq!(session.episode_id(), 2);
    assert_eq!(session.status(), SessionStatus::Active);
}
