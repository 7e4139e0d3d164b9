//! Search Scenario Tests
//!
//! Hand-built boards with known answers for the minimax search:
//! territory-driven choice, determinism, collision scoring and the
//! trapped fallback.

use hextrail_bot::board::{CellId, HexBoard, Player};
use hextrail_bot::graph::AdjacencyGraph;
use hextrail_bot::search::{SearchEngine, SCORE_MAX, SCORE_MIN};
use hextrail_bot::translator::to_command;
use hextrail_bot::types::{Command, Direction, Position};

/// Builds the graph on the empty board, then places both players
fn position(rows: usize, cols: usize, bot: Position, opponent: Position) -> (HexBoard, AdjacencyGraph, CellId, CellId) {
    let mut board = HexBoard::new(rows, cols).unwrap();
    let graph = AdjacencyGraph::build(&board);
    let bot = board.cell_id(bot);
    let opponent = board.cell_id(opponent);
    board.mark_occupied(bot, Player::Bot).unwrap();
    board.mark_occupied(opponent, Player::Opponent).unwrap();
    (board, graph, bot, opponent)
}

/// 3x3 board, bot in the top-left corner (two free neighbours), opponent
/// in the bottom-right corner three steps away.
///
/// The middle row is one cell short, so (2,3) is wall. Moving to (1,2)
/// lets the opponent answer at (2,2) for a -1 leaf; moving to (2,1) caps
/// the opponent's best reply at 0. The bot must take (2,1), cell 11.
#[test]
fn test_three_by_three_picks_best_territory() {
    let (board, mut graph, bot, opponent) = position(3, 3, Position::new(1, 1), Position::new(3, 3));
    assert_eq!((bot, opponent), (6, 18));
    let before = graph.clone();

    let outcome = SearchEngine::new(2).decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert_eq!(outcome.target, 11);
    assert_eq!(outcome.score, 0);
    assert!(!outcome.trapped);
    // root + two opponent nodes expanded, two leaves under each
    assert_eq!(outcome.stats.nodes_expanded, 3);
    assert_eq!(outcome.stats.leaves_evaluated, 4);
    assert_eq!(graph, before, "search must leave the graph as it found it");
}

#[test]
fn test_decide_is_deterministic() {
    let (board, mut graph, bot, opponent) = position(5, 6, Position::new(3, 1), Position::new(3, 6));
    let engine = SearchEngine::new(3);

    let first = engine.decide(&board, &mut graph, bot, opponent, Direction::Right);
    let second = engine.decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert_eq!(first, second);
}

#[test]
fn test_parallel_root_matches_sequential() {
    for &(bot, opponent, depth) in &[
        (Position::new(1, 1), Position::new(3, 3), 2u8),
        (Position::new(2, 2), Position::new(4, 5), 3u8),
        (Position::new(3, 1), Position::new(3, 6), 4u8),
    ] {
        let (board, mut graph, bot, opponent) = position(5, 6, bot, opponent);
        let before = graph.clone();

        let sequential = SearchEngine::new(depth).decide(&board, &mut graph, bot, opponent, Direction::Right);
        let parallel = SearchEngine::new(depth)
            .with_parallel_root(true)
            .decide(&board, &mut graph, bot, opponent, Direction::Right);

        assert_eq!(parallel.target, sequential.target);
        assert_eq!(parallel.score, sequential.score);
        assert_eq!(parallel.stats, sequential.stats);
        assert_eq!(graph, before);
    }
}

/// Corridor (1,1)..(1,4): bot at (1,2), opponent next to it at (1,3).
/// With one ply the bot can step onto the opponent's cell, which scores
/// the odd-depth collision constant.
#[test]
fn test_collision_at_odd_depth_scores_maximum() {
    let (board, mut graph, bot, opponent) = position(1, 4, Position::new(1, 2), Position::new(1, 3));
    let before = graph.clone();

    let outcome = SearchEngine::new(1).decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert_eq!(outcome.score, SCORE_MAX);
    assert_eq!(outcome.target, opponent);
    assert_eq!(graph, before);
}

/// Corridor (1,1)..(1,4): bot at (1,1), opponent at (1,3). The bot's only
/// move is (1,2); the opponent can then step onto it, which scores the
/// even-depth collision constant and is what the minimizer picks.
#[test]
fn test_collision_at_even_depth_scores_minimum() {
    let (board, mut graph, bot, opponent) = position(1, 4, Position::new(1, 1), Position::new(1, 3));
    let before = graph.clone();

    let outcome = SearchEngine::new(2).decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert_eq!(outcome.score, SCORE_MIN);
    assert_eq!(outcome.target, board.cell_id(Position::new(1, 2)));
    assert!(!outcome.trapped);
    assert_eq!(graph, before);
}

/// Corridor (1,1)..(1,5): bot at (1,2), opponent at (1,4), three plies.
///
/// After the bot steps to either end of its half, its next ply finds no
/// neighbour left in the graph; those nodes expand to zero children and
/// fall back to a direct evaluation. Stepping to (1,3) lets the opponent
/// collide at ply 2. Every one of those paths has to restore the graph.
#[test]
fn test_dead_end_nodes_restore_graph() {
    let (board, mut graph, bot, opponent) = position(1, 5, Position::new(1, 2), Position::new(1, 4));
    let before = graph.clone();

    let outcome = SearchEngine::new(3).decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert_eq!(outcome.target, board.cell_id(Position::new(1, 1)));
    assert_eq!(outcome.score, 0);
    assert!(!outcome.trapped);
    // root, both opponent replies and the three dead-end bot nodes
    assert_eq!(outcome.stats.nodes_expanded, 6);
    assert_eq!(outcome.stats.leaves_evaluated, 3);
    assert_eq!(graph, before);
}

#[test]
fn test_short_row_edge_is_never_a_target() {
    // (2,15) is the last playable cell of an even row on the default board
    let (board, mut graph, bot, opponent) = position(9, 16, Position::new(2, 15), Position::new(8, 2));
    let edge = board.cell_id(Position::new(2, 16));
    assert!(!graph.contains(edge));
    assert!(graph.neighbors(bot).all(|n| n != edge));
    let before = graph.clone();

    for depth in 1..=3u8 {
        let outcome = SearchEngine::new(depth).decide(&board, &mut graph, bot, opponent, Direction::Right);
        assert!(!outcome.trapped);
        assert_ne!(outcome.target, edge);
        assert!(board.free_neighbors(bot).contains(&outcome.target));
    }
    assert_eq!(graph, before);
}

#[test]
fn test_trapped_bot_reverses() {
    let (mut board, mut graph, bot, opponent) = position(1, 3, Position::new(1, 1), Position::new(1, 3));
    // The middle cell is old trail
    let middle = board.cell_id(Position::new(1, 2));
    board.mark_occupied(middle, Player::Bot).unwrap();
    graph.retire(middle);

    let outcome = SearchEngine::new(3).decide(&board, &mut graph, bot, opponent, Direction::Right);

    assert!(outcome.trapped);
    assert_eq!(outcome.target, board.cell_id(Position::new(1, 0)));
    assert_eq!(outcome.stats.nodes_expanded, 0);

    let (command, taken) = to_command(&board, bot, outcome.target, Direction::Right).unwrap();
    assert_eq!(command, Command::Reverse);
    assert_eq!(command.as_str(), "");
    assert_eq!(taken, Direction::Left);
}

#[test]
fn test_bot_stuck_behind_opponent_is_trapped() {
    // Opponent blocks the only open side; board says no free neighbour
    let (board, mut graph, bot, opponent) = position(1, 3, Position::new(1, 1), Position::new(1, 2));

    let outcome = SearchEngine::new(2).decide(&board, &mut graph, bot, opponent, Direction::UpperRight);

    assert!(outcome.trapped);
    assert_eq!(outcome.target, board.neighbor(bot, Direction::LowerLeft).unwrap());
}
