// Per-match decision engine
//
// A `Bot` is created for one match, set up once, then asked for a command
// every round. It owns the board and graph of that match and nothing else.

use log::{error, info};
use std::time::Instant;

use crate::board::{CellId, CellState, HexBoard, Player};
use crate::config::Config;
use crate::error::EngineError;
use crate::graph::AdjacencyGraph;
use crate::search::SearchEngine;
use crate::translator::MoveTranslator;
use crate::types::{Command, Position};

/// State that exists between `setup` and the end of the match
#[derive(Debug, Clone)]
struct MatchState {
    board: HexBoard,
    graph: AdjacencyGraph,
    bot: CellId,
    opponent: CellId,
    round: u32,
    translator: MoveTranslator,
}

/// Move-decision engine for one match
#[derive(Debug, Clone)]
pub struct Bot {
    search: SearchEngine,
    state: Option<MatchState>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    pub fn new(config: Config) -> Self {
        Bot {
            search: SearchEngine::from_config(&config.search),
            state: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// Builds the board and graph of a new match and places both players
    pub fn setup(
        &mut self,
        rows: usize,
        cols: usize,
        bot_position: Position,
        opponent_position: Position,
    ) -> Result<(), EngineError> {
        let mut board = HexBoard::new(rows, cols)?;
        let graph = AdjacencyGraph::build(&board);

        let bot = board.interior_cell(bot_position)?;
        let opponent = board.interior_cell(opponent_position)?;
        if bot == opponent {
            return Err(EngineError::SamePosition(bot));
        }
        board.mark_occupied(bot, Player::Bot)?;
        board.mark_occupied(opponent, Player::Opponent)?;

        let translator = MoveTranslator::for_start(&board, bot_position);
        info!(
            "Match setup on {}x{} board: bot at cell {}, opponent at cell {}, heading {:?}, depth {}",
            rows,
            cols,
            bot,
            opponent,
            translator.heading(),
            self.search.max_depth()
        );

        self.state = Some(MatchState {
            board,
            graph,
            bot,
            opponent,
            round: 0,
            translator,
        });
        Ok(())
    }

    /// Applies the positions reported for this round and returns the bot's command
    pub fn next_move(
        &mut self,
        bot_position: Position,
        opponent_position: Position,
    ) -> Result<Command, EngineError> {
        let start_time = Instant::now();
        let search = self.search;
        let state = self.state.as_mut().ok_or_else(|| {
            error!("next_move called before setup");
            EngineError::NotInitialized
        })?;

        let round = state.round + 1;
        let (bot, opponent) = state
            .resolve_positions(round, bot_position, opponent_position)
            .map_err(|e| {
                error!("Round {}: rejected positions: {}", round, e);
                e
            })?;
        state.apply_positions(round, bot, opponent)?;

        let outcome = search.decide(
            &state.board,
            &mut state.graph,
            state.bot,
            state.opponent,
            state.translator.heading(),
        );
        let command = state
            .translator
            .translate(&state.board, state.bot, outcome.target)?;

        info!(
            "Round {}: Chose {:?} to cell {} (score: {}, expansions: {}, leaves: {}, time: {}ms)",
            round,
            command,
            outcome.target,
            outcome.score,
            outcome.stats.nodes_expanded,
            outcome.stats.leaves_evaluated,
            start_time.elapsed().as_millis()
        );

        Ok(command)
    }
}

impl MatchState {
    /// Validates reported positions without touching any state
    fn resolve_positions(
        &self,
        round: u32,
        bot_position: Position,
        opponent_position: Position,
    ) -> Result<(CellId, CellId), EngineError> {
        let bot = self.board.interior_cell(bot_position)?;
        let opponent = self.board.interior_cell(opponent_position)?;
        if bot == opponent {
            return Err(EngineError::SamePosition(bot));
        }
        self.check_cell(round, bot, self.bot, Player::Bot)?;
        self.check_cell(round, opponent, self.opponent, Player::Opponent)?;
        Ok((bot, opponent))
    }

    /// A reported cell must be free, except that the first round may repeat the start cell
    fn check_cell(
        &self,
        round: u32,
        cell: CellId,
        current: CellId,
        player: Player,
    ) -> Result<(), EngineError> {
        let state = self.board.state(cell);
        let repeated_start = round == 1 && cell == current && state == CellState::from(player);
        if state == CellState::Free || repeated_start {
            Ok(())
        } else {
            Err(EngineError::Desync {
                cell,
                state,
                player,
            })
        }
    }

    /// Records the real moves: vacated cells become trail and leave the graph for good
    ///
    /// A first-round report of the start cell is a placement, so nothing is vacated.
    fn apply_positions(
        &mut self,
        round: u32,
        bot: CellId,
        opponent: CellId,
    ) -> Result<(), EngineError> {
        if bot != self.bot {
            self.board.mark_occupied(bot, Player::Bot)?;
            self.graph.retire(self.bot);
            self.translator.follow(&self.board, self.bot, bot);
        }
        if opponent != self.opponent {
            self.board.mark_occupied(opponent, Player::Opponent)?;
            self.graph.retire(self.opponent);
        }

        self.bot = bot;
        self.opponent = opponent;
        self.round = round;
        Ok(())
    }
}
