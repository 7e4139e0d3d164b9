// Depth-limited two-player minimax over simulated moves
//
// The tree is walked with an explicit stack. Nodes live in an arena; a
// node's children always occupy the tail of the arena while the node is on
// the stack, so folding them back is a truncate. Expanding a node detaches
// the mover's cell from the live graph and parks the `Removal` token on the
// node; the token is handed back when the node is popped.

use log::{debug, warn};
use rayon::prelude::*;
use std::ops::Range;

use crate::board::{CellId, HexBoard};
use crate::config::SearchConfig;
use crate::graph::{AdjacencyGraph, Removal};
use crate::types::Direction;
use crate::voronoi;

/// Score of a position that is lost for the bot
pub const SCORE_MIN: i32 = i32::MIN;
/// Score of a position that is lost for the opponent
pub const SCORE_MAX: i32 = i32::MAX;

/// Canonical game position: where each player stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub bot: CellId,
    pub opponent: CellId,
}

impl NodeKey {
    pub fn new(bot: CellId, opponent: CellId) -> Self {
        NodeKey { bot, opponent }
    }

    /// Cell of the player moving at `depth`; the bot moves on even plies
    fn mover(&self, depth: u8) -> CellId {
        if depth % 2 == 0 {
            self.bot
        } else {
            self.opponent
        }
    }

    fn with_move(&self, depth: u8, cell: CellId) -> NodeKey {
        if depth % 2 == 0 {
            NodeKey::new(cell, self.opponent)
        } else {
            NodeKey::new(self.bot, cell)
        }
    }

    fn is_collision(&self) -> bool {
        self.bot == self.opponent
    }
}

/// Score of a node whose two players stand on the same cell
///
/// Decided by ply parity alone, even when the mover stepped onto the
/// opponent on purpose; odd plies therefore score the maximum.
pub fn collision_score(depth: u8) -> i32 {
    if depth % 2 == 0 {
        SCORE_MIN
    } else {
        SCORE_MAX
    }
}

#[derive(Debug)]
struct SearchNode {
    key: NodeKey,
    depth: u8,
    score: i32,
    best: Option<NodeKey>,
    children: Range<usize>,
    expanded: bool,
    removal: Option<Removal>,
}

impl SearchNode {
    fn new(key: NodeKey, depth: u8) -> Self {
        SearchNode {
            key,
            depth,
            score: 0,
            best: None,
            children: 0..0,
            expanded: false,
            removal: None,
        }
    }
}

/// Work counters for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub leaves_evaluated: usize,
}

impl SearchStats {
    fn absorb(&mut self, other: SearchStats) {
        self.nodes_expanded += other.nodes_expanded;
        self.leaves_evaluated += other.leaves_evaluated;
    }
}

/// What the search settled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub target: CellId,
    pub score: i32,
    pub stats: SearchStats,
    /// The bot had no free neighbour and fell back to reversing
    pub trapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    max_depth: u8,
    parallel_root: bool,
}

impl SearchEngine {
    /// A depth of zero is raised to one ply; the root alone never yields a move
    pub fn new(max_depth: u8) -> Self {
        SearchEngine {
            max_depth: max_depth.max(1),
            parallel_root: false,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        SearchEngine::new(config.max_depth).with_parallel_root(config.parallel_root)
    }

    /// Searches each first move on its own graph copy in parallel
    pub fn with_parallel_root(mut self, enabled: bool) -> Self {
        self.parallel_root = enabled;
        self
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Picks the bot's destination cell
    ///
    /// The graph is mutated during the search and is identical to its input
    /// state when this returns.
    pub fn decide(
        &self,
        board: &HexBoard,
        graph: &mut AdjacencyGraph,
        bot: CellId,
        opponent: CellId,
        heading: Direction,
    ) -> SearchOutcome {
        if board.free_neighbors(bot).is_empty() {
            warn!("Bot at cell {} is trapped, reversing", bot);
            return Self::trapped(board, bot, heading, SearchStats::default());
        }

        let root = NodeKey::new(bot, opponent);
        let (score, best, stats) = if self.parallel_root {
            self.search_root_parallel(graph, root)
        } else {
            let mut stats = SearchStats::default();
            let (score, best) = search_subtree(graph, root, 0, self.max_depth, &mut stats);
            (score, best, stats)
        };

        debug!(
            "Search from {:?}: score {}, {} expansions, {} leaves",
            root, score, stats.nodes_expanded, stats.leaves_evaluated
        );

        match best {
            Some(key) => SearchOutcome {
                target: key.bot,
                score,
                stats,
                trapped: false,
            },
            None => Self::trapped(board, bot, heading, stats),
        }
    }

    fn trapped(board: &HexBoard, bot: CellId, heading: Direction, stats: SearchStats) -> SearchOutcome {
        let target = board.neighbor(bot, heading.opposite()).unwrap_or(bot);
        SearchOutcome {
            target,
            score: SCORE_MIN,
            stats,
            trapped: true,
        }
    }

    fn search_root_parallel(
        &self,
        graph: &mut AdjacencyGraph,
        root: NodeKey,
    ) -> (i32, Option<NodeKey>, SearchStats) {
        let first_moves: Vec<CellId> = graph.neighbors(root.bot).collect();
        let max_depth = self.max_depth;

        let branches: Vec<(NodeKey, i32, SearchStats)> = graph.with_removed(root.bot, |g| {
            let shared: &AdjacencyGraph = g;
            first_moves
                .par_iter()
                .map(|&cell| {
                    let mut local = shared.clone();
                    let key = root.with_move(0, cell);
                    let mut stats = SearchStats::default();
                    let (score, _) = search_subtree(&mut local, key, 1, max_depth, &mut stats);
                    (key, score, stats)
                })
                .collect()
        });

        let mut stats = SearchStats {
            nodes_expanded: 1,
            leaves_evaluated: 0,
        };
        let mut best: Option<(i32, NodeKey)> = None;
        for (key, score, branch_stats) in branches {
            stats.absorb(branch_stats);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, key));
            }
        }

        match best {
            Some((score, key)) => (score, Some(key), stats),
            None => {
                stats.leaves_evaluated += 1;
                let score = voronoi::evaluate(graph, root.bot, root.opponent).score();
                (score, None, stats)
            }
        }
    }
}

/// Minimax from `root` at ply `depth`; returns the root score and its best child
pub fn search_subtree(
    graph: &mut AdjacencyGraph,
    root: NodeKey,
    depth: u8,
    max_depth: u8,
    stats: &mut SearchStats,
) -> (i32, Option<NodeKey>) {
    let mut arena = vec![SearchNode::new(root, depth)];
    let mut stack = vec![0usize];

    while let Some(&idx) = stack.last() {
        let key = arena[idx].key;
        let depth = arena[idx].depth;

        if key.is_collision() {
            arena[idx].score = collision_score(depth);
            stack.pop();
            continue;
        }

        if !arena[idx].expanded && depth < max_depth {
            let mover = key.mover(depth);
            let moves: Vec<CellId> = graph.neighbors(mover).collect();
            let removal = graph.remove(mover);

            let start = arena.len();
            arena.extend(
                moves
                    .into_iter()
                    .map(|cell| SearchNode::new(key.with_move(depth, cell), depth + 1)),
            );
            let end = arena.len();

            let node = &mut arena[idx];
            node.children = start..end;
            node.expanded = true;
            node.removal = Some(removal);
            stack.extend(start..end);
            stats.nodes_expanded += 1;
            continue;
        }

        if !arena[idx].expanded {
            arena[idx].score = voronoi::evaluate(graph, key.bot, key.opponent).score();
            stats.leaves_evaluated += 1;
            stack.pop();
            continue;
        }

        let children = arena[idx].children.clone();
        debug_assert_eq!(children.end, arena.len());
        let maximizing = depth % 2 == 0;
        let mut best: Option<(i32, NodeKey)> = None;
        for child in &arena[children.clone()] {
            let better = match best {
                None => true,
                Some((score, _)) if maximizing => child.score > score,
                Some((score, _)) => child.score < score,
            };
            if better {
                best = Some((child.score, child.key));
            }
        }
        arena.truncate(children.start);

        if let Some(removal) = arena[idx].removal.take() {
            graph.restore(removal);
        }

        let node = &mut arena[idx];
        match best {
            Some((score, child)) => {
                node.score = score;
                node.best = Some(child);
            }
            None => {
                node.score = voronoi::evaluate(graph, key.bot, key.opponent).score();
                stats.leaves_evaluated += 1;
            }
        }
        stack.pop();
    }

    let root = &arena[0];
    (root.score, root.best)
}
