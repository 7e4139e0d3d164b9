// Territory evaluation by flooding the graph from both players
//
// The bot floods first and claims everything it reaches. The opponent then
// floods over the same claim table, taking cells it reaches strictly sooner
// and marking equal-distance cells as contested. A contested cell is never
// claimed again and is not expanded further by the opponent's flood.

use std::collections::{HashMap, VecDeque};

use crate::board::{CellId, Player};
use crate::graph::AdjacencyGraph;

/// Result of one territory evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Territory {
    pub bot: i32,
    pub opponent: i32,
    /// True when the two floods touched each other's source
    pub contested: bool,
}

impl Territory {
    /// Score from the bot's point of view
    pub fn score(&self) -> i32 {
        self.bot - self.opponent
    }
}

#[derive(Debug, Clone, Copy)]
enum Claim {
    Owned { player: Player, distance: u32 },
    Contested,
}

fn slot(player: Player) -> usize {
    match player {
        Player::Bot => 0,
        Player::Opponent => 1,
    }
}

/// Floods the live graph from both sources and counts the cells each side controls
pub fn evaluate(graph: &AdjacencyGraph, bot: CellId, opponent: CellId) -> Territory {
    let sources = [(Player::Bot, bot), (Player::Opponent, opponent)];
    let mut counts = [0i32; 2];
    let mut claims: HashMap<CellId, Claim> = HashMap::new();
    let mut contested = false;

    for &(player, source) in &sources {
        if let Some(Claim::Owned { player: owner, .. }) = claims.get(&source) {
            counts[slot(*owner)] -= 1;
        }
        claims.insert(source, Claim::Owned { player, distance: 0 });

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let reach = match claims.get(&current) {
                Some(Claim::Owned { distance, .. }) => distance + 1,
                _ => continue,
            };

            for next in graph.neighbors(current) {
                if next == bot || next == opponent {
                    contested |= next != source;
                    continue;
                }

                match claims.get(&next).copied() {
                    None => {
                        claims.insert(next, Claim::Owned { player, distance: reach });
                        counts[slot(player)] += 1;
                        queue.push_back(next);
                    }
                    Some(Claim::Owned { player: owner, distance }) if distance > reach => {
                        counts[slot(owner)] -= 1;
                        claims.insert(next, Claim::Owned { player, distance: reach });
                        counts[slot(player)] += 1;
                        queue.push_back(next);
                    }
                    Some(Claim::Owned { player: owner, distance })
                        if distance == reach && owner != player =>
                    {
                        counts[slot(owner)] -= 1;
                        claims.insert(next, Claim::Contested);
                    }
                    Some(_) => {}
                }
            }
        }
    }

    Territory {
        bot: counts[slot(Player::Bot)],
        opponent: counts[slot(Player::Opponent)],
        contested,
    }
}
