// Adjacency graph over the live cells of a board
//
// Cells leave the graph permanently when a player vacates them, and
// transiently while the search simulates a move. Every transient removal
// hands out a `Removal` token that must be given back to `restore`.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::{CellId, CellState, HexBoard};
use crate::types::Direction;

/// Neighbour sets keyed by cell id
///
/// Ordered collections keep neighbour iteration stable, which the search
/// relies on for deterministic tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    adjacency: BTreeMap<CellId, BTreeSet<CellId>>,
}

/// Everything needed to undo one `AdjacencyGraph::remove`
#[must_use = "a removed cell has to be handed back to AdjacencyGraph::restore"]
#[derive(Debug, PartialEq, Eq)]
pub struct Removal {
    cell: CellId,
    neighbors: Option<BTreeSet<CellId>>,
}

impl Removal {
    pub fn cell(&self) -> CellId {
        self.cell
    }
}

impl AdjacencyGraph {
    /// Links every free cell to its in-bounds, non-wall neighbours
    pub fn build(board: &HexBoard) -> Self {
        let mut adjacency = BTreeMap::new();
        for cell in 0..board.cell_count() {
            if !board.is_free(cell) {
                continue;
            }
            let neighbors: BTreeSet<CellId> = Direction::all()
                .iter()
                .filter_map(|&dir| board.neighbor(cell, dir))
                .filter(|&n| board.state(n) != CellState::Wall)
                .collect();
            adjacency.insert(cell, neighbors);
        }
        AdjacencyGraph { adjacency }
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.adjacency.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Current neighbours of `cell`; empty once the cell has been removed
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.adjacency
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, cell: CellId) -> usize {
        self.adjacency.get(&cell).map_or(0, BTreeSet::len)
    }

    /// Detaches `cell` from the graph and returns the data needed to put it back
    ///
    /// Removing a cell that has no entry is a no-op whose token restores nothing.
    pub fn remove(&mut self, cell: CellId) -> Removal {
        let neighbors = self.adjacency.remove(&cell);
        if let Some(ref set) = neighbors {
            for n in set {
                if let Some(back) = self.adjacency.get_mut(n) {
                    back.remove(&cell);
                }
            }
        }
        Removal { cell, neighbors }
    }

    /// Undoes the matching `remove`
    pub fn restore(&mut self, removal: Removal) {
        let Removal { cell, neighbors } = removal;
        if let Some(set) = neighbors {
            for n in &set {
                if let Some(back) = self.adjacency.get_mut(n) {
                    back.insert(cell);
                }
            }
            self.adjacency.insert(cell, set);
        }
    }

    /// Removes a cell for good, e.g. when a player's previous cell becomes trail
    pub fn retire(&mut self, cell: CellId) {
        let _ = self.remove(cell);
    }

    /// Runs `f` with `cell` detached, restoring it before returning
    pub fn with_removed<R>(&mut self, cell: CellId, f: impl FnOnce(&mut Self) -> R) -> R {
        let removal = self.remove(cell);
        let result = f(self);
        self.restore(removal);
        result
    }
}
