//! Local-search reordering.
//!
//! Drop and block elements are hoisted as early as possible so that downstream elements see less
//! traffic, and copy elements are sunk as late as possible so that fewer elements run on
//! duplicated traffic. A move is accepted only if the moved chain is equivalent to the current
//! one. After every accepted move the scan restarts from the new chain; the search stops once a
//! full scan accepts nothing.
//!
//! Every hoisting move lowers the sum of the drop and block positions, and a sinking move is only
//! tried if it does not raise that sum, so an element that both drops and copies is never moved
//! back and forth.

use crate::{Element, OptimizeError, Oracle, Result, display_chain, init_dependency};
use adn_config::{EquivalenceLevel, TrafficPath};

/// Statistics from a reordering run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReorderStats {
    /// Number of accepted moves that hoisted a drop or block element.
    pub drops_hoisted: usize,
    /// Number of accepted moves that sank a copy element.
    pub copies_sunk: usize,
    /// Number of candidate chains checked for equivalence.
    pub candidates: usize,
}

impl ReorderStats {
    /// Returns the total number of accepted moves.
    #[must_use]
    pub fn total_moves(&self) -> usize {
        self.drops_hoisted + self.copies_sunk
    }
}

/// A move of one element to another position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Move {
    /// Move the element at `to` in front of the element at `from`.
    Forward { from: usize, to: usize },
    /// Move the element at `from` right behind the element at `to`.
    Backward { from: usize, to: usize },
}

impl Move {
    fn apply(self, chain: &[Element]) -> Vec<Element> {
        let mut new_chain = chain.to_vec();
        match self {
            Self::Forward { from, to } => new_chain[from..=to].rotate_right(1),
            Self::Backward { from, to } => new_chain[from..=to].rotate_left(1),
        }
        new_chain
    }
}

/// Which kind of element a move improves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Goal {
    HoistDrop,
    SinkCopy,
}

/// The reordering pass.
#[derive(Debug)]
pub struct Reorderer {
    path: TrafficPath,
    level: EquivalenceLevel,
    max_moves: usize,
    /// Statistics from the last run.
    pub stats: ReorderStats,
}

impl Reorderer {
    /// Creates a new reorderer that gives up after `max_moves` accepted moves.
    #[must_use]
    pub fn new(path: TrafficPath, level: EquivalenceLevel, max_moves: usize) -> Self {
        Self { path, level, max_moves, stats: ReorderStats::default() }
    }

    /// Reorders `chain` until no move is accepted.
    ///
    /// Adds the trace effects to every element first.
    pub fn run(&mut self, mut chain: Vec<Element>) -> Result<Vec<Element>> {
        self.stats = ReorderStats::default();
        init_dependency(&mut chain, self.path);
        while let Some(new_chain) = self.step(&chain)? {
            if self.stats.total_moves() > self.max_moves {
                return Err(OptimizeError::MoveBudgetExhausted {
                    path: self.path,
                    moves: self.max_moves,
                });
            }
            chain = new_chain;
        }
        debug!(
            path = %self.path,
            drops_hoisted = self.stats.drops_hoisted,
            copies_sunk = self.stats.copies_sunk,
            chain = %display_chain(&chain),
            "reordered chain",
        );
        Ok(chain)
    }

    /// Scans `chain` once and returns the first accepted move's result.
    fn step(&mut self, chain: &[Element]) -> Result<Option<Vec<Element>>> {
        let oracle = Oracle::new(chain, self.path, self.level)?;
        let (drops, non_drops): (Vec<usize>, Vec<usize>) =
            (0..chain.len()).partition(|&i| chain[i].effects(self.path).drops_or_blocks());
        let (copies, non_copies): (Vec<usize>, Vec<usize>) =
            (0..chain.len()).partition(|&i| chain[i].effects(self.path).copy);

        for &i in &non_drops {
            for &j in drops.iter().rev() {
                if i > j {
                    break;
                }
                let moves =
                    [Move::Forward { from: i, to: j }, Move::Backward { from: i, to: j }].map(Some);
                if let Some(new_chain) = self.try_moves(&oracle, chain, moves, Goal::HoistDrop)? {
                    return Ok(Some(new_chain));
                }
            }
        }
        let drop_rank = self.drop_rank(chain);
        for &i in &copies {
            for &j in non_copies.iter().rev() {
                if i > j {
                    break;
                }
                let moves = [Move::Backward { from: i, to: j }, Move::Forward { from: i, to: j }]
                    .map(|mv| (self.drop_rank(&mv.apply(chain)) <= drop_rank).then_some(mv));
                if let Some(new_chain) = self.try_moves(&oracle, chain, moves, Goal::SinkCopy)? {
                    return Ok(Some(new_chain));
                }
            }
        }
        Ok(None)
    }

    /// Sum of the positions of the drop and block elements.
    fn drop_rank(&self, chain: &[Element]) -> usize {
        chain
            .iter()
            .enumerate()
            .filter(|(_, e)| e.effects(self.path).drops_or_blocks())
            .map(|(i, _)| i)
            .sum()
    }

    fn try_moves(
        &mut self,
        oracle: &Oracle,
        chain: &[Element],
        moves: [Option<Move>; 2],
        goal: Goal,
    ) -> Result<Option<Vec<Element>>> {
        for mv in moves.into_iter().flatten() {
            let new_chain = mv.apply(chain);
            self.stats.candidates += 1;
            trace!(?goal, ?mv, chain = %display_chain(&new_chain), "trying move");
            if oracle.accepts(&new_chain)? {
                debug!(?goal, ?mv, chain = %display_chain(&new_chain), "accepted move");
                match goal {
                    Goal::HoistDrop => self.stats.drops_hoisted += 1,
                    Goal::SinkCopy => self.stats.copies_sunk += 1,
                }
                return Ok(Some(new_chain));
            }
        }
        Ok(None)
    }
}

/// Reorders `chain` on `path` at `level`, accepting at most `max_moves` moves.
pub fn reorder(
    chain: Vec<Element>,
    path: TrafficPath,
    level: EquivalenceLevel,
    max_moves: usize,
) -> Result<Vec<Element>> {
    Reorderer::new(path, level, max_moves).run(chain)
}
