//! Futoshiki inequality constraints between adjacent cells

use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::grid::{Coord, Orientation};

/// An inequality glyph as it appears on the wire and in puzzle files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
}

/// The cycle position of a constraint slot: empty, `>`, or `<`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintState {
    Empty,
    GreaterThan,
    LessThan,
}

impl ConstraintState {
    /// The next state in the empty → `>` → `<` → empty cycle
    pub fn next(self) -> ConstraintState {
        match self {
            ConstraintState::Empty => ConstraintState::GreaterThan,
            ConstraintState::GreaterThan => ConstraintState::LessThan,
            ConstraintState::LessThan => ConstraintState::Empty,
        }
    }

    pub fn symbol(self) -> Option<Symbol> {
        match self {
            ConstraintState::Empty => None,
            ConstraintState::GreaterThan => Some(Symbol::GreaterThan),
            ConstraintState::LessThan => Some(Symbol::LessThan),
        }
    }
}

impl From<Symbol> for ConstraintState {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::GreaterThan => ConstraintState::GreaterThan,
            Symbol::LessThan => ConstraintState::LessThan,
        }
    }
}

/// The slot between two orthogonally adjacent cells.
///
/// A horizontal slot is addressed by its shared row and the smaller column;
/// a vertical slot by the smaller row and the shared column. Both click
/// orders resolve to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintKey {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl ConstraintKey {
    /// The slot between `a` and `b`, or `None` if they are not adjacent
    pub fn between(a: Coord, b: Coord) -> Option<ConstraintKey> {
        if !a.is_adjacent(b) {
            return None;
        }
        let key = match a.shared_line(b) {
            Some(Orientation::Horizontal) => ConstraintKey {
                orientation: Orientation::Horizontal,
                row: a.row(),
                col: a.col().min(b.col()),
            },
            Some(Orientation::Vertical) => ConstraintKey {
                orientation: Orientation::Vertical,
                row: a.row().min(b.row()),
                col: a.col(),
            },
            None => return None,
        };
        Some(key)
    }

    /// The two cells the slot sits between, in reading order
    pub fn cells(self) -> (Coord, Coord) {
        match self.orientation {
            Orientation::Horizontal => (
                Coord::new(self.row, self.col),
                Coord::new(self.row, self.col + 1),
            ),
            Orientation::Vertical => (
                Coord::new(self.row, self.col),
                Coord::new(self.row + 1, self.col),
            ),
        }
    }
}

/// A committed inequality.
///
/// `cell1` and `cell2` are flattened `row * size + col` indices fixed when
/// the constraint is first created; cycling `>` to `<` keeps them as-is and
/// flips only the symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub symbol: Symbol,
    pub cell1: usize,
    pub cell2: usize,
}

/// An exported constraint as the ordered `[symbol, cell1, cell2]` triple
/// used by solve requests and puzzle files
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintTriple(pub Symbol, pub usize, pub usize);

/// The inequality annotation store for Futoshiki
#[derive(Debug)]
pub struct ConstraintSet {
    size: usize,
    constraints: AHashMap<ConstraintKey, Constraint>,
}

impl ConstraintSet {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            constraints: AHashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cycles the slot between `a` and `b` one step.
    ///
    /// Returns the new state, or `None` if the cells are not orthogonally
    /// adjacent. Reaching `Empty` removes the constraint entirely.
    pub fn toggle(&mut self, a: Coord, b: Coord) -> Option<ConstraintState> {
        let key = ConstraintKey::between(a, b)?;
        let next = self.state(key).next();
        match next.symbol() {
            None => {
                self.constraints.remove(&key);
            }
            Some(symbol) => {
                let (c1, c2) = key.cells();
                let size = self.size;
                self.constraints
                    .entry(key)
                    .and_modify(|c| c.symbol = symbol)
                    .or_insert(Constraint {
                        symbol,
                        cell1: c1.to_index(size),
                        cell2: c2.to_index(size),
                    });
            }
        }
        Some(next)
    }

    pub fn state(&self, key: ConstraintKey) -> ConstraintState {
        self.constraints
            .get(&key)
            .map(|c| c.symbol.into())
            .unwrap_or(ConstraintState::Empty)
    }

    /// The symbol between `a` and `b`, if the cells are adjacent and the
    /// slot holds one
    pub fn symbol_between(&self, a: Coord, b: Coord) -> Option<Symbol> {
        let key = ConstraintKey::between(a, b)?;
        self.constraints.get(&key).map(|c| c.symbol)
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConstraintKey, &Constraint)> {
        self.constraints.iter()
    }

    /// Exports every constraint as a triple, sorted by slot for a
    /// deterministic wire and file order
    pub fn triples(&self) -> Vec<ConstraintTriple> {
        self.constraints
            .iter()
            .sorted_by_key(|(key, _)| **key)
            .map(|(_, c)| ConstraintTriple(c.symbol, c.cell1, c.cell2))
            .collect()
    }

    /// Rebuilds a store from exported triples.
    ///
    /// Any triple whose cells are not orthogonally adjacent within the grid
    /// invalidates the whole set.
    pub fn from_triples(
        triples: &[ConstraintTriple],
        size: usize,
    ) -> Result<ConstraintSet, BadConstraint> {
        let mut set = ConstraintSet::new(size);
        for &ConstraintTriple(symbol, cell1, cell2) in triples {
            if cell1.max(cell2) >= size.pow(2) {
                return Err(BadConstraint(cell1, cell2));
            }
            let a = Coord::from_index(cell1, size);
            let b = Coord::from_index(cell2, size);
            let key = ConstraintKey::between(a, b).ok_or(BadConstraint(cell1, cell2))?;
            set.constraints.insert(
                key,
                Constraint {
                    symbol,
                    cell1,
                    cell2,
                },
            );
        }
        Ok(set)
    }
}

/// A constraint triple between cells that are not adjacent on the grid
#[derive(Debug, PartialEq)]
pub struct BadConstraint(pub usize, pub usize);

impl std::fmt::Display for BadConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cells {} and {} are not adjacent", self.0, self.1)
    }
}

impl std::error::Error for BadConstraint {}
