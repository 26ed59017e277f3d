//! Nurikabe wall mark store

use std::iter::FromIterator;

use ahash::AHashSet;

use crate::grid::{Coord, Grid};

/// Outcome of toggling a wall mark
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleMark {
    Added,
    Removed,
    /// The cell carries an island number and cannot be marked
    Rejected,
}

/// The wall mark annotation store for Nurikabe.
///
/// Marks live only on cells the grid leaves empty; numbered island cells
/// reject them. Removal is always allowed so a stale mark can be cleared
/// even after the cell underneath was given a number.
#[derive(Debug, Default)]
pub struct MarkSet {
    marks: AHashSet<Coord>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, grid: &Grid, coord: Coord) -> ToggleMark {
        if self.marks.remove(&coord) {
            return ToggleMark::Removed;
        }
        if !grid.is_empty_cell(coord) {
            return ToggleMark::Rejected;
        }
        self.marks.insert(coord);
        ToggleMark::Added
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.marks.contains(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

impl FromIterator<Coord> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            marks: iter.into_iter().collect(),
        }
    }
}
