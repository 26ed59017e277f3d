//! The shared grid substrate underlying every puzzle type

use std::convert::TryFrom;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The digit text of an empty cell
pub const EMPTY: &str = "0";

/// A cell address in a [`Grid`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord([usize; 2]);

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self([row, col])
    }

    pub fn row(self) -> usize {
        self.0[0]
    }

    pub fn col(self) -> usize {
        self.0[1]
    }

    /// The flattened index `row * size + col` used on the solver wire
    pub fn to_index(self, size: usize) -> usize {
        self.row() * size + self.col()
    }

    pub fn from_index(index: usize, size: usize) -> Self {
        Self([index / size, index % size])
    }

    /// Returns true if `other` is 4-adjacent (Manhattan distance 1)
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dr = self.row().max(other.row()) - self.row().min(other.row());
        let dc = self.col().max(other.col()) - self.col().min(other.col());
        dr + dc == 1
    }

    /// The line shared with `other`, if they are in the same row or column
    pub fn shared_line(self, other: Coord) -> Option<Orientation> {
        if self.row() == other.row() {
            Some(Orientation::Horizontal)
        } else if self.col() == other.col() {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

impl From<[usize; 2]> for Coord {
    fn from(array: [usize; 2]) -> Self {
        Self(array)
    }
}

/// The axis a straight two-cell relationship lies on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A `size`×`size` matrix of digit text, `"0"` meaning empty.
///
/// The grid is the substrate every annotation store is layered over. It is
/// mutated by direct user edits, file loads and puzzle generation only —
/// interaction validators read it but never write it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Grid {
    size: usize,
    cells: Vec<String>,
}

impl Grid {
    /// Creates an all-empty grid of the given size
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY.to_string(); size.pow(2)],
        }
    }

    /// Returns the width (and height) of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row() < self.size && coord.col() < self.size
    }

    pub fn is_empty_cell(&self, coord: Coord) -> bool {
        self[coord] == EMPTY
    }

    /// Sets a cell to the given digit text; anything unparsable becomes empty
    pub fn set(&mut self, coord: Coord, value: &str) {
        let value = match value.trim().parse::<u32>() {
            Ok(n) => n.to_string(),
            Err(_) => EMPTY.to_string(),
        };
        self[coord] = value;
    }

    /// Writes arbitrary display text into a cell (solution glyphs)
    pub(crate) fn set_text(&mut self, coord: Coord, text: impl Into<String>) {
        self[coord] = text.into();
    }

    /// Returns an iterator over the rows of the grid
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.size)
    }

    /// Returns an iterator over every cell, paired with its `Coord`
    pub fn iter_coord(&self) -> impl Iterator<Item = (Coord, &str)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coord::from_index(i, size), cell.as_str()))
    }
}

impl Index<Coord> for Grid {
    type Output = String;

    fn index(&self, coord: Coord) -> &String {
        &self.cells[coord.to_index(self.size)]
    }
}

impl IndexMut<Coord> for Grid {
    fn index_mut(&mut self, coord: Coord) -> &mut String {
        &mut self.cells[coord.to_index(self.size)]
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let len = self.cells.iter().map(|c| c.chars().count()).max().unwrap_or(1);
        for row in self.rows() {
            for cell in row {
                let text = if cell == EMPTY { "." } else { cell };
                write!(f, "{:>1$} ", text, len)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Rejection of a ragged or non-square cell matrix
#[derive(Debug, PartialEq)]
pub struct NonSquareGrid(usize);

impl Display for NonSquareGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "grid with {} rows is not square", self.0)
    }
}

impl std::error::Error for NonSquareGrid {}

impl TryFrom<Vec<Vec<String>>> for Grid {
    type Error = NonSquareGrid;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(NonSquareGrid(size));
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

impl From<Grid> for Vec<Vec<String>> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .chunks(grid.size)
            .map(|row| row.to_vec())
            .collect()
    }
}
