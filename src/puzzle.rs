//! Puzzle kinds and the persisted puzzle file format

use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::annotate::futoshiki::ConstraintTriple;
use crate::error::PuzzleFileError;
use crate::grid::Grid;

/// Smallest supported grid size
pub const MIN_SIZE: usize = 5;
/// Largest supported grid size
pub const MAX_SIZE: usize = 20;
/// Sudoku grids are always 9×9
pub const SUDOKU_SIZE: usize = 9;

/// One of the six supported puzzle types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleKind {
    Sudoku,
    Futoshiki,
    Numberlink,
    Nurikabe,
    Shikaku,
    Hashiwokakero,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 6] = [
        PuzzleKind::Sudoku,
        PuzzleKind::Futoshiki,
        PuzzleKind::Numberlink,
        PuzzleKind::Nurikabe,
        PuzzleKind::Shikaku,
        PuzzleKind::Hashiwokakero,
    ];

    /// The identifier used on the solver wire and in puzzle files
    pub fn name(self) -> &'static str {
        match self {
            PuzzleKind::Sudoku => "sudoku",
            PuzzleKind::Futoshiki => "futoshiki",
            PuzzleKind::Numberlink => "numberlink",
            PuzzleKind::Nurikabe => "nurikabe",
            PuzzleKind::Shikaku => "shikaku",
            PuzzleKind::Hashiwokakero => "hashiwokakero",
        }
    }

    pub fn from_name(name: &str) -> Option<PuzzleKind> {
        PuzzleKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// The grid size presented when this kind becomes active
    pub fn default_size(self) -> usize {
        match self {
            PuzzleKind::Sudoku => SUDOKU_SIZE,
            PuzzleKind::Futoshiki => 5,
            PuzzleKind::Numberlink => 7,
            PuzzleKind::Nurikabe => 5,
            PuzzleKind::Shikaku => 5,
            PuzzleKind::Hashiwokakero => 7,
        }
    }

    /// Clamps a requested grid size to what this kind supports
    pub fn clamp_size(self, size: usize) -> usize {
        if self == PuzzleKind::Sudoku {
            SUDOKU_SIZE
        } else {
            size.max(MIN_SIZE).min(MAX_SIZE)
        }
    }
}

impl Display for PuzzleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The persisted puzzle file: `{type, size, grid, constraints?}`.
///
/// `constraints` is present only for futoshiki and uses the same ordered
/// `[symbol, cell1, cell2]` triples as the solve request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleFile {
    #[serde(rename = "type")]
    pub kind: PuzzleKind,
    // optional on load; parse derives it from the grid
    #[serde(default)]
    pub size: usize,
    pub grid: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<ConstraintTriple>>,
}

impl PuzzleFile {
    /// Parses a puzzle file, rejecting anything without `type` and `grid`.
    ///
    /// A schema mismatch never partially applies: the result is either a
    /// complete `PuzzleFile` or an error.
    pub fn parse(json: &str) -> Result<Self, PuzzleFileError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or(PuzzleFileError::InvalidFormat)?;
        if !object.contains_key("type") || !object.contains_key("grid") {
            return Err(PuzzleFileError::InvalidFormat);
        }
        let mut file: PuzzleFile =
            serde_json::from_value(value).map_err(|_| PuzzleFileError::InvalidFormat)?;
        // the grid is authoritative for size
        file.size = file.grid.size();
        Ok(file)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PuzzleFileError> {
        let json = fs::read_to_string(path)?;
        Self::parse(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PuzzleFileError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        debug!("saved {} puzzle ({}x{})", self.kind, self.size, self.size);
        Ok(())
    }
}
