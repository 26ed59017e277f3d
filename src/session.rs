//! An editing session: one active puzzle, its annotations and its solution

use std::path::Path;

use log::debug;

use crate::annotate::futoshiki::ConstraintSet;
use crate::annotate::hashi::BridgeSet;
use crate::annotate::numberlink::PathSet;
use crate::annotate::nurikabe::MarkSet;
use crate::annotate::shikaku::RectSet;
use crate::client::SolverClient;
use crate::codec::{decode_generated, decode_solution, Generated, GenerateRequest, SolveRequest, Solved};
use crate::error::{PuzzleFileError, SolveError};
use crate::grid::{Coord, Grid};
use crate::puzzle::{PuzzleFile, PuzzleKind};

/// Where a session is in its solve lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Solving,
    Solved,
    Failed,
}

/// The annotation store matching the active puzzle type
#[derive(Debug)]
pub enum Annotations {
    Sudoku,
    Futoshiki(ConstraintSet),
    Numberlink(PathSet),
    Nurikabe(MarkSet),
    Shikaku(RectSet),
    Hashiwokakero(BridgeSet),
}

impl Annotations {
    fn new(kind: PuzzleKind, size: usize) -> Self {
        match kind {
            PuzzleKind::Sudoku => Annotations::Sudoku,
            PuzzleKind::Futoshiki => Annotations::Futoshiki(ConstraintSet::new(size)),
            PuzzleKind::Numberlink => Annotations::Numberlink(PathSet::new()),
            PuzzleKind::Nurikabe => Annotations::Nurikabe(MarkSet::new()),
            PuzzleKind::Shikaku => Annotations::Shikaku(RectSet::new()),
            PuzzleKind::Hashiwokakero => Annotations::Hashiwokakero(BridgeSet::new()),
        }
    }
}

/// One active puzzle with everything layered on it.
///
/// Switching type or size is atomic: the grid, the annotation store and any
/// solution are replaced together, never piecemeal. While a solution is
/// shown the substrate and annotations are frozen.
#[derive(Debug)]
pub struct Session {
    kind: PuzzleKind,
    grid: Grid,
    annotations: Annotations,
    solution: Option<Solved>,
    show_solution: bool,
    status: Status,
    message: Option<String>,
}

impl Session {
    pub fn new(kind: PuzzleKind) -> Self {
        let size = kind.default_size();
        Self {
            kind,
            grid: Grid::empty(size),
            annotations: Annotations::new(kind, size),
            solution: None,
            show_solution: false,
            status: Status::Ready,
            message: None,
        }
    }

    pub fn kind(&self) -> PuzzleKind {
        self.kind
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn solution(&self) -> Option<&Solved> {
        self.solution.as_ref()
    }

    pub fn is_showing_solution(&self) -> bool {
        self.show_solution
    }

    /// Switches the active puzzle type, resetting to its default size
    pub fn switch_kind(&mut self, kind: PuzzleKind) {
        debug!("switching {} -> {}", self.kind, kind);
        *self = Session::new(kind);
    }

    /// Resizes the grid (clamped to the type's limits), discarding the
    /// current cells, annotations and solution
    pub fn resize(&mut self, size: usize) {
        let size = self.kind.clamp_size(size);
        self.grid = Grid::empty(size);
        self.annotations = Annotations::new(self.kind, size);
        self.clear_solution();
        self.status = Status::Ready;
        self.message = None;
    }

    /// Edits one substrate cell; a no-op while a solution is shown
    pub fn set_cell(&mut self, coord: Coord, value: &str) -> bool {
        if self.show_solution || !self.grid.contains(coord) {
            return false;
        }
        self.grid.set(coord, value);
        true
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// The annotation store, writable only while no solution is shown
    pub fn annotations_mut(&mut self) -> Option<&mut Annotations> {
        if self.show_solution {
            None
        } else {
            Some(&mut self.annotations)
        }
    }

    /// Solves the current puzzle through `client`.
    ///
    /// On success the solution is stored and shown; on failure it is
    /// cleared and the error is kept as the session message.
    pub fn solve(&mut self, client: &SolverClient) -> Result<(), SolveError> {
        if self.status == Status::Solving {
            return Ok(());
        }
        self.status = Status::Solving;
        match self.try_solve(client) {
            Ok(solved) => {
                self.solution = Some(solved);
                self.show_solution = true;
                self.status = Status::Solved;
                self.message = None;
                Ok(())
            }
            Err(e) => {
                self.solution = None;
                self.show_solution = false;
                self.status = Status::Failed;
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn try_solve(&self, client: &SolverClient) -> Result<Solved, SolveError> {
        let constraints = match &self.annotations {
            Annotations::Futoshiki(set) => Some(set.triples()),
            _ => None,
        };
        let request = SolveRequest::new(self.kind, &self.grid, constraints);
        let solution = client.solve(&request)?;
        decode_solution(self.kind, solution, &self.grid)
    }

    /// Replaces the session contents with a freshly generated puzzle
    pub fn generate(&mut self, client: &SolverClient) -> Result<(), SolveError> {
        let size = self.size();
        let request = GenerateRequest::new(self.kind, &self.grid);
        let puzzle = client.generate(&request)?;
        match decode_generated(self.kind, puzzle, size)? {
            Generated::Grid(grid) => {
                self.grid = grid;
                self.annotations = Annotations::new(self.kind, size);
            }
            Generated::Futoshiki { grid, constraints } => {
                self.grid = grid;
                self.annotations = Annotations::Futoshiki(constraints);
            }
        }
        self.clear_solution();
        self.status = Status::Ready;
        self.message = None;
        Ok(())
    }

    /// Discards the stored solution and stops showing it
    pub fn clear_solution(&mut self) {
        self.solution = None;
        self.show_solution = false;
    }

    /// Flips between showing the solution and the user's own state; a no-op
    /// when no solution is stored
    pub fn toggle_show_solution(&mut self) -> bool {
        if self.solution.is_none() {
            return false;
        }
        self.show_solution = !self.show_solution;
        self.show_solution
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PuzzleFileError> {
        let constraints = match &self.annotations {
            Annotations::Futoshiki(set) if !set.is_empty() => Some(set.triples()),
            _ => None,
        };
        let file = PuzzleFile {
            kind: self.kind,
            size: self.size(),
            grid: self.grid.clone(),
            constraints,
        };
        file.save(path)
    }

    /// Loads a puzzle file into this session.
    ///
    /// The session changes only if the whole file applies cleanly; a bad
    /// file leaves it untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PuzzleFileError> {
        let file = PuzzleFile::from_file(path)?;
        let size = file.grid.size();
        let annotations = match (file.kind, &file.constraints) {
            (PuzzleKind::Futoshiki, Some(triples)) => Annotations::Futoshiki(
                ConstraintSet::from_triples(triples, size)
                    .map_err(|_| PuzzleFileError::InvalidFormat)?,
            ),
            (kind, _) => Annotations::new(kind, size),
        };
        self.kind = file.kind;
        self.grid = file.grid;
        self.annotations = annotations;
        self.clear_solution();
        self.status = Status::Ready;
        self.message = None;
        Ok(())
    }
}
