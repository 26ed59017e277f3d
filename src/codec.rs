//! Solver wire format: request bodies and solution decoding.
//!
//! Requests carry `{type, size, grid, constraints?}` and answers come back as
//! `{solution}` / `{puzzle}` envelopes. The service family is loose about
//! matrix shape (some back ends return a flat length-n² list, others nested
//! rows), so decoding accepts both and checks dimensions itself.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotate::futoshiki::{ConstraintSet, ConstraintTriple, Symbol};
use crate::annotate::hashi::{Bridge, BridgeSet};
use crate::annotate::numberlink::{line_glyph, PathMatrix};
use crate::annotate::nurikabe::MarkSet;
use crate::annotate::shikaku::Rect;
use crate::error::SolveError;
use crate::grid::{Coord, Grid};
use crate::puzzle::{PuzzleKind, SUDOKU_SIZE};

/// The body of a solve request
#[derive(Debug, Serialize)]
pub struct SolveRequest {
    #[serde(rename = "type")]
    pub kind: PuzzleKind,
    pub size: usize,
    pub grid: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<ConstraintTriple>>,
}

impl SolveRequest {
    pub fn new(kind: PuzzleKind, grid: &Grid, constraints: Option<Vec<ConstraintTriple>>) -> Self {
        Self {
            kind,
            size: grid.size(),
            grid: grid.clone(),
            constraints,
        }
    }

    /// Rejects requests the solver is known to refuse, before any I/O
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.kind == PuzzleKind::Sudoku && self.size != SUDOKU_SIZE {
            return Err(SolveError::InvalidPuzzle(format!(
                "sudoku grids must be 9x9, got {0}x{0}",
                self.size
            )));
        }
        let bounded = match self.kind {
            PuzzleKind::Sudoku | PuzzleKind::Futoshiki => Some(self.size as u32),
            _ => None,
        };
        for (coord, cell) in self.grid.iter_coord() {
            let value = cell.parse::<u32>().map_err(|_| {
                SolveError::InvalidPuzzle(format!("cell {:?} is not a number", coord))
            })?;
            if let Some(max) = bounded {
                if value > max {
                    return Err(SolveError::InvalidPuzzle(format!(
                        "cell {:?} holds {} but the maximum is {}",
                        coord, value, max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The body of a generate request
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub kind: PuzzleKind,
    pub size: usize,
    pub grid: Grid,
}

impl GenerateRequest {
    pub fn new(kind: PuzzleKind, grid: &Grid) -> Self {
        Self {
            kind,
            size: grid.size(),
            grid: grid.clone(),
        }
    }
}

/// A numeric matrix as the back ends variously shape it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatrixPayload {
    Nested(Vec<Vec<i64>>),
    Flat(Vec<i64>),
}

impl MatrixPayload {
    /// Flattens to exactly `size`² values, whichever shape arrived
    fn into_flat(self, size: usize) -> Result<Vec<i64>, SolveError> {
        let flat = match self {
            MatrixPayload::Nested(rows) => rows.into_iter().flatten().collect::<Vec<_>>(),
            MatrixPayload::Flat(values) => values,
        };
        if flat.len() != size.pow(2) {
            return Err(SolveError::MalformedResponse(format!(
                "expected {} cells, got {}",
                size.pow(2),
                flat.len()
            )));
        }
        Ok(flat)
    }
}

fn matrix(value: Value, size: usize) -> Result<Vec<i64>, SolveError> {
    let payload: MatrixPayload = serde_json::from_value(value)
        .map_err(|e| SolveError::MalformedResponse(e.to_string()))?;
    payload.into_flat(size)
}

/// A decoded solution, shaped per puzzle type
#[derive(Debug)]
pub enum Solved {
    /// A full replacement grid (sudoku, futoshiki, numberlink)
    Grid(Grid),
    /// The unchanged grid plus wall marks (nurikabe)
    Marks { grid: Grid, marks: MarkSet },
    /// A non-overlapping rectangle partition (shikaku)
    Rects(Vec<Rect>),
    /// A bridge layout (hashiwokakero)
    Bridges(BridgeSet),
}

/// Decodes the `solution` payload for the given puzzle type.
///
/// `original` is the grid the request was built from; numberlink and
/// nurikabe solutions are defined relative to it.
pub fn decode_solution(
    kind: PuzzleKind,
    solution: Value,
    original: &Grid,
) -> Result<Solved, SolveError> {
    let size = original.size();
    debug!("decoding {} solution", kind);
    match kind {
        PuzzleKind::Sudoku | PuzzleKind::Futoshiki => {
            let flat = matrix(solution, size)?;
            let mut grid = Grid::empty(size);
            for (i, value) in flat.into_iter().enumerate() {
                grid.set_text(Coord::from_index(i, size), value.to_string());
            }
            Ok(Solved::Grid(grid))
        }
        PuzzleKind::Numberlink => {
            let flat = matrix(solution, size)?;
            let mut ids = PathMatrix::new(size);
            for (i, &value) in flat.iter().enumerate() {
                ids.set(Coord::from_index(i, size), value.max(0) as u64);
            }
            // numbered endpoints stay as the user typed them; empty cells
            // covered by a path become line glyphs
            let mut grid = original.clone();
            for coord in (0..size.pow(2)).map(|i| Coord::from_index(i, size)) {
                if !grid.is_empty_cell(coord) {
                    continue;
                }
                if let Some(glyph) = line_glyph(&ids, coord) {
                    grid.set_text(coord, glyph.to_string());
                }
            }
            Ok(Solved::Grid(grid))
        }
        PuzzleKind::Nurikabe => {
            let flat = matrix(solution, size)?;
            let marks = flat
                .iter()
                .enumerate()
                .filter(|(_, &value)| value == 0)
                .map(|(i, _)| Coord::from_index(i, size))
                .filter(|&coord| original.is_empty_cell(coord))
                .collect::<MarkSet>();
            Ok(Solved::Marks {
                grid: original.clone(),
                marks,
            })
        }
        PuzzleKind::Shikaku => {
            let descriptors: RectPayload = serde_json::from_value(solution)
                .map_err(|e| SolveError::MalformedResponse(e.to_string()))?;
            Ok(Solved::Rects(descriptors.into_rects()?))
        }
        PuzzleKind::Hashiwokakero => {
            let nodes: BTreeMap<usize, NodeAdjacency> = serde_json::from_value(solution)
                .map_err(|e| SolveError::MalformedResponse(e.to_string()))?;
            let mut bridges = Vec::new();
            for (&node, adjacency) in &nodes {
                for (&neighbor, &count) in &adjacency.edges {
                    // each undirected bridge appears under both endpoints
                    if neighbor <= node || count == 0 {
                        continue;
                    }
                    if node >= size.pow(2) || neighbor >= size.pow(2) {
                        return Err(SolveError::MalformedResponse(format!(
                            "node index {} outside a {}x{} grid",
                            node.max(neighbor),
                            size,
                            size
                        )));
                    }
                    bridges.push(Bridge {
                        from: Coord::from_index(node, size),
                        to: Coord::from_index(neighbor, size),
                        count: count.min(2),
                    });
                }
            }
            Ok(Solved::Bridges(bridges.into_iter().collect()))
        }
    }
}

/// One rectangle of a shikaku solution, inclusive cell bounds.
/// Extra fields some back ends attach (area, value) are ignored.
#[derive(Debug, Deserialize)]
struct RectDescriptor {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RectPayload {
    List(Vec<RectDescriptor>),
    Indexed(BTreeMap<usize, RectDescriptor>),
}

impl RectPayload {
    fn into_rects(self) -> Result<Vec<Rect>, SolveError> {
        let descriptors = match self {
            RectPayload::List(list) => list,
            RectPayload::Indexed(map) => map.into_iter().map(|(_, d)| d).collect(),
        };
        Ok(descriptors
            .into_iter()
            .zip(1..)
            .map(|(d, id)| Rect::new(id, d.top, d.left, d.bottom, d.right))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct NodeAdjacency {
    edges: BTreeMap<usize, u8>,
}

/// A decoded generated puzzle
#[derive(Debug)]
pub enum Generated {
    Grid(Grid),
    Futoshiki {
        grid: Grid,
        constraints: ConstraintSet,
    },
}

/// One generated futoshiki constraint: `[key, symbol, cell1, cell2, isHorizontal]`.
/// The key and orientation flag are redundant with the cell indices and are
/// re-derived rather than trusted.
#[derive(Debug, Deserialize)]
struct GeneratedConstraint(String, Symbol, usize, usize, bool);

#[derive(Debug, Deserialize)]
struct FutoshikiPuzzle {
    grid: Value,
    constraints: Vec<GeneratedConstraint>,
}

/// Decodes the `puzzle` payload of a generate response
pub fn decode_generated(
    kind: PuzzleKind,
    puzzle: Value,
    size: usize,
) -> Result<Generated, SolveError> {
    let grid_from = |value: Value| -> Result<Grid, SolveError> {
        let flat = matrix(value, size)?;
        let mut grid = Grid::empty(size);
        for (i, v) in flat.into_iter().enumerate() {
            grid.set(Coord::from_index(i, size), &v.to_string());
        }
        Ok(grid)
    };
    match kind {
        PuzzleKind::Futoshiki => {
            let payload: FutoshikiPuzzle = serde_json::from_value(puzzle)
                .map_err(|e| SolveError::MalformedResponse(e.to_string()))?;
            let grid = grid_from(payload.grid)?;
            let triples = payload
                .constraints
                .into_iter()
                .map(|GeneratedConstraint(_, symbol, cell1, cell2, _)| {
                    ConstraintTriple(symbol, cell1, cell2)
                })
                .collect::<Vec<_>>();
            let constraints = ConstraintSet::from_triples(&triples, size)
                .map_err(|e| SolveError::MalformedResponse(e.to_string()))?;
            Ok(Generated::Futoshiki { grid, constraints })
        }
        _ => Ok(Generated::Grid(grid_from(puzzle)?)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{decode_generated, decode_solution, Generated, SolveRequest, Solved};
    use crate::error::SolveError;
    use crate::grid::{Coord, Grid};
    use crate::puzzle::PuzzleKind;

    fn grid_with(size: usize, cells: &[(usize, usize, &str)]) -> Grid {
        let mut grid = Grid::empty(size);
        for &(row, col, value) in cells {
            grid.set(Coord::new(row, col), value);
        }
        grid
    }

    #[test]
    fn request_serializes_nested_grid() {
        let grid = grid_with(2, &[(0, 1, "1")]);
        let request = SolveRequest::new(PuzzleKind::Nurikabe, &grid, None);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json!({
                "type": "nurikabe",
                "size": 2,
                "grid": [["0", "1"], ["0", "0"]],
            }),
            body
        );
    }

    #[test]
    fn validate_forwards_empty_grid() {
        // an all-empty grid is the solver's call, not a request error
        let request = SolveRequest::new(PuzzleKind::Shikaku, &Grid::empty(5), None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_sudoku() {
        let grid = grid_with(9, &[(0, 0, "12")]);
        let request = SolveRequest::new(PuzzleKind::Sudoku, &grid, None);
        assert!(matches!(
            request.validate(),
            Err(SolveError::InvalidPuzzle(_))
        ));
    }

    #[test]
    fn grid_solution_accepts_flat_and_nested() {
        let original = grid_with(2, &[(0, 0, "1")]);
        for solution in vec![json!([1, 2, 2, 1]), json!([[1, 2], [2, 1]])] {
            let solved = decode_solution(PuzzleKind::Sudoku, solution, &original).unwrap();
            match solved {
                Solved::Grid(grid) => assert_eq!("2", grid[Coord::new(0, 1)]),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn wrong_cell_count_is_malformed() {
        let original = Grid::empty(3);
        let result = decode_solution(PuzzleKind::Sudoku, json!([1, 2, 3]), &original);
        assert!(matches!(result, Err(SolveError::MalformedResponse(_))));
    }

    #[test]
    fn numberlink_solution_draws_glyphs_on_empty_cells() {
        let original = grid_with(3, &[(0, 0, "1"), (2, 2, "1")]);
        // path 1 runs down the left edge then along the bottom
        let solution = json!([[1, 0, 0], [1, 0, 0], [1, 1, 1]]);
        let solved = decode_solution(PuzzleKind::Numberlink, solution, &original).unwrap();
        let grid = match solved {
            Solved::Grid(grid) => grid,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!("1", grid[Coord::new(0, 0)]);
        assert_eq!("│", grid[Coord::new(1, 0)]);
        assert_eq!("└", grid[Coord::new(2, 0)]);
        assert_eq!("─", grid[Coord::new(2, 1)]);
        assert_eq!("1", grid[Coord::new(2, 2)]);
        assert_eq!("0", grid[Coord::new(1, 1)]);
    }

    #[test]
    fn nurikabe_solution_marks_walls_without_touching_grid() {
        let original = grid_with(2, &[(0, 0, "2")]);
        let solution = json!([[1, 1], [0, 0]]);
        let solved = decode_solution(PuzzleKind::Nurikabe, solution, &original).unwrap();
        match solved {
            Solved::Marks { grid, marks } => {
                assert_eq!(original, grid);
                assert_eq!(2, marks.len());
                assert!(marks.contains(Coord::new(1, 0)));
                assert!(!marks.contains(Coord::new(0, 0)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shikaku_solution_accepts_indexed_and_listed_rects() {
        let original = grid_with(2, &[(0, 0, "2"), (1, 1, "2")]);
        let indexed = json!({
            "0": {"top": 0, "left": 0, "bottom": 0, "right": 1, "area": 2},
            "1": {"top": 1, "left": 0, "bottom": 1, "right": 1},
        });
        let listed = json!([
            {"top": 0, "left": 0, "bottom": 0, "right": 1},
            {"top": 1, "left": 0, "bottom": 1, "right": 1},
        ]);
        for solution in vec![indexed, listed] {
            match decode_solution(PuzzleKind::Shikaku, solution, &original).unwrap() {
                Solved::Rects(rects) => {
                    assert_eq!(2, rects.len());
                    assert_eq!((0, 0, 0, 1), {
                        let r = &rects[0];
                        (r.start_row, r.end_row, r.start_col, r.end_col)
                    });
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn hashi_solution_emits_each_bridge_once() {
        let original = grid_with(3, &[(0, 0, "2"), (0, 2, "1"), (2, 0, "1")]);
        let solution = json!({
            "0": {"edges": {"2": 1, "6": 2}},
            "2": {"edges": {"0": 1}},
            "6": {"edges": {"0": 2, "8": 0}},
            "8": {"edges": {"6": 0}},
        });
        match decode_solution(PuzzleKind::Hashiwokakero, solution, &original).unwrap() {
            Solved::Bridges(bridges) => {
                assert_eq!(2, bridges.len());
                let (_, vertical) = bridges.bridge_through(Coord::new(1, 0)).unwrap();
                assert_eq!(2, vertical.count);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn hashi_rejects_out_of_range_node() {
        let original = Grid::empty(2);
        let solution = json!({"0": {"edges": {"9": 1}}});
        assert!(matches!(
            decode_solution(PuzzleKind::Hashiwokakero, solution, &original),
            Err(SolveError::MalformedResponse(_))
        ));
    }

    #[test]
    fn generated_futoshiki_rebuilds_constraints() {
        let puzzle = json!({
            "grid": [0, 3, 0, 0, 0, 0, 0, 0, 0],
            "constraints": [["h-0-0", ">", 0, 1, true], ["v-1-2", "<", 5, 8, false]],
        });
        match decode_generated(PuzzleKind::Futoshiki, puzzle, 3).unwrap() {
            Generated::Futoshiki { grid, constraints } => {
                assert_eq!("3", grid[Coord::new(0, 1)]);
                assert_eq!(2, constraints.len());
                assert!(constraints
                    .symbol_between(Coord::new(0, 0), Coord::new(0, 1))
                    .is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn generated_plain_grid() {
        let puzzle = json!([[2, 0], [0, 1]]);
        match decode_generated(PuzzleKind::Nurikabe, puzzle, 2).unwrap() {
            Generated::Grid(grid) => assert_eq!("2", grid[Coord::new(0, 0)]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
