//! Numberlink path tracing and solution line glyphs

use ahash::AHashMap;
use log::debug;

use crate::grid::{Coord, Grid};

pub type PathId = u64;

/// A completed path connecting the two endpoints of one number
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub id: PathId,
    pub number: String,
    pub trace: Vec<Coord>,
}

impl Path {
    pub fn start(&self) -> Coord {
        self.trace[0]
    }

    pub fn end(&self) -> Coord {
        self.trace[self.trace.len() - 1]
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.trace.contains(&coord)
    }
}

#[derive(Debug)]
struct PathTrace {
    number: String,
    trace: Vec<Coord>,
}

/// The path annotation store for Numberlink.
///
/// A path is built incrementally: [`start_path`](PathSet::start_path) anchors
/// it on a numbered cell, [`extend_path`](PathSet::extend_path) appends
/// adjacent cells, and [`end_path`](PathSet::end_path) commits it if it
/// terminates on the matching number's other endpoint. At most one path per
/// number is kept; committing a new one evicts the old.
#[derive(Debug, Default)]
pub struct PathSet {
    paths: AHashMap<String, Path>,
    next_id: PathId,
    current: Option<PathTrace>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors a new trace at `coord`; only numbered cells can start a path
    pub fn start_path(&mut self, grid: &Grid, coord: Coord) -> bool {
        if grid.is_empty_cell(coord) {
            return false;
        }
        self.current = Some(PathTrace {
            number: grid[coord].clone(),
            trace: vec![coord],
        });
        true
    }

    /// Appends `coord` to the active trace.
    ///
    /// Cells that are not 4-adjacent to the trace head are silently skipped
    /// so a fast drag degrades gracefully. Only the head is compared, so
    /// backtracking over earlier cells keeps the trace alive.
    pub fn extend_path(&mut self, coord: Coord) {
        if let Some(current) = &mut self.current {
            let head = current.trace[current.trace.len() - 1];
            if head.is_adjacent(coord) {
                current.trace.push(coord);
            }
        }
    }

    /// Ends the active trace at `coord` and commits it if valid.
    ///
    /// A trace commits only when its final cell carries the same number as
    /// its anchor and is a different cell. A committed path replaces any
    /// earlier path for that number.
    pub fn end_path(&mut self, grid: &Grid, coord: Coord) -> Option<&Path> {
        self.extend_path(coord);
        let current = self.current.take()?;
        let last = current.trace[current.trace.len() - 1];
        if grid[last] != current.number || last == current.trace[0] {
            debug!("path for {:?} discarded at {:?}", current.number, last);
            return None;
        }
        self.next_id += 1;
        let number = current.number;
        let path = Path {
            id: self.next_id,
            number: number.clone(),
            trace: current.trace,
        };
        self.paths.insert(number.clone(), path);
        self.paths.get(&number)
    }

    /// Discards the active trace without committing
    pub fn cancel_path(&mut self) {
        self.current = None;
    }

    pub fn clear_path(&mut self, number: &str) -> bool {
        self.paths.remove(number).is_some()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.current = None;
    }

    pub fn path_for(&self, number: &str) -> Option<&Path> {
        self.paths.get(number)
    }

    /// The committed path covering `coord`, plus whether `coord` is one of
    /// its endpoints
    pub fn path_at(&self, coord: Coord) -> Option<(&Path, bool)> {
        self.paths.values().find(|path| path.contains(coord)).map(|path| {
            let endpoint = path.start() == coord || path.end() == coord;
            (path, endpoint)
        })
    }

    pub fn current_trace(&self) -> Option<&[Coord]> {
        self.current.as_ref().map(|c| c.trace.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.values()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A cell-to-path-id matrix used to derive line glyphs.
///
/// Id `0` means no path covers the cell. Both the interactive stores and the
/// solver's answer matrices reduce to this shape before rendering.
#[derive(Debug)]
pub struct PathMatrix {
    size: usize,
    ids: Vec<u64>,
}

impl PathMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ids: vec![0; size.pow(2)],
        }
    }

    pub fn set(&mut self, coord: Coord, id: u64) {
        let index = coord.to_index(self.size);
        self.ids[index] = id;
    }

    fn get(&self, row: usize, col: usize) -> u64 {
        self.ids[row * self.size + col]
    }
}

impl PathSet {
    /// Flattens the committed paths onto a matrix for glyph rendering
    pub fn matrix(&self, size: usize) -> PathMatrix {
        let mut matrix = PathMatrix::new(size);
        for path in self.iter() {
            for &coord in &path.trace {
                matrix.set(coord, path.id);
            }
        }
        matrix
    }
}

/// The box-drawing glyph for a path cell, derived from which of its four
/// neighbors carry the same path id.
///
/// Straight runs become `│` or `─`; turns become one of the four corner
/// glyphs. Cells with id `0` get no glyph.
pub fn line_glyph(matrix: &PathMatrix, coord: Coord) -> Option<char> {
    let (row, col, size) = (coord.row(), coord.col(), matrix.size);
    let id = matrix.get(row, col);
    if id == 0 {
        return None;
    }
    let up = row > 0 && matrix.get(row - 1, col) == id;
    let down = row + 1 < size && matrix.get(row + 1, col) == id;
    let left = col > 0 && matrix.get(row, col - 1) == id;
    let right = col + 1 < size && matrix.get(row, col + 1) == id;
    let glyph = match (up, down, left, right) {
        (true, true, _, _) => '│',
        (_, _, true, true) => '─',
        (false, true, false, true) => '┌',
        (false, true, true, false) => '┐',
        (true, false, false, true) => '└',
        (true, false, true, false) => '┘',
        _ => return None,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{line_glyph, PathMatrix, PathSet};
    use crate::grid::{Coord, Grid};

    fn numberlink_grid() -> Grid {
        let mut grid = Grid::empty(4);
        grid.set(Coord::new(0, 0), "1");
        grid.set(Coord::new(2, 2), "1");
        grid.set(Coord::new(3, 0), "2");
        grid.set(Coord::new(3, 3), "2");
        grid
    }

    fn trace(set: &mut PathSet, grid: &Grid, cells: &[(usize, usize)]) -> bool {
        let (first, rest) = cells.split_first().unwrap();
        if !set.start_path(grid, Coord::new(first.0, first.1)) {
            return false;
        }
        let (last, middle) = rest.split_last().unwrap();
        for &(row, col) in middle {
            set.extend_path(Coord::new(row, col));
        }
        set.end_path(grid, Coord::new(last.0, last.1)).is_some()
    }

    #[test]
    fn commit_requires_matching_endpoint() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        // ends on an empty cell
        assert!(!trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2)]));
        // ends on the wrong number
        assert!(!trace(&mut set, &grid, &[(0, 0), (1, 0), (2, 0), (3, 0)]));
        // ends on the matching endpoint
        assert!(trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        assert_eq!(1, set.len());
    }

    #[test]
    fn cannot_start_on_empty_cell() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        assert!(!set.start_path(&grid, Coord::new(1, 1)));
        assert!(set.current_trace().is_none());
    }

    #[test]
    fn non_adjacent_extension_is_skipped() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        set.start_path(&grid, Coord::new(0, 0));
        set.extend_path(Coord::new(2, 2));
        set.extend_path(Coord::new(0, 1));
        assert_eq!(
            &[Coord::new(0, 0), Coord::new(0, 1)],
            set.current_trace().unwrap()
        );
    }

    #[test]
    fn backtracking_keeps_the_trace_alive() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        set.start_path(&grid, Coord::new(0, 0));
        set.extend_path(Coord::new(0, 1));
        set.extend_path(Coord::new(0, 0));
        set.extend_path(Coord::new(1, 0));
        assert_eq!(
            &[
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 0),
                Coord::new(1, 0),
            ],
            set.current_trace().unwrap()
        );
    }

    #[test]
    fn committed_trace_is_contiguous() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        assert!(trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        let path = set.path_for("1").unwrap();
        for (a, b) in path.trace.iter().tuple_windows() {
            assert!(a.is_adjacent(*b));
        }
    }

    #[test]
    fn new_path_evicts_old_for_same_number() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        assert!(trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        let first_id = set.path_for("1").unwrap().id;
        assert!(trace(&mut set, &grid, &[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)]));
        assert_eq!(1, set.len());
        assert_ne!(first_id, set.path_for("1").unwrap().id);
    }

    #[test]
    fn endpoint_flag() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        assert!(trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        assert!(set.path_at(Coord::new(0, 0)).unwrap().1);
        assert!(set.path_at(Coord::new(2, 2)).unwrap().1);
        assert!(!set.path_at(Coord::new(0, 1)).unwrap().1);
        assert!(set.path_at(Coord::new(3, 3)).is_none());
    }

    #[test]
    fn glyphs_follow_neighbor_shape() {
        // one L-shaped path: (0,0) down to (2,0) then right to (2,2)
        let mut matrix = PathMatrix::new(3);
        for &(row, col) in &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)] {
            matrix.set(Coord::new(row, col), 7);
        }
        assert_eq!(Some('│'), line_glyph(&matrix, Coord::new(1, 0)));
        assert_eq!(Some('└'), line_glyph(&matrix, Coord::new(2, 0)));
        assert_eq!(Some('─'), line_glyph(&matrix, Coord::new(2, 1)));
        assert_eq!(None, line_glyph(&matrix, Coord::new(1, 1)));
    }

    #[test]
    fn committed_paths_render_as_glyphs() {
        let grid = numberlink_grid();
        let mut set = PathSet::new();
        assert!(trace(&mut set, &grid, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]));
        let matrix = set.matrix(grid.size());
        assert_eq!(Some('─'), line_glyph(&matrix, Coord::new(0, 1)));
        assert_eq!(Some('┐'), line_glyph(&matrix, Coord::new(0, 2)));
        assert_eq!(None, line_glyph(&matrix, Coord::new(1, 1)));
    }

    #[test]
    fn corner_glyphs() {
        // (0,0)-(0,1)-(1,1)-(1,0): a closed square exercises every corner
        let mut matrix = PathMatrix::new(2);
        for &(row, col) in &[(0, 0), (0, 1), (1, 0), (1, 1)] {
            matrix.set(Coord::new(row, col), 1);
        }
        assert_eq!(Some('┌'), line_glyph(&matrix, Coord::new(0, 0)));
        assert_eq!(Some('┐'), line_glyph(&matrix, Coord::new(0, 1)));
        assert_eq!(Some('└'), line_glyph(&matrix, Coord::new(1, 0)));
        assert_eq!(Some('┘'), line_glyph(&matrix, Coord::new(1, 1)));
    }
}
