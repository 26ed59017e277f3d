//! Shikaku rectangle store and drag validator

use log::debug;

use crate::grid::Coord;

pub type RectId = u64;

/// An axis-aligned rectangle over inclusive cell bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub id: RectId,
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl Rect {
    pub fn new(id: RectId, top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            id,
            start_row: top.min(bottom),
            end_row: top.max(bottom),
            start_col: left.min(right),
            end_col: left.max(right),
        }
    }

    /// The bounding box of two cells, well-defined regardless of drag direction
    fn bounding(id: RectId, a: Coord, b: Coord) -> Self {
        Self::new(id, a.row(), a.col(), b.row(), b.col())
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row() >= self.start_row
            && coord.row() <= self.end_row
            && coord.col() >= self.start_col
            && coord.col() <= self.end_col
    }

    /// Closed-interval intersection on both axes simultaneously
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.end_row < other.start_row
            || self.start_row > other.end_row
            || self.end_col < other.start_col
            || self.start_col > other.end_col)
    }

    pub fn width(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    pub fn height(&self) -> usize {
        self.end_row - self.start_row + 1
    }
}

/// The rectangle annotation store for Shikaku.
///
/// Rectangles are committed through a drag gesture: `begin_drag` anchors,
/// `extend_drag` recomputes the pending bounding box, `commit_drag` accepts
/// the rectangle only if it overlaps no committed rectangle.
#[derive(Debug, Default)]
pub struct RectSet {
    rects: Vec<Rect>,
    next_id: RectId,
    drag: Option<Drag>,
}

#[derive(Debug)]
struct Drag {
    anchor: Coord,
    current: Coord,
}

impl RectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_drag(&mut self, coord: Coord) {
        self.drag = Some(Drag {
            anchor: coord,
            current: coord,
        });
    }

    /// Moves the drag to `coord`; a no-op when no drag is active
    pub fn extend_drag(&mut self, coord: Coord) {
        if let Some(drag) = &mut self.drag {
            drag.current = coord;
        }
    }

    /// The bounding box the active drag would commit
    pub fn pending(&self) -> Option<Rect> {
        self.drag
            .as_ref()
            .map(|drag| Rect::bounding(self.next_id + 1, drag.anchor, drag.current))
    }

    /// Commits the pending rectangle, or rejects it if it overlaps an
    /// existing one. The drag is discarded either way.
    pub fn commit_drag(&mut self) -> Option<Rect> {
        let pending = self.pending()?;
        self.drag = None;
        if self.rects.iter().any(|rect| rect.overlaps(&pending)) {
            debug!("rectangle {:?} rejected: overlap", pending);
            return None;
        }
        self.next_id += 1;
        self.rects.push(pending);
        Some(pending)
    }

    pub fn remove(&mut self, id: RectId) -> bool {
        let before = self.rects.len();
        self.rects.retain(|rect| rect.id != id);
        self.rects.len() < before
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.drag = None;
    }

    /// The committed rectangle covering `coord`, if any
    pub fn rect_at(&self, coord: Coord) -> Option<&Rect> {
        self.rects.iter().find(|rect| rect.contains(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::RectSet;
    use crate::grid::Coord;

    fn drag(set: &mut RectSet, from: (usize, usize), to: (usize, usize)) -> bool {
        set.begin_drag(Coord::new(from.0, from.1));
        set.extend_drag(Coord::new(to.0, to.1));
        set.commit_drag().is_some()
    }

    #[test]
    fn bounding_box_ignores_drag_direction() {
        let mut set = RectSet::new();
        assert!(drag(&mut set, (3, 3), (1, 0)));
        let rect = set.iter().next().unwrap();
        assert_eq!((1, 3, 0, 3), (rect.start_row, rect.end_row, rect.start_col, rect.end_col));
    }

    #[test]
    fn overlapping_commit_is_rejected() {
        // two committed rectangles on a 5x5 grid, then a third spanning both
        let mut set = RectSet::new();
        assert!(drag(&mut set, (0, 0), (1, 1)));
        assert!(drag(&mut set, (0, 2), (1, 3)));
        assert!(!drag(&mut set, (1, 1), (2, 2)));
        assert_eq!(2, set.len());
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let mut set = RectSet::new();
        assert!(drag(&mut set, (0, 0), (1, 1)));
        assert!(drag(&mut set, (0, 2), (1, 3)));
        assert!(drag(&mut set, (2, 0), (3, 3)));
        assert_eq!(3, set.len());
    }

    #[test]
    fn no_pair_overlaps() {
        let mut set = RectSet::new();
        drag(&mut set, (0, 0), (2, 1));
        drag(&mut set, (0, 2), (0, 4));
        drag(&mut set, (1, 2), (2, 4));
        drag(&mut set, (1, 1), (3, 3));
        for pair in set.iter().combinations(2) {
            assert!(!pair[0].overlaps(pair[1]));
        }
    }

    #[test]
    fn remove_by_id() {
        let mut set = RectSet::new();
        drag(&mut set, (0, 0), (1, 1));
        let id = set.iter().next().unwrap().id;
        assert!(set.remove(id));
        assert!(!set.remove(id));
        assert!(set.is_empty());
    }

    #[test]
    fn ids_are_distinct() {
        let mut set = RectSet::new();
        drag(&mut set, (0, 0), (0, 0));
        drag(&mut set, (2, 2), (2, 2));
        let ids = set.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_ne!(ids[0], ids[1]);
    }
}
