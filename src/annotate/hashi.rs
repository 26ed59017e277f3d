//! Hashiwokakero bridge store and node-selection validator

use std::iter::FromIterator;

use ahash::AHashMap;
use log::debug;

use crate::grid::{Coord, Grid, Orientation};

/// Canonical address of a bridge, independent of click order.
///
/// `a` carries the smaller row and column, `b` the larger. Since bridges are
/// axis-aligned these are the actual endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BridgeKey {
    a: Coord,
    b: Coord,
}

impl BridgeKey {
    pub fn new(from: Coord, to: Coord) -> Self {
        Self {
            a: Coord::new(from.row().min(to.row()), from.col().min(to.col())),
            b: Coord::new(from.row().max(to.row()), from.col().max(to.col())),
        }
    }

    pub fn endpoints(self) -> (Coord, Coord) {
        (self.a, self.b)
    }

    pub fn orientation(self) -> Orientation {
        if self.a.row() == self.b.row() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// A bridge between two nodes sharing a row or column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridge {
    pub from: Coord,
    pub to: Coord,
    pub count: u8,
}

impl Bridge {
    pub fn key(&self) -> BridgeKey {
        BridgeKey::new(self.from, self.to)
    }

    fn orientation(&self) -> Orientation {
        self.key().orientation()
    }

    /// True if `coord` lies strictly between the endpoints on the bridge axis
    fn passes_through(&self, coord: Coord) -> bool {
        let (a, b) = self.key().endpoints();
        match self.orientation() {
            Orientation::Horizontal => {
                coord.row() == a.row() && coord.col() > a.col() && coord.col() < b.col()
            }
            Orientation::Vertical => {
                coord.col() == a.col() && coord.row() > a.row() && coord.row() < b.row()
            }
        }
    }
}

/// Outcome of a click in bridge-drawing mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connect {
    /// A node became the current selection
    Selected,
    /// The current selection was cleared
    Deselected,
    /// A new bridge with count 1 was created
    Created(BridgeKey),
    /// An existing bridge was upgraded from count 1 to 2
    Upgraded(BridgeKey),
    /// Nothing changed
    Noop,
}

/// The bridge annotation store for Hashiwokakero.
///
/// Connections are made through a two-click state machine over a single
/// selected-node slot; see [`BridgeSet::select_or_connect`].
#[derive(Debug, Default)]
pub struct BridgeSet {
    bridges: AHashMap<BridgeKey, Bridge>,
    selected: Option<Coord>,
}

impl BridgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    /// Handles a click at `coord`.
    ///
    /// Clicking a node selects it; clicking the selected node deselects.
    /// Clicking a second node connects the pair if the two nodes share a row
    /// or column, the straight line between them contains no other node, and
    /// (for a new bridge) no bridge of the opposite orientation crosses the
    /// segment. An invalid pair moves the selection to the clicked node
    /// instead of connecting. Reconnecting an existing pair upgrades its
    /// count from 1 to 2; a count of 2 is terminal.
    pub fn select_or_connect(&mut self, grid: &Grid, coord: Coord) -> Connect {
        if self.bridge_through(coord).is_some() {
            // clicks on a bridge interior are reserved for deletion
            return Connect::Noop;
        }
        if grid.is_empty_cell(coord) {
            return match self.selected.take() {
                Some(_) => Connect::Deselected,
                None => Connect::Noop,
            };
        }
        let from = match self.selected {
            None => {
                self.selected = Some(coord);
                return Connect::Selected;
            }
            Some(selected) if selected == coord => {
                self.selected = None;
                return Connect::Deselected;
            }
            Some(selected) => selected,
        };

        if from.shared_line(coord).is_none() || !self.has_clear_path(grid, from, coord) {
            self.selected = Some(coord);
            return Connect::Selected;
        }

        let key = BridgeKey::new(from, coord);
        if let Some(bridge) = self.bridges.get_mut(&key) {
            self.selected = None;
            return if bridge.count == 1 {
                bridge.count = 2;
                Connect::Upgraded(key)
            } else {
                Connect::Noop
            };
        }
        if self.would_intersect(from, coord) {
            self.selected = Some(coord);
            return Connect::Selected;
        }
        debug!("bridge created {:?}", key);
        self.bridges.insert(
            key,
            Bridge {
                from,
                to: coord,
                count: 1,
            },
        );
        self.selected = None;
        Connect::Created(key)
    }

    /// True if no node sits on an intermediate cell of the straight segment
    fn has_clear_path(&self, grid: &Grid, from: Coord, to: Coord) -> bool {
        let (a, b) = BridgeKey::new(from, to).endpoints();
        match from.shared_line(to) {
            Some(Orientation::Horizontal) => {
                (a.col() + 1..b.col()).all(|col| grid.is_empty_cell(Coord::new(a.row(), col)))
            }
            Some(Orientation::Vertical) => {
                (a.row() + 1..b.row()).all(|row| grid.is_empty_cell(Coord::new(row, a.col())))
            }
            None => false,
        }
    }

    /// True if a bridge of the opposite orientation crosses the candidate
    /// segment at an interior point. Parallel bridges never cross.
    fn would_intersect(&self, from: Coord, to: Coord) -> bool {
        let candidate = BridgeKey::new(from, to);
        let (ca, cb) = candidate.endpoints();
        self.bridges.keys().any(|existing| {
            if existing.orientation() == candidate.orientation() {
                return false;
            }
            let (ea, eb) = existing.endpoints();
            let (h, ha, hb, v, va, vb) = match candidate.orientation() {
                Orientation::Horizontal => (ca.row(), ca.col(), cb.col(), ea.col(), ea.row(), eb.row()),
                Orientation::Vertical => (ea.row(), ea.col(), eb.col(), ca.col(), ca.row(), cb.row()),
            };
            v > ha && v < hb && h > va && h < vb
        })
    }

    pub fn delete(&mut self, key: BridgeKey) -> bool {
        self.bridges.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.bridges.clear();
        self.selected = None;
    }

    pub fn get(&self, key: BridgeKey) -> Option<&Bridge> {
        self.bridges.get(&key)
    }

    /// The bridge whose interior covers `coord`, for rendering and deletion
    pub fn bridge_through(&self, coord: Coord) -> Option<(BridgeKey, &Bridge)> {
        self.bridges
            .iter()
            .find(|(_, bridge)| bridge.passes_through(coord))
            .map(|(&key, bridge)| (key, bridge))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BridgeKey, &Bridge)> {
        self.bridges.iter()
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}

impl FromIterator<Bridge> for BridgeSet {
    fn from_iter<I: IntoIterator<Item = Bridge>>(iter: I) -> Self {
        Self {
            bridges: iter.into_iter().map(|b| (b.key(), b)).collect(),
            selected: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BridgeKey, BridgeSet, Connect};
    use crate::grid::{Coord, Grid};

    fn grid_with_nodes(size: usize, nodes: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::empty(size);
        for &(row, col) in nodes {
            grid.set(Coord::new(row, col), "2");
        }
        grid
    }

    #[test]
    fn connect_upgrade_then_terminal() {
        let grid = grid_with_nodes(5, &[(0, 0), (0, 3)]);
        let mut set = BridgeSet::new();
        let key = BridgeKey::new(Coord::new(0, 0), Coord::new(0, 3));

        assert_eq!(Connect::Selected, set.select_or_connect(&grid, Coord::new(0, 0)));
        assert_eq!(Connect::Created(key), set.select_or_connect(&grid, Coord::new(0, 3)));
        assert_eq!(1, set.get(key).unwrap().count);

        set.select_or_connect(&grid, Coord::new(0, 0));
        assert_eq!(Connect::Upgraded(key), set.select_or_connect(&grid, Coord::new(0, 3)));
        assert_eq!(2, set.get(key).unwrap().count);

        set.select_or_connect(&grid, Coord::new(0, 0));
        assert_eq!(Connect::Noop, set.select_or_connect(&grid, Coord::new(0, 3)));
        assert_eq!(2, set.get(key).unwrap().count);
        assert_eq!(1, set.len());
    }

    #[test]
    fn same_node_deselects() {
        let grid = grid_with_nodes(5, &[(2, 2)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(2, 2));
        assert_eq!(Connect::Deselected, set.select_or_connect(&grid, Coord::new(2, 2)));
        assert_eq!(None, set.selected());
    }

    #[test]
    fn empty_cell_clears_selection() {
        let grid = grid_with_nodes(5, &[(0, 0)]);
        let mut set = BridgeSet::new();
        assert_eq!(Connect::Noop, set.select_or_connect(&grid, Coord::new(3, 3)));
        set.select_or_connect(&grid, Coord::new(0, 0));
        assert_eq!(Connect::Deselected, set.select_or_connect(&grid, Coord::new(3, 3)));
    }

    #[test]
    fn diagonal_pair_moves_selection() {
        let grid = grid_with_nodes(5, &[(0, 0), (1, 1)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(0, 0));
        assert_eq!(Connect::Selected, set.select_or_connect(&grid, Coord::new(1, 1)));
        assert_eq!(Some(Coord::new(1, 1)), set.selected());
        assert!(set.is_empty());
    }

    #[test]
    fn blocked_path_moves_selection() {
        let grid = grid_with_nodes(5, &[(0, 0), (0, 2), (0, 4)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(0, 0));
        // (0, 2) sits between the endpoints
        assert_eq!(Connect::Selected, set.select_or_connect(&grid, Coord::new(0, 4)));
        assert!(set.is_empty());
    }

    #[test]
    fn crossing_bridge_is_rejected() {
        let grid = grid_with_nodes(5, &[(0, 2), (4, 2), (2, 0), (2, 4)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(0, 2));
        assert!(matches!(
            set.select_or_connect(&grid, Coord::new(4, 2)),
            Connect::Created(_)
        ));
        set.select_or_connect(&grid, Coord::new(2, 0));
        // the horizontal candidate would cross the vertical bridge at (2, 2)
        assert_eq!(Connect::Selected, set.select_or_connect(&grid, Coord::new(2, 4)));
        assert_eq!(1, set.len());
    }

    #[test]
    fn key_is_click_order_independent() {
        let key1 = BridgeKey::new(Coord::new(3, 1), Coord::new(0, 1));
        let key2 = BridgeKey::new(Coord::new(0, 1), Coord::new(3, 1));
        assert_eq!(key1, key2);
    }

    #[test]
    fn bridge_interior_lookup() {
        let grid = grid_with_nodes(5, &[(1, 0), (1, 3)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(1, 0));
        set.select_or_connect(&grid, Coord::new(1, 3));
        assert!(set.bridge_through(Coord::new(1, 1)).is_some());
        assert!(set.bridge_through(Coord::new(1, 0)).is_none());
        assert!(set.bridge_through(Coord::new(1, 3)).is_none());
        assert!(set.bridge_through(Coord::new(2, 1)).is_none());
    }

    #[test]
    fn click_on_interior_is_noop() {
        let grid = grid_with_nodes(5, &[(1, 0), (1, 3), (0, 1)]);
        let mut set = BridgeSet::new();
        set.select_or_connect(&grid, Coord::new(1, 0));
        set.select_or_connect(&grid, Coord::new(1, 3));
        assert_eq!(Connect::Noop, set.select_or_connect(&grid, Coord::new(1, 2)));
    }
}
