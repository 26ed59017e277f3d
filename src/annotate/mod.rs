//! Per-puzzle-type annotation stores and their interaction validators.
//!
//! Each store owns the structured overlay for one puzzle type (rectangles,
//! bridges, paths, marks, inequality constraints) and enforces its geometric
//! invariants while the user edits. Stores read the grid substrate but never
//! mutate it. Rejected mutations are ordinary return values, not errors.

pub mod futoshiki;
pub mod hashi;
pub mod numberlink;
pub mod nurikabe;
pub mod shikaku;
