//! Annotate and solve paper logic puzzles: sudoku, futoshiki, numberlink,
//! nurikabe, shikaku and hashiwokakero.
//!
//! Every puzzle shares a square grid of digit text as its substrate. On top
//! of it each type layers its own annotation store ([`annotate`]) whose
//! interaction rules keep the overlay geometrically valid. Solving is
//! delegated to an external HTTP service ([`client`]) and decoded back into
//! the same structures ([`codec`]). A [`session::Session`] ties one puzzle,
//! its annotations and its solution together.

#![warn(rust_2018_idioms)]

pub mod annotate;
pub mod client;
pub mod codec;
pub mod error;
pub mod grid;
pub mod puzzle;
pub mod session;
