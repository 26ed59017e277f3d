use std::io;

use thiserror::Error;

/// Failure of a solve or generate round-trip.
///
/// Interactive validation rejections are not errors and never appear here;
/// they are ordinary return values on the annotation stores. The variants
/// distinguish transport problems from domain outcomes so a front end can say
/// "this puzzle has no solution" rather than "network error".
#[derive(Error, Debug)]
pub enum SolveError {
    /// The request was rejected before it was sent
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),
    /// The solver service could not be reached or answered non-2xx
    #[error("solver unreachable")]
    Transport(#[from] reqwest::Error),
    /// The service answered but reported no solution
    #[error("the puzzle has no solution")]
    NoSolution,
    /// The service answered with a payload that does not fit the puzzle
    #[error("malformed solver response: {0}")]
    MalformedResponse(String),
}

impl SolveError {
    /// True for domain outcomes, false for transport and request failures
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            SolveError::NoSolution | SolveError::MalformedResponse(_)
        )
    }
}

/// Failure to load or save a puzzle file
#[derive(Error, Debug)]
pub enum PuzzleFileError {
    #[error("error reading puzzle file")]
    Io(#[from] io::Error),
    #[error("error parsing puzzle file")]
    Json(#[from] serde_json::Error),
    /// Parsed fine but is not a puzzle (missing type or grid)
    #[error("invalid puzzle format")]
    InvalidFormat,
}
