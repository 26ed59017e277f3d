//! HTTP client for the puzzle solver service

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use crate::codec::{GenerateRequest, SolveRequest};
use crate::error::SolveError;

/// Where the solver service listens by default
pub const DEFAULT_SERVER: &str = "http://localhost:5000";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static SHARED: Lazy<SolverClient> = Lazy::new(|| SolverClient::new(DEFAULT_SERVER));

/// A client for one solver service instance.
///
/// Solving is a blocking round-trip; the timeout bounds how long a hard
/// puzzle may hold the caller.
#[derive(Debug)]
pub struct SolverClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct SolutionEnvelope {
    solution: Option<Value>,
}

#[derive(Deserialize)]
struct PuzzleEnvelope {
    puzzle: Option<Value>,
}

impl SolverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// The process-wide client for the default server
    pub fn shared() -> &'static SolverClient {
        &SHARED
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts a solve request and returns the raw `solution` payload.
    ///
    /// A well-formed answer with a missing or null solution means the
    /// puzzle has none.
    pub fn solve(&self, request: &SolveRequest) -> Result<Value, SolveError> {
        request.validate()?;
        debug!("solving {} against {}", request.kind, self.base_url);
        let envelope: SolutionEnvelope = self.post("/api/solve", request)?;
        envelope.solution.filter(|s| !s.is_null()).ok_or(SolveError::NoSolution)
    }

    /// Posts a generate request and returns the raw `puzzle` payload
    pub fn generate(&self, request: &GenerateRequest) -> Result<Value, SolveError> {
        debug!("generating {} from {}", request.kind, self.base_url);
        let envelope: PuzzleEnvelope = self.post("/api/generate", request)?;
        envelope.puzzle.filter(|p| !p.is_null()).ok_or_else(|| {
            SolveError::MalformedResponse("response carries no puzzle".into())
        })
    }

    fn post<B, R>(&self, path: &str, body: &B) -> Result<R, SolveError>
    where
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(&format!("{}{}", self.base_url, path))
            .timeout(self.timeout)
            .json(body)
            .send()?
            .error_for_status()?;
        response
            .json()
            .map_err(|e| SolveError::MalformedResponse(e.to_string()))
    }
}
