//! Research runner errors.

use thiserror::Error;

use crate::graph::{RunError, ValidationError};

/// Failure of one research request.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// The question was empty or whitespace only.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The graph run failed; no partial answer is returned.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Failure wiring the research pipeline from settings.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required credential is not configured.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// The HTTP client could not be built.
    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The research graph did not validate.
    #[error("invalid research graph: {0}")]
    Graph(#[from] ValidationError),
}
