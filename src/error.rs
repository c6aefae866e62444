//! Error taxonomy for request validation and solving.
//!
//! Every failure the solver can report is a [`SolveError`]. Input problems
//! are detected in a single validation pass before any search state is
//! allocated, so a request either fails fast with a client error or runs to
//! completion.

/// Errors produced while validating a request or running the solver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    /// Structural problem with the request: mismatched lengths, facility
    /// indices outside `[0, N)`, or duplicate facility indices.
    #[error("input shape error: {0}")]
    InputShape(String),

    /// A value is outside its legal range: negative or non-finite demand,
    /// non-finite coordinate, negative radius, or a non-positive budget.
    #[error("input range error: {0}")]
    InputRange(String),

    /// The request is valid but has nothing to optimize.
    ///
    /// Never returned as `Err` by the solver; attached to the report as a
    /// notice while an empty solution is returned.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Solver or GA configuration parameter out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure during the search that is not caused by the input shape.
    #[error("solver internal error: {0}")]
    SolverInternal(String),
}

/// Coarse classification of a [`SolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something the solver cannot accept.
    Client,
    /// The solver failed on valid input.
    Server,
}

impl SolveError {
    /// Classifies the error as a client or server failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::InputShape(_)
            | SolveError::InputRange(_)
            | SolveError::DegenerateInput(_)
            | SolveError::InvalidConfig(_) => ErrorKind::Client,
            SolveError::SolverInternal(_) => ErrorKind::Server,
        }
    }

    /// HTTP status a serving layer should answer with.
    ///
    /// Shape errors map to 400, range and configuration errors to 422,
    /// internal failures to 500. Degenerate input is not an error response.
    pub fn http_status(&self) -> u16 {
        match self {
            SolveError::InputShape(_) => 400,
            SolveError::InputRange(_) | SolveError::InvalidConfig(_) => 422,
            SolveError::DegenerateInput(_) => 200,
            SolveError::SolverInternal(_) => 500,
        }
    }
}
