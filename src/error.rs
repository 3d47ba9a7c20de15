use thiserror::Error;

/// Failures surfaced while serving a user's request.
///
/// None of these ever escape a handler: each variant maps to a user-facing
/// message and a decision about the user's in-progress flow.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Unparseable token or an intent that does not fit the current flow.
    #[error("invalid input: {0}")]
    UserInput(String),
    /// A user or reference record is missing.
    #[error("{0} not found")]
    NotFound(String),
    /// The data-access collaborator failed; retrying the same step may succeed.
    #[error("database error: {0}")]
    Dependency(#[from] sqlx::Error),
}

impl FlowError {
    /// Whether the user may retry the same step without restarting the flow.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::Dependency(_))
    }
}
