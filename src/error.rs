use thiserror::Error;

/// Errors produced by graph construction, generation, and contraction.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The operation was called with arguments that violate its preconditions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A random edge was requested but the live edge set is empty.
    #[error("cannot select an edge from an empty edge set")]
    EmptyEdgeSet,

    /// Bounded generation gave up before reaching the target edge density.
    #[error("graph generation did not reach target density after {attempts} attempts")]
    DensityNotReached { attempts: usize },
}

impl GraphError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GraphError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
