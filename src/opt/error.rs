//! Error taxonomies for problem assembly, solve, and solution export.

use thiserror::Error;

use crate::opt::types::SolveStatus;

/// Failure modes of building and solving the dispatch problem.
///
/// None of these are retried internally; relaxing bounds and trying again
/// is a caller decision. A failed solve never yields a partial schedule.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// Malformed or misaligned external data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The constraint set admits no dispatch.
    #[error("no dispatch satisfies the constraint set")]
    Infeasible,

    /// The objective has no finite optimum.
    #[error("objective has no finite optimum")]
    Unbounded,

    /// Any other solver backend failure.
    #[error("solver failure: {0}")]
    Solver(String),
}

/// Failure modes of solution extraction and persistence.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Extraction attempted on a model without an optimal solution.
    #[error("cannot extract a solution from a model with status {0}")]
    NotSolved(SolveStatus),

    /// CSV serialization failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Sink I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let e = OptimizeError::InvalidInput("head table has 3 rows".to_string());
        assert!(e.to_string().contains("head table has 3 rows"));
        assert!(OptimizeError::Infeasible.to_string().contains("no dispatch"));
        let e = ExportError::NotSolved(SolveStatus::Infeasible);
        assert!(e.to_string().contains("infeasible"));
    }
}
