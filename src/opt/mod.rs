//! Time-coupled linear dispatch optimization.

pub mod error;
/// Problem assembly and solve.
pub mod optimizer;
pub mod solution;
pub mod types;

// Re-export the main types for convenience
pub use error::{ExportError, OptimizeError};
pub use optimizer::DispatchOptimizer;
pub use solution::{DispatchRow, DispatchSummary, SolvedDispatch};
pub use types::{HeadSeries, PumpingMode, SolveStatus, TesCapacity};
