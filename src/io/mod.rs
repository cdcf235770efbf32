//! CSV input and output: head-difference tables and solved schedules.

pub mod export;
/// Head-difference table reader.
pub mod head;
