//! District-cooling network dispatch optimizer.
//!
//! Builds a time-coupled linear program over plant output, thermal storage,
//! secondary pumping, and building-side demand flexibility, and solves it
//! for a least-cost dispatch schedule.

pub mod config;
pub mod demand;
pub mod grid;
pub mod io;
/// Problem formulation, solve, and solution types.
pub mod opt;
pub mod plant;
