//! Per-solve input types: storage sizing, pumping topology, head tables,
//! and solver status.

use std::fmt;

use crate::opt::error::OptimizeError;

/// Near-zero band (kWh) below which a requested capacity means "no storage".
pub const CAPACITY_EPSILON_KWH: f64 = 1e-6;

/// Thermal-energy-storage sizing for one solve.
///
/// Replaces the legacy driver convention (a negative watt-hour value whose
/// magnitude is the capacity, with a tiny negative epsilon standing in for
/// zero) with an explicit tagged value. The legacy mapping survives only at
/// the boundary, in [`TesCapacity::from_signed_wh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TesCapacity {
    /// No storage: charge and discharge are fixed at zero.
    Disabled,
    /// Storage with the given capacity in kilowatt-hours (> 0).
    Capacity(f64),
}

impl TesCapacity {
    /// Creates a capacity from kilowatt-hours.
    ///
    /// Values within [`CAPACITY_EPSILON_KWH`] of zero disable storage.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative capacity.
    pub fn capacity(kwh: f64) -> Result<Self, OptimizeError> {
        if !kwh.is_finite() {
            return Err(OptimizeError::InvalidInput(format!(
                "storage capacity must be finite, got {kwh} kWh"
            )));
        }
        if kwh < -CAPACITY_EPSILON_KWH {
            return Err(OptimizeError::InvalidInput(format!(
                "storage capacity must be >= 0, got {kwh} kWh"
            )));
        }
        if kwh.abs() <= CAPACITY_EPSILON_KWH {
            return Ok(Self::Disabled);
        }
        Ok(Self::Capacity(kwh))
    }

    /// Maps the legacy signed watt-hour convention: a negative value
    /// enables storage with the magnitude as capacity; magnitudes within
    /// epsilon of zero disable it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for positive values, which the convention
    /// never produced.
    pub fn from_signed_wh(wh: f64) -> Result<Self, OptimizeError> {
        let epsilon_wh = CAPACITY_EPSILON_KWH * 1000.0;
        if !wh.is_finite() {
            return Err(OptimizeError::InvalidInput(format!(
                "signed storage capacity must be finite, got {wh} Wh"
            )));
        }
        if wh.abs() <= epsilon_wh {
            return Ok(Self::Disabled);
        }
        if wh < 0.0 {
            return Ok(Self::Capacity(-wh / 1000.0));
        }
        Err(OptimizeError::InvalidInput(format!(
            "positive value {wh} Wh is outside the signed capacity convention"
        )))
    }

    /// Usable capacity in kilowatt-hours; zero when disabled.
    pub fn kwh(&self) -> f64 {
        match self {
            Self::Disabled => 0.0,
            Self::Capacity(kwh) => *kwh,
        }
    }

    /// Whether storage participates in the dispatch.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Capacity(_))
    }
}

/// Secondary-loop pumping topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpingMode {
    /// One central secondary pump sized on the critical branch (CSP).
    Centralized,
    /// Per-building secondary pumps, each on its own branch head (DSP).
    Distributed,
}

impl PumpingMode {
    /// Short label used in filenames and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Centralized => "CSP",
            Self::Distributed => "DSP",
        }
    }
}

impl fmt::Display for PumpingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The solver proved optimality.
    Optimal,
    /// The constraint set admits no solution.
    Infeasible,
    /// The objective has no finite optimum.
    Unbounded,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
        };
        f.write_str(s)
    }
}

/// Head-difference time series: one row per time step, one column per
/// branch (building connection), values in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadSeries {
    branch_ids: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl HeadSeries {
    /// Creates a series from branch identifiers and per-step rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a row length does not match the branch
    /// count or a value is negative or non-finite.
    pub fn new(branch_ids: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, OptimizeError> {
        for (t, row) in rows.iter().enumerate() {
            if row.len() != branch_ids.len() {
                return Err(OptimizeError::InvalidInput(format!(
                    "head row {t} has {} values for {} branches",
                    row.len(),
                    branch_ids.len()
                )));
            }
            if let Some(head) = row.iter().find(|h| !h.is_finite() || **h < 0.0) {
                return Err(OptimizeError::InvalidInput(format!(
                    "head row {t} contains invalid value {head}"
                )));
            }
        }
        Ok(Self { branch_ids, rows })
    }

    /// Creates a series with the same head on every branch at every step.
    pub fn constant(head_m: f64, steps: usize, branch_ids: &[&str]) -> Self {
        let ids = branch_ids.iter().map(|s| (*s).to_string()).collect();
        let rows = vec![vec![head_m; branch_ids.len()]; steps];
        Self {
            branch_ids: ids,
            rows,
        }
    }

    /// Number of time steps (rows).
    pub fn steps(&self) -> usize {
        self.rows.len()
    }

    /// Branch identifiers in column order.
    pub fn branch_ids(&self) -> &[String] {
        &self.branch_ids
    }

    /// Column index of a branch identifier.
    pub fn branch_index(&self, id: &str) -> Option<usize> {
        self.branch_ids.iter().position(|b| b == id)
    }

    /// Head difference at a time step and branch column.
    pub fn head_m(&self, timestep: usize, branch: usize) -> f64 {
        self.rows[timestep][branch]
    }

    /// One per-branch row.
    pub fn row(&self, timestep: usize) -> &[f64] {
        &self.rows[timestep]
    }

    /// Largest head difference anywhere in the table.
    pub fn max_head_m(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max)
    }
}
