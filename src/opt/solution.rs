//! Solved dispatch schedules and post-hoc summaries.

use std::fmt;

use crate::opt::error::ExportError;
use crate::opt::types::{PumpingMode, SolveStatus};

/// Complete dispatch record for one time step.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRow {
    /// Time-step index.
    pub timestep: usize,
    /// Horizon time in hours.
    pub time_hr: f64,
    /// Plant thermal output (kW).
    pub plant_kw: f64,
    /// Storage charging rate (kW).
    pub charge_kw: f64,
    /// Storage discharging rate (kW).
    pub discharge_kw: f64,
    /// Storage state of charge at the end of the step (kWh).
    pub soc_kwh: f64,
    /// Secondary pumping electric power for the active mode (kW).
    pub pumping_kw: f64,
    /// Delivered cooling per building (kW), ordered as the building ids.
    pub delivered_kw: Vec<f64>,
}

impl DispatchRow {
    /// Total cooling delivered across all buildings (kW).
    pub fn total_delivered_kw(&self) -> f64 {
        self.delivered_kw.iter().sum()
    }
}

impl fmt::Display for DispatchRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({:>5.1}h) | plant={:>8.1} kW  charge={:>7.1} kW  \
             discharge={:>7.1} kW  soc={:>9.1} kWh | pump={:>6.1} kW | \
             delivered={:>8.1} kW",
            self.timestep,
            self.time_hr,
            self.plant_kw,
            self.charge_kw,
            self.discharge_kw,
            self.soc_kwh,
            self.pumping_kw,
            self.total_delivered_kw(),
        )
    }
}

/// A solved dispatch schedule: the decision-variable values at the optimum
/// plus the solve metadata. Read-only once built.
#[derive(Debug, Clone)]
pub struct SolvedDispatch {
    /// Solver outcome. Extraction requires `Optimal`.
    pub status: SolveStatus,
    /// Total operating cost at the optimum (currency units).
    pub objective_cost: f64,
    /// Pumping topology the schedule was solved for.
    pub pumping_mode: PumpingMode,
    /// Usable storage capacity (kWh); zero when storage was disabled.
    pub tes_capacity_kwh: f64,
    /// Building identifiers, in `delivered_kw` column order.
    pub building_ids: Vec<String>,
    /// One record per time step.
    pub rows: Vec<DispatchRow>,
}

impl SolvedDispatch {
    /// Column names of the tabular form: fixed dispatch columns followed by
    /// one `delivered_<id>_kw` column per building.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            "timestep".to_string(),
            "time_hr".to_string(),
            "plant_kw".to_string(),
            "charge_kw".to_string(),
            "discharge_kw".to_string(),
            "soc_kwh".to_string(),
            "pumping_kw".to_string(),
        ];
        for id in &self.building_ids {
            header.push(format!("delivered_{id}_kw"));
        }
        header
    }

    /// The time-indexed numeric table, one row per step in header order.
    ///
    /// # Errors
    ///
    /// Returns `NotSolved` when the status is not `Optimal`.
    pub fn table(&self) -> Result<Vec<Vec<f64>>, ExportError> {
        if self.status != SolveStatus::Optimal {
            return Err(ExportError::NotSolved(self.status));
        }
        let table = self
            .rows
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.timestep as f64,
                    r.time_hr,
                    r.plant_kw,
                    r.charge_kw,
                    r.discharge_kw,
                    r.soc_kwh,
                    r.pumping_kw,
                ];
                row.extend_from_slice(&r.delivered_kw);
                row
            })
            .collect();
        Ok(table)
    }

    /// Aggregate summary of the schedule.
    pub fn summary(&self, dt_hours: f64) -> DispatchSummary {
        DispatchSummary::from_dispatch(self, dt_hours)
    }
}

/// Aggregate indicators derived from a complete solved schedule.
///
/// Computed post-hoc from the row vector to keep step data and reported
/// aggregates consistent.
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    /// Total operating cost (currency units).
    pub total_cost: f64,
    /// Peak plant thermal output (kW).
    pub peak_plant_kw: f64,
    /// Peak secondary pumping power (kW).
    pub peak_pumping_kw: f64,
    /// Total delivered cooling energy (kWh).
    pub total_delivered_kwh: f64,
    /// Storage energy throughput (kWh, sum of charge + discharge over time).
    pub storage_throughput_kwh: f64,
    /// Storage equivalent full cycles (throughput / 2·capacity).
    pub equivalent_full_cycles: f64,
}

impl DispatchSummary {
    /// Computes the summary from a solved schedule.
    pub fn from_dispatch(solved: &SolvedDispatch, dt_hours: f64) -> Self {
        let mut peak_plant_kw = 0.0_f64;
        let mut peak_pumping_kw = 0.0_f64;
        let mut total_delivered_kwh = 0.0;
        let mut storage_throughput_kwh = 0.0;
        for r in &solved.rows {
            peak_plant_kw = peak_plant_kw.max(r.plant_kw);
            peak_pumping_kw = peak_pumping_kw.max(r.pumping_kw);
            total_delivered_kwh += r.total_delivered_kw() * dt_hours;
            storage_throughput_kwh += (r.charge_kw + r.discharge_kw) * dt_hours;
        }
        let equivalent_full_cycles = if solved.tes_capacity_kwh > 0.0 {
            storage_throughput_kwh / (2.0 * solved.tes_capacity_kwh)
        } else {
            0.0
        };

        Self {
            total_cost: solved.objective_cost,
            peak_plant_kw,
            peak_pumping_kw,
            total_delivered_kwh,
            storage_throughput_kwh,
            equivalent_full_cycles,
        }
    }
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cost={:.2}  peak_plant={:.1} kW  peak_pump={:.1} kW  \
             delivered={:.1} kWh  storage_throughput={:.1} kWh  cycles={:.2}",
            self.total_cost,
            self.peak_plant_kw,
            self.peak_pumping_kw,
            self.total_delivered_kwh,
            self.storage_throughput_kwh,
            self.equivalent_full_cycles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(t: usize) -> DispatchRow {
        DispatchRow {
            timestep: t,
            time_hr: t as f64,
            plant_kw: 10.0 + t as f64,
            charge_kw: 2.0,
            discharge_kw: 1.0,
            soc_kwh: 5.0,
            pumping_kw: 0.5,
            delivered_kw: vec![6.0, 4.0],
        }
    }

    fn make_solved(status: SolveStatus) -> SolvedDispatch {
        SolvedDispatch {
            status,
            objective_cost: 42.0,
            pumping_mode: PumpingMode::Centralized,
            tes_capacity_kwh: 10.0,
            building_ids: vec!["a".to_string(), "b".to_string()],
            rows: (0..3).map(make_row).collect(),
        }
    }

    #[test]
    fn header_lists_building_columns() {
        let solved = make_solved(SolveStatus::Optimal);
        let header = solved.header();
        assert_eq!(header.len(), 9);
        assert_eq!(header[0], "timestep");
        assert_eq!(header[7], "delivered_a_kw");
        assert_eq!(header[8], "delivered_b_kw");
    }

    #[test]
    fn table_matches_header_width() {
        let solved = make_solved(SolveStatus::Optimal);
        let table = solved.table().ok();
        assert!(table.is_some());
        let table = table.unwrap_or_default();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|row| row.len() == solved.header().len()));
    }

    #[test]
    fn table_refuses_non_optimal_status() {
        let solved = make_solved(SolveStatus::Infeasible);
        let result = solved.table();
        assert!(matches!(
            result,
            Err(ExportError::NotSolved(SolveStatus::Infeasible))
        ));
    }

    #[test]
    fn summary_aggregates_rows() {
        let solved = make_solved(SolveStatus::Optimal);
        let summary = solved.summary(1.0);
        assert_eq!(summary.total_cost, 42.0);
        assert_eq!(summary.peak_plant_kw, 12.0);
        assert_eq!(summary.peak_pumping_kw, 0.5);
        assert!((summary.total_delivered_kwh - 30.0).abs() < 1e-12);
        assert!((summary.storage_throughput_kwh - 9.0).abs() < 1e-12);
        // 9 kWh through a 10 kWh store: 0.45 equivalent cycles
        assert!((summary.equivalent_full_cycles - 0.45).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_reports_zero_cycles() {
        let mut solved = make_solved(SolveStatus::Optimal);
        solved.tes_capacity_kwh = 0.0;
        let summary = solved.summary(1.0);
        assert_eq!(summary.equivalent_full_cycles, 0.0);
    }

    #[test]
    fn row_display_does_not_panic() {
        let s = format!("{}", make_row(0));
        assert!(!s.is_empty());
    }
}
