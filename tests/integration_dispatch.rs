//! Integration tests for single-solve dispatch behavior.

mod common;

use dcn_opt::demand::BuildingSet;
use dcn_opt::grid::CoolingGrid;
use dcn_opt::opt::{
    DispatchOptimizer, HeadSeries, OptimizeError, PumpingMode, SolvedDispatch, TesCapacity,
};
use dcn_opt::plant::CoolingPlant;

/// Solves the shared two-step scenario for the given buildings and inputs.
fn solve_two_step(
    buildings: &BuildingSet,
    heads: &HeadSeries,
    tes: TesCapacity,
    mode: PumpingMode,
) -> Result<SolvedDispatch, OptimizeError> {
    let cfg = common::two_step_config();
    let grid = CoolingGrid::from_config(&cfg);
    let plant = CoolingPlant::from_config(&cfg);
    let optimizer = DispatchOptimizer::new(&cfg, &grid, &plant, buildings)
        .expect("optimizer should construct");
    optimizer.build_and_solve(heads, tes, mode)
}

#[test]
fn disabled_storage_meets_demand_exactly() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &buildings.ids());
    let solved = solve_two_step(
        &buildings,
        &heads,
        TesCapacity::Disabled,
        PumpingMode::Centralized,
    )
    .expect("solve should succeed");

    assert_eq!(solved.rows.len(), 2);
    for row in &solved.rows {
        assert!((row.plant_kw - 10.0).abs() < 1e-6, "plant should track demand");
        assert!(row.charge_kw.abs() < 1e-9);
        assert!(row.discharge_kw.abs() < 1e-9);
        assert!(row.soc_kwh.abs() < 1e-9);
    }
}

#[test]
fn energy_balance_holds_every_step() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &buildings.ids());
    let tes = TesCapacity::capacity(10.0).expect("capacity is valid");
    let solved = solve_two_step(&buildings, &heads, tes, PumpingMode::Centralized)
        .expect("solve should succeed");

    for row in &solved.rows {
        let supply = row.plant_kw + row.discharge_kw - row.charge_kw;
        let delivered = row.total_delivered_kw();
        assert!(
            (supply - delivered).abs() < 1e-6,
            "balance violated at step {}: supply {supply}, delivered {delivered}",
            row.timestep
        );
    }
}

#[test]
fn soc_stays_within_bounds() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &buildings.ids());
    let capacity_kwh = 10.0;
    let tes = TesCapacity::capacity(capacity_kwh).expect("capacity is valid");
    let solved = solve_two_step(&buildings, &heads, tes, PumpingMode::Centralized)
        .expect("solve should succeed");

    for row in &solved.rows {
        assert!(row.soc_kwh >= -1e-9, "soc below zero at step {}", row.timestep);
        assert!(
            row.soc_kwh <= capacity_kwh + 1e-9,
            "soc above capacity at step {}",
            row.timestep
        );
    }
}

#[test]
fn ample_storage_shifts_output_to_the_cheap_step() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &buildings.ids());
    let tes = TesCapacity::capacity(20.0).expect("capacity is valid");
    let solved = solve_two_step(&buildings, &heads, tes, PumpingMode::Centralized)
        .expect("solve should succeed");

    // Lossless storage and a 4x price spread: all generation moves to the
    // cheap first step, the store covers the expensive one.
    assert!((solved.rows[0].plant_kw - 20.0).abs() < 1e-4);
    assert!(solved.rows[1].plant_kw < 1e-4);
    assert!((solved.rows[0].charge_kw - 10.0).abs() < 1e-4);
    assert!((solved.rows[1].discharge_kw - 10.0).abs() < 1e-4);
    for row in &solved.rows {
        assert!((row.total_delivered_kw() - 10.0).abs() < 1e-6);
    }

    let baseline = solve_two_step(
        &buildings,
        &heads,
        TesCapacity::Disabled,
        PumpingMode::Centralized,
    )
    .expect("solve should succeed");
    assert!(solved.objective_cost < baseline.objective_cost);
}

#[test]
fn cost_is_monotone_in_storage_capacity() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &buildings.ids());

    let mut previous_cost = f64::INFINITY;
    for tes in [
        TesCapacity::Disabled,
        TesCapacity::Capacity(2.0),
        TesCapacity::Capacity(5.0),
        TesCapacity::Capacity(20.0),
        TesCapacity::Capacity(1000.0),
    ] {
        let solved = solve_two_step(&buildings, &heads, tes, PumpingMode::Centralized)
            .expect("solve should succeed");
        assert!(
            solved.objective_cost <= previous_cost + 1e-9,
            "more storage must never cost more: {} kWh gave {}",
            tes.kwh(),
            solved.objective_cost
        );
        previous_cost = solved.objective_cost;
    }
}

#[test]
fn pumping_mode_changes_only_the_pumping_column() {
    let buildings = common::two_building_set();
    // Uneven branch heads make the two topologies price pumping differently.
    let heads = HeadSeries::new(
        vec!["b1".to_string(), "b2".to_string()],
        vec![vec![40.0, 10.0], vec![40.0, 10.0]],
    )
    .expect("head series is valid");
    let tes = TesCapacity::capacity(10.0).expect("capacity is valid");

    let csp = solve_two_step(&buildings, &heads, tes, PumpingMode::Centralized)
        .expect("solve should succeed");
    let dsp = solve_two_step(&buildings, &heads, tes, PumpingMode::Distributed)
        .expect("solve should succeed");

    for (a, b) in csp.rows.iter().zip(&dsp.rows) {
        assert!((a.plant_kw - b.plant_kw).abs() < 1e-6);
        assert!((a.charge_kw - b.charge_kw).abs() < 1e-6);
        assert!((a.discharge_kw - b.discharge_kw).abs() < 1e-6);
        assert!((a.soc_kwh - b.soc_kwh).abs() < 1e-6);
        for (da, db) in a.delivered_kw.iter().zip(&b.delivered_kw) {
            assert!((da - db).abs() < 1e-6);
        }
        // The central pump is sized on the 40 m branch for all flow; the
        // distributed pumps price the 10 m branch at its own head.
        assert!(a.pumping_kw > b.pumping_kw + 1e-9);
    }
}

#[test]
fn mismatched_head_rows_are_invalid_input() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(3, &buildings.ids());
    let result = solve_two_step(
        &buildings,
        &heads,
        TesCapacity::Disabled,
        PumpingMode::Centralized,
    );
    assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
}

#[test]
fn unknown_branch_column_is_invalid_input() {
    let buildings = common::rigid_building_set();
    let heads = common::uniform_heads(2, &["zz"]);
    let result = solve_two_step(
        &buildings,
        &heads,
        TesCapacity::Disabled,
        PumpingMode::Centralized,
    );
    assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
}

#[test]
fn undersized_plant_is_infeasible() {
    let mut cfg = common::two_step_config();
    cfg.plant.max_output_kw = 5.0;
    let grid = CoolingGrid::from_config(&cfg);
    let plant = CoolingPlant::from_config(&cfg);
    let buildings = common::rigid_building_set();
    let optimizer = DispatchOptimizer::new(&cfg, &grid, &plant, &buildings)
        .expect("optimizer should construct");
    let heads = common::uniform_heads(2, &buildings.ids());

    let result = optimizer.build_and_solve(&heads, TesCapacity::Disabled, PumpingMode::Centralized);
    assert!(matches!(result, Err(OptimizeError::Infeasible)));
}
