//! Shared test fixtures for integration tests.

use dcn_opt::config::ScenarioConfig;
use dcn_opt::demand::{BuildingSet, FixedProfile, FlexBand};
use dcn_opt::opt::HeadSeries;

/// Two-step scenario: cheap first hour, expensive second hour, lossless
/// plant and storage, no hydraulic flow ceiling.
pub fn two_step_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.horizon.steps = 2;
    cfg.horizon.step_hours = 1.0;
    cfg.prices.electricity_per_kwh = vec![0.05, 0.20];
    cfg.plant.max_output_kw = 100.0;
    cfg.plant.min_output_kw = 0.0;
    cfg.plant.cop = 4.0;
    cfg.plant.distribution_loss_frac = 0.0;
    cfg.storage.max_charge_kw = 100.0;
    cfg.storage.max_discharge_kw = 100.0;
    cfg.storage.eta_charge = 1.0;
    cfg.storage.eta_discharge = 1.0;
    cfg.storage.initial_soc_frac = 0.0;
    cfg.buildings.clear();
    cfg
}

/// Single rigid building with 10 kW demand at both steps.
pub fn rigid_building_set() -> BuildingSet {
    BuildingSet::new(vec![Box::new(FixedProfile::new(
        "b1",
        "test",
        vec![10.0, 10.0],
        FlexBand::RIGID,
    ))])
}

/// Single building with 10 kW demand and a ±5 kW shifting band.
pub fn flexible_building_set() -> BuildingSet {
    BuildingSet::new(vec![Box::new(FixedProfile::new(
        "b1",
        "test",
        vec![10.0, 10.0],
        FlexBand::symmetric(5.0),
    ))])
}

/// Two rigid buildings with unequal demands.
pub fn two_building_set() -> BuildingSet {
    BuildingSet::new(vec![
        Box::new(FixedProfile::new(
            "b1",
            "test",
            vec![10.0, 10.0],
            FlexBand::RIGID,
        )),
        Box::new(FixedProfile::new(
            "b2",
            "test",
            vec![4.0, 6.0],
            FlexBand::RIGID,
        )),
    ])
}

/// Uniform 30 m head series over `steps` steps for the given branches.
pub fn uniform_heads(steps: usize, branch_ids: &[&str]) -> HeadSeries {
    HeadSeries::constant(30.0, steps, branch_ids)
}
