//! Generation-side model: plant and storage technical limits.

use crate::config::ScenarioConfig;

/// Technical limits of the cooling plant and its thermal store.
///
/// `CoolingPlant` is a stateless carrier of constraint coefficients; the
/// storage state of charge lives in the optimization model, not here.
///
/// # Power Flow Convention
/// All thermal quantities are positive cooling power in kW. Electric input
/// is derived from thermal output through the coefficient of performance.
#[derive(Debug, Clone)]
pub struct CoolingPlant {
    /// Maximum thermal output in kilowatts.
    pub max_output_kw: f64,

    /// Minimum thermal output in kilowatts.
    pub min_output_kw: f64,

    /// Coefficient of performance (thermal kW per electric kW).
    pub cop: f64,

    /// Network thermal losses as a fraction of delivered cooling.
    pub distribution_loss_frac: f64,

    /// Maximum storage charging rate in kilowatts.
    pub max_charge_kw: f64,

    /// Maximum storage discharging rate in kilowatts.
    pub max_discharge_kw: f64,

    /// Charging efficiency (0..1.0).
    pub eta_charge: f64,

    /// Discharging efficiency (0..1.0).
    pub eta_discharge: f64,

    /// Initial state of charge as a fraction of capacity (0.0 to 1.0).
    pub initial_soc_frac: f64,
}

impl CoolingPlant {
    /// Creates a plant model with the specified limits.
    ///
    /// # Panics
    ///
    /// Panics if output bounds are inconsistent, the COP is non-positive,
    /// rates are negative, or efficiencies/SoC fraction are out of range.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        max_output_kw: f64,
        min_output_kw: f64,
        cop: f64,
        distribution_loss_frac: f64,
        max_charge_kw: f64,
        max_discharge_kw: f64,
        eta_charge: f64,
        eta_discharge: f64,
        initial_soc_frac: f64,
    ) -> Self {
        assert!(max_output_kw > 0.0);
        assert!((0.0..=max_output_kw).contains(&min_output_kw));
        assert!(cop > 0.0);
        assert!(distribution_loss_frac >= 0.0);
        assert!(max_charge_kw >= 0.0 && max_discharge_kw >= 0.0);
        assert!(eta_charge > 0.0 && eta_charge <= 1.0);
        assert!(eta_discharge > 0.0 && eta_discharge <= 1.0);
        assert!((0.0..=1.0).contains(&initial_soc_frac));

        Self {
            max_output_kw,
            min_output_kw,
            cop,
            distribution_loss_frac,
            max_charge_kw,
            max_discharge_kw,
            eta_charge,
            eta_discharge,
            initial_soc_frac,
        }
    }

    /// Builds the plant model from a validated scenario configuration.
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        Self::new(
            cfg.plant.max_output_kw,
            cfg.plant.min_output_kw,
            cfg.plant.cop,
            cfg.plant.distribution_loss_frac,
            cfg.storage.max_charge_kw,
            cfg.storage.max_discharge_kw,
            cfg.storage.eta_charge,
            cfg.storage.eta_discharge,
            cfg.storage.initial_soc_frac,
        )
    }

    /// Electric input power for a given thermal output.
    pub fn electric_kw(&self, thermal_kw: f64) -> f64 {
        thermal_kw / self.cop
    }

    /// Thermal supply required at the plant to deliver `delivered_kw` at
    /// the buildings, accounting for distribution losses.
    pub fn supply_requirement_kw(&self, delivered_kw: f64) -> f64 {
        (1.0 + self.distribution_loss_frac) * delivered_kw
    }
}
