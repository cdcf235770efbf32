//! Network-side model: head differences, pumping energy, hydraulic limits.

use crate::config::ScenarioConfig;

/// Standard gravity (m/s²).
const GRAVITY_M_S2: f64 = 9.81;

/// Specific heat capacity of water (J/(kg·K)).
const WATER_CP_J_PER_KG_K: f64 = 4186.0;

/// Hydraulic and thermal characteristics of the piping network.
///
/// `CoolingGrid` turns branch head differences into linear pumping-power
/// coefficients and exposes hydraulic limits as constraint bounds. It is a
/// pure function of the network parameters and holds no per-solve state.
///
/// Mass flow on a branch follows from the delivered cooling power through
/// the design temperature split, `ṁ = P / (c_p·ΔT)`, so the pump power for
/// a branch at head `H` is `ṁ·g·H / η`, linear in delivered power.
#[derive(Debug, Clone)]
pub struct CoolingGrid {
    /// Design supply/return temperature split (K).
    pub delta_t_k: f64,

    /// Secondary pump efficiency (0..1.0).
    pub pump_efficiency: f64,

    /// Maximum admissible head difference on any branch (m).
    pub max_head_m: f64,

    /// Per-branch mass-flow ceiling (kg/s), if any.
    pub max_flow_kg_s: Option<f64>,
}

impl CoolingGrid {
    /// Creates a grid model with the specified parameters.
    ///
    /// # Panics
    ///
    /// Panics if the temperature split, efficiency, head limit, or flow
    /// ceiling is out of range.
    pub fn new(
        delta_t_k: f64,
        pump_efficiency: f64,
        max_head_m: f64,
        max_flow_kg_s: Option<f64>,
    ) -> Self {
        assert!(delta_t_k > 0.0);
        assert!(pump_efficiency > 0.0 && pump_efficiency <= 1.0);
        assert!(max_head_m > 0.0);
        if let Some(flow) = max_flow_kg_s {
            assert!(flow > 0.0);
        }

        Self {
            delta_t_k,
            pump_efficiency,
            max_head_m,
            max_flow_kg_s,
        }
    }

    /// Builds the grid model from a validated scenario configuration.
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        Self::new(
            cfg.network.delta_t_k,
            cfg.network.pump_efficiency,
            cfg.network.max_head_m,
            cfg.network.max_flow_kg_s,
        )
    }

    /// Pumping power per unit of delivered cooling power for a branch at
    /// the given head difference (W pump per W delivered, dimensionless).
    pub fn pump_coefficient(&self, head_m: f64) -> f64 {
        GRAVITY_M_S2 * head_m / (WATER_CP_J_PER_KG_K * self.delta_t_k * self.pump_efficiency)
    }

    /// Pumping coefficient for a central pump sized on the critical branch
    /// of a per-branch head row: the maximum head applied to total flow.
    pub fn critical_coefficient(&self, heads_m: &[f64]) -> f64 {
        let critical = heads_m.iter().copied().fold(0.0, f64::max);
        self.pump_coefficient(critical)
    }

    /// Whether a head difference is within the hydraulic limit.
    pub fn head_within_limit(&self, head_m: f64) -> bool {
        (0.0..=self.max_head_m).contains(&head_m)
    }

    /// Maximum cooling power deliverable over a single branch (kW), from
    /// the mass-flow ceiling. `None` means unconstrained.
    pub fn max_branch_delivery_kw(&self) -> Option<f64> {
        self.max_flow_kg_s
            .map(|flow| flow * WATER_CP_J_PER_KG_K * self.delta_t_k / 1000.0)
    }
}
