//! Building-side demand providers and the building collection.

/// Explicit per-step demand profile.
pub mod fixed;
/// Seeded sinusoid-plus-noise profile generator.
pub mod synthetic;

// Re-export the main types for convenience
pub use fixed::FixedProfile;
pub use synthetic::SyntheticProfile;

use crate::config::{ConfigError, ScenarioConfig};

/// Per-step allowable deviation range around the nominal demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexBand {
    /// Allowed reduction below nominal demand (kW, >= 0).
    pub down_kw: f64,
    /// Allowed increase above nominal demand (kW, >= 0).
    pub up_kw: f64,
}

impl FlexBand {
    /// A band admitting no deviation.
    pub const RIGID: FlexBand = FlexBand {
        down_kw: 0.0,
        up_kw: 0.0,
    };

    /// A band allowing the same deviation in both directions.
    pub fn symmetric(kw: f64) -> Self {
        Self {
            down_kw: kw,
            up_kw: kw,
        }
    }
}

/// A building as the optimizer sees it: a time-indexed cooling demand and
/// a per-step feasible deviation range.
///
/// Any object satisfying this contract is acceptable; the optimizer never
/// looks behind it. Delivered energy over the horizon is conserved, so the
/// band expresses load-shifting, not shedding.
pub trait DemandProvider: Send + Sync {
    /// Unique building identifier, matching the head-table branch id.
    fn id(&self) -> &str;

    /// Scenario name of the building model this profile came from.
    fn scenario_name(&self) -> &str;

    /// Number of time steps the profile covers.
    fn horizon(&self) -> usize;

    /// Nominal cooling demand at a time step (kW, >= 0).
    fn demand_kw(&self, timestep: usize) -> f64;

    /// Feasible deviation range around the nominal demand at a time step.
    fn flex_band(&self, timestep: usize) -> FlexBand;

    /// Total nominal demand energy over the horizon (kWh).
    fn total_energy_kwh(&self, dt_hours: f64) -> f64 {
        (0..self.horizon()).map(|t| self.demand_kw(t)).sum::<f64>() * dt_hours
    }
}

/// An ordered collection of demand providers with unique identifiers and a
/// common horizon.
pub struct BuildingSet {
    providers: Vec<Box<dyn DemandProvider>>,
}

impl BuildingSet {
    /// Creates a building set from a list of providers.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty, an identifier repeats, or the providers
    /// disagree on horizon length.
    pub fn new(providers: Vec<Box<dyn DemandProvider>>) -> Self {
        assert!(!providers.is_empty(), "building set must not be empty");
        let horizon = providers[0].horizon();
        for (i, p) in providers.iter().enumerate() {
            assert_eq!(
                p.horizon(),
                horizon,
                "building \"{}\" horizon differs",
                p.id()
            );
            assert!(
                !providers[..i].iter().any(|other| other.id() == p.id()),
                "duplicate building id \"{}\"",
                p.id()
            );
        }
        Self { providers }
    }

    /// Builds the collection from a validated scenario configuration,
    /// materializing synthetic profiles.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown profile kind.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        let steps = cfg.horizon.steps;
        let mut providers: Vec<Box<dyn DemandProvider>> = Vec::with_capacity(cfg.buildings.len());
        for (i, b) in cfg.buildings.iter().enumerate() {
            let band = FlexBand {
                down_kw: b.flex_down_kw,
                up_kw: b.flex_up_kw,
            };
            let profile = match b.profile.as_str() {
                "fixed" => FixedProfile::new(&b.id, &b.scenario_name, b.demand_kw.clone(), band),
                "synthetic" => {
                    let generator =
                        SyntheticProfile::new(b.base_kw, b.amp_kw, b.phase_rad, b.noise_std, b.seed);
                    generator.materialize(&b.id, &b.scenario_name, steps, band)
                }
                other => {
                    return Err(ConfigError {
                        field: format!("buildings[{i}].profile"),
                        message: format!("unknown profile \"{other}\""),
                    });
                }
            };
            providers.push(Box::new(profile));
        }
        Ok(Self::new(providers))
    }

    /// Number of buildings.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the set is empty. Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Common horizon length.
    pub fn horizon(&self) -> usize {
        self.providers[0].horizon()
    }

    /// Building identifiers in iteration order.
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Iterates over the providers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DemandProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Looks up a provider by identifier.
    pub fn get(&self, id: &str) -> Option<&dyn DemandProvider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }
}
