//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default. The configuration
/// is read-only after loading; every component borrows it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Optimization horizon parameters.
    #[serde(default)]
    pub horizon: HorizonConfig,
    /// Electricity tariff parameters.
    #[serde(default)]
    pub prices: PriceConfig,
    /// Cooling plant parameters.
    #[serde(default)]
    pub plant: PlantConfig,
    /// Thermal storage rate and efficiency parameters.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Piping network and pumping parameters.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Connected buildings.
    #[serde(default)]
    pub buildings: Vec<BuildingConfig>,
}

/// Optimization horizon parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    /// Number of time steps in the horizon (must be > 0).
    pub steps: usize,
    /// Duration of one time step in hours (must be > 0).
    pub step_hours: f64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            steps: 24,
            step_hours: 1.0,
        }
    }
}

/// Electricity tariff parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Electricity price per kWh. Either a single entry (flat tariff
    /// applied to every step) or exactly `horizon.steps` entries.
    pub electricity_per_kwh: Vec<f64>,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            electricity_per_kwh: vec![0.12],
        }
    }
}

/// Cooling plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConfig {
    /// Maximum thermal output (kW).
    pub max_output_kw: f64,
    /// Minimum thermal output while running (kW).
    pub min_output_kw: f64,
    /// Coefficient of performance (thermal kW per electric kW).
    pub cop: f64,
    /// Network thermal losses as a fraction of delivered cooling.
    pub distribution_loss_frac: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            max_output_kw: 5000.0,
            min_output_kw: 0.0,
            cop: 4.5,
            distribution_loss_frac: 0.05,
        }
    }
}

/// Thermal storage rate and efficiency parameters.
///
/// Storage capacity itself is a per-solve input, not configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Maximum charging rate (kW).
    pub max_charge_kw: f64,
    /// Maximum discharging rate (kW).
    pub max_discharge_kw: f64,
    /// Charge efficiency (0.0–1.0).
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0).
    pub eta_discharge: f64,
    /// Initial state of charge as a fraction of capacity (0.0–1.0).
    pub initial_soc_frac: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_charge_kw: 2000.0,
            max_discharge_kw: 2000.0,
            eta_charge: 0.98,
            eta_discharge: 0.98,
            initial_soc_frac: 0.0,
        }
    }
}

/// Piping network and pumping parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Design supply/return temperature split (K).
    pub delta_t_k: f64,
    /// Secondary pump efficiency (0.0–1.0).
    pub pump_efficiency: f64,
    /// Maximum admissible head difference on any branch (m).
    pub max_head_m: f64,
    /// Head difference assumed when no head table is supplied (m).
    pub default_head_m: f64,
    /// Per-branch mass-flow ceiling (kg/s). Absent means unconstrained.
    pub max_flow_kg_s: Option<f64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            delta_t_k: 8.0,
            pump_efficiency: 0.72,
            max_head_m: 120.0,
            default_head_m: 35.0,
            max_flow_kg_s: None,
        }
    }
}

/// A building connected to the network.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    /// Unique, filesystem-safe identifier (also the head-table branch id).
    pub id: String,
    /// Scenario name of the building model this profile came from.
    pub scenario_name: String,
    /// Demand profile: `"fixed"` or `"synthetic"`.
    pub profile: String,
    /// Per-step demand (kW), for the fixed profile. Must have
    /// `horizon.steps` entries.
    pub demand_kw: Vec<f64>,
    /// Baseline demand (kW), for the synthetic profile.
    pub base_kw: f64,
    /// Sinusoidal amplitude (kW), for the synthetic profile.
    pub amp_kw: f64,
    /// Phase offset (radians), for the synthetic profile.
    pub phase_rad: f64,
    /// Gaussian noise standard deviation (kW), for the synthetic profile.
    pub noise_std: f64,
    /// Random seed for the synthetic profile.
    pub seed: u64,
    /// Allowed downward deviation from nominal demand (kW, >= 0).
    pub flex_down_kw: f64,
    /// Allowed upward deviation from nominal demand (kW, >= 0).
    pub flex_up_kw: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            id: "b1".to_string(),
            scenario_name: "default".to_string(),
            profile: "synthetic".to_string(),
            demand_kw: Vec::new(),
            base_kw: 500.0,
            amp_kw: 250.0,
            phase_rad: 1.2,
            noise_std: 10.0,
            seed: 7,
            flex_down_kw: 0.0,
            flex_up_kw: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"horizon.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn filesystem_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 24-hour hourly horizon, a day/night
    /// tariff, and two rigid synthetic buildings.
    pub fn baseline() -> Self {
        let mut tariff = Vec::with_capacity(24);
        for hour in 0..24 {
            let price = if !(6..22).contains(&hour) {
                0.08
            } else if (9..18).contains(&hour) {
                0.20
            } else {
                0.12
            };
            tariff.push(price);
        }

        Self {
            horizon: HorizonConfig::default(),
            prices: PriceConfig {
                electricity_per_kwh: tariff,
            },
            plant: PlantConfig::default(),
            storage: StorageConfig::default(),
            network: NetworkConfig::default(),
            buildings: vec![
                BuildingConfig {
                    id: "office_a".to_string(),
                    scenario_name: "office_tower".to_string(),
                    base_kw: 800.0,
                    amp_kw: 400.0,
                    seed: 11,
                    ..BuildingConfig::default()
                },
                BuildingConfig {
                    id: "campus_b".to_string(),
                    scenario_name: "university_campus".to_string(),
                    base_kw: 500.0,
                    amp_kw: 200.0,
                    phase_rad: 0.9,
                    seed: 23,
                    ..BuildingConfig::default()
                },
            ],
        }
    }

    /// Returns the high-flex preset: the baseline with wide per-building
    /// flexibility bands.
    pub fn high_flex() -> Self {
        let mut cfg = Self::baseline();
        for building in &mut cfg.buildings {
            building.flex_down_kw = 150.0;
            building.flex_up_kw = 150.0;
        }
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_flex"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_flex" => Ok(Self::high_flex()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Electricity price for a time step, broadcasting a flat tariff.
    pub fn price_per_kwh(&self, timestep: usize) -> f64 {
        let series = &self.prices.electricity_per_kwh;
        if series.len() == 1 {
            series[0]
        } else {
            series[timestep]
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let h = &self.horizon;

        if h.steps == 0 {
            errors.push(ConfigError {
                field: "horizon.steps".into(),
                message: "must be > 0".into(),
            });
        }
        if h.step_hours <= 0.0 {
            errors.push(ConfigError {
                field: "horizon.step_hours".into(),
                message: "must be > 0".into(),
            });
        }

        let n_prices = self.prices.electricity_per_kwh.len();
        if n_prices != 1 && n_prices != h.steps {
            errors.push(ConfigError {
                field: "prices.electricity_per_kwh".into(),
                message: format!("must have 1 or horizon.steps entries, got {n_prices}"),
            });
        }

        let p = &self.plant;
        if p.max_output_kw <= 0.0 {
            errors.push(ConfigError {
                field: "plant.max_output_kw".into(),
                message: "must be > 0".into(),
            });
        }
        if p.min_output_kw < 0.0 || p.min_output_kw > p.max_output_kw {
            errors.push(ConfigError {
                field: "plant.min_output_kw".into(),
                message: "must be in [0, plant.max_output_kw]".into(),
            });
        }
        if p.cop <= 0.0 {
            errors.push(ConfigError {
                field: "plant.cop".into(),
                message: "must be > 0".into(),
            });
        }
        if p.distribution_loss_frac < 0.0 {
            errors.push(ConfigError {
                field: "plant.distribution_loss_frac".into(),
                message: "must be >= 0".into(),
            });
        }

        let s = &self.storage;
        if s.max_charge_kw < 0.0 || s.max_discharge_kw < 0.0 {
            errors.push(ConfigError {
                field: "storage.max_charge_kw".into(),
                message: "rates must be >= 0".into(),
            });
        }
        for (field, eta) in [
            ("storage.eta_charge", s.eta_charge),
            ("storage.eta_discharge", s.eta_discharge),
        ] {
            if !(eta > 0.0 && eta <= 1.0) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in (0.0, 1.0]".into(),
                });
            }
        }
        if !(0.0..=1.0).contains(&s.initial_soc_frac) {
            errors.push(ConfigError {
                field: "storage.initial_soc_frac".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let n = &self.network;
        if n.delta_t_k <= 0.0 {
            errors.push(ConfigError {
                field: "network.delta_t_k".into(),
                message: "must be > 0".into(),
            });
        }
        if !(n.pump_efficiency > 0.0 && n.pump_efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "network.pump_efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if n.max_head_m <= 0.0 {
            errors.push(ConfigError {
                field: "network.max_head_m".into(),
                message: "must be > 0".into(),
            });
        }
        if n.default_head_m <= 0.0 || n.default_head_m > n.max_head_m {
            errors.push(ConfigError {
                field: "network.default_head_m".into(),
                message: "must be in (0, network.max_head_m]".into(),
            });
        }
        if let Some(flow) = n.max_flow_kg_s
            && flow <= 0.0
        {
            errors.push(ConfigError {
                field: "network.max_flow_kg_s".into(),
                message: "must be > 0 when present".into(),
            });
        }

        if self.buildings.is_empty() {
            errors.push(ConfigError {
                field: "buildings".into(),
                message: "at least one building is required".into(),
            });
        }
        for (i, b) in self.buildings.iter().enumerate() {
            if !filesystem_safe(&b.id) {
                errors.push(ConfigError {
                    field: format!("buildings[{i}].id"),
                    message: "must be non-empty and contain only [A-Za-z0-9_-]".into(),
                });
            }
            if self.buildings[..i].iter().any(|other| other.id == b.id) {
                errors.push(ConfigError {
                    field: format!("buildings[{i}].id"),
                    message: format!("duplicate id \"{}\"", b.id),
                });
            }
            match b.profile.as_str() {
                "fixed" => {
                    if b.demand_kw.len() != h.steps {
                        errors.push(ConfigError {
                            field: format!("buildings[{i}].demand_kw"),
                            message: format!(
                                "must have horizon.steps entries, got {}",
                                b.demand_kw.len()
                            ),
                        });
                    }
                    if b.demand_kw.iter().any(|kw| *kw < 0.0) {
                        errors.push(ConfigError {
                            field: format!("buildings[{i}].demand_kw"),
                            message: "entries must be >= 0".into(),
                        });
                    }
                }
                "synthetic" => {
                    if b.base_kw < 0.0 || b.noise_std < 0.0 {
                        errors.push(ConfigError {
                            field: format!("buildings[{i}].base_kw"),
                            message: "base_kw and noise_std must be >= 0".into(),
                        });
                    }
                }
                other => {
                    errors.push(ConfigError {
                        field: format!("buildings[{i}].profile"),
                        message: format!("must be \"fixed\" or \"synthetic\", got \"{other}\""),
                    });
                }
            }
            if b.flex_down_kw < 0.0 || b.flex_up_kw < 0.0 {
                errors.push(ConfigError {
                    field: format!("buildings[{i}].flex_down_kw"),
                    message: "flexibility bounds must be >= 0".into(),
                });
            }
        }

        errors
    }
}
