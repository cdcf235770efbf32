use crate::demand::{DemandProvider, FlexBand};

/// A demand profile given as an explicit per-step series.
///
/// This is the workhorse provider: configuration-listed demand series and
/// materialized synthetic profiles both end up here.
#[derive(Debug, Clone)]
pub struct FixedProfile {
    id: String,
    scenario_name: String,
    demand_kw: Vec<f64>,
    bands: Vec<FlexBand>,
}

impl FixedProfile {
    /// Creates a profile with the same flexibility band at every step.
    pub fn new(id: &str, scenario_name: &str, demand_kw: Vec<f64>, band: FlexBand) -> Self {
        let bands = vec![band; demand_kw.len()];
        Self::with_bands(id, scenario_name, demand_kw, bands)
    }

    /// Creates a profile with per-step flexibility bands.
    ///
    /// # Panics
    ///
    /// Panics if the band and demand series lengths differ or a band is
    /// negative.
    pub fn with_bands(
        id: &str,
        scenario_name: &str,
        demand_kw: Vec<f64>,
        bands: Vec<FlexBand>,
    ) -> Self {
        assert_eq!(demand_kw.len(), bands.len(), "band/demand length mismatch");
        assert!(
            bands.iter().all(|b| b.down_kw >= 0.0 && b.up_kw >= 0.0),
            "flexibility bounds must be >= 0"
        );

        Self {
            id: id.to_string(),
            scenario_name: scenario_name.to_string(),
            demand_kw,
            bands,
        }
    }
}

impl DemandProvider for FixedProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    fn horizon(&self) -> usize {
        self.demand_kw.len()
    }

    fn demand_kw(&self, timestep: usize) -> f64 {
        self.demand_kw[timestep]
    }

    fn flex_band(&self, timestep: usize) -> FlexBand {
        self.bands[timestep]
    }
}
