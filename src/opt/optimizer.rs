//! Linear-program assembly and solve for the dispatch problem.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};
use tracing::{debug, info};

use crate::config::ScenarioConfig;
use crate::demand::BuildingSet;
use crate::grid::CoolingGrid;
use crate::opt::error::OptimizeError;
use crate::opt::solution::{DispatchRow, SolvedDispatch};
use crate::opt::types::{HeadSeries, PumpingMode, SolveStatus, TesCapacity};
use crate::plant::CoolingPlant;

/// Assembles and solves the time-coupled dispatch problem.
///
/// The optimizer borrows the scenario configuration, grid, plant, and
/// building collection read-only; every [`DispatchOptimizer::build_and_solve`]
/// call constructs a fresh decision model and leaves the collaborators
/// untouched, so independent solves can run concurrently.
pub struct DispatchOptimizer<'a> {
    config: &'a ScenarioConfig,
    grid: &'a CoolingGrid,
    plant: &'a CoolingPlant,
    buildings: &'a BuildingSet,
}

impl<'a> DispatchOptimizer<'a> {
    /// Creates an optimizer over already-constructed collaborators.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the building horizon or the price series
    /// does not match the configured horizon.
    pub fn new(
        config: &'a ScenarioConfig,
        grid: &'a CoolingGrid,
        plant: &'a CoolingPlant,
        buildings: &'a BuildingSet,
    ) -> Result<Self, OptimizeError> {
        let steps = config.horizon.steps;
        if steps == 0 {
            return Err(OptimizeError::InvalidInput(
                "horizon must have at least one step".to_string(),
            ));
        }
        if buildings.horizon() != steps {
            return Err(OptimizeError::InvalidInput(format!(
                "buildings cover {} steps, horizon has {steps}",
                buildings.horizon()
            )));
        }
        let n_prices = config.prices.electricity_per_kwh.len();
        if n_prices != 1 && n_prices != steps {
            return Err(OptimizeError::InvalidInput(format!(
                "price series has {n_prices} entries for a {steps}-step horizon"
            )));
        }

        Ok(Self {
            config,
            grid,
            plant,
            buildings,
        })
    }

    /// Builds the dispatch LP for one scenario point and solves it.
    ///
    /// # Arguments
    ///
    /// * `heads` - Head-difference table, one row per time step and one
    ///   column per building connection
    /// * `tes` - Storage sizing for this run
    /// * `mode` - Secondary pumping topology
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for misaligned or out-of-range inputs,
    /// `Infeasible`/`Unbounded` for the corresponding solver outcomes, and
    /// `Solver` for any other backend failure. No partial schedule is ever
    /// returned.
    pub fn build_and_solve(
        &self,
        heads: &HeadSeries,
        tes: TesCapacity,
        mode: PumpingMode,
    ) -> Result<SolvedDispatch, OptimizeError> {
        let steps = self.config.horizon.steps;
        let dt = self.config.horizon.step_hours;
        let n_buildings = self.buildings.len();

        // 1. Validate per-solve inputs
        if heads.steps() != steps {
            return Err(OptimizeError::InvalidInput(format!(
                "head table has {} rows, horizon has {steps} steps",
                heads.steps()
            )));
        }
        let branch_of = self
            .buildings
            .iter()
            .map(|b| {
                heads.branch_index(b.id()).ok_or_else(|| {
                    OptimizeError::InvalidInput(format!(
                        "head table has no branch column for building \"{}\"",
                        b.id()
                    ))
                })
            })
            .collect::<Result<Vec<usize>, OptimizeError>>()?;
        if heads.max_head_m() > self.grid.max_head_m {
            return Err(OptimizeError::InvalidInput(format!(
                "head {:.1} m exceeds the hydraulic limit of {:.1} m",
                heads.max_head_m(),
                self.grid.max_head_m
            )));
        }

        let capacity_kwh = tes.kwh();
        let (max_charge_kw, max_discharge_kw) = if tes.is_enabled() {
            (self.plant.max_charge_kw, self.plant.max_discharge_kw)
        } else {
            (0.0, 0.0)
        };
        let branch_cap_kw = self.grid.max_branch_delivery_kw();

        debug!(
            steps,
            n_buildings,
            tes_kwh = capacity_kwh,
            mode = %mode,
            "assembling dispatch problem"
        );

        // 2. Decision variables
        let mut vars = ProblemVariables::new();
        let plant_kw = vars.add_vector(
            variable()
                .min(self.plant.min_output_kw)
                .max(self.plant.max_output_kw),
            steps,
        );
        let charge_kw = vars.add_vector(variable().min(0.0).max(max_charge_kw), steps);
        let discharge_kw = vars.add_vector(variable().min(0.0).max(max_discharge_kw), steps);
        // soc[t] is the state entering step t; soc[steps] closes the chain.
        let soc_kwh = vars.add_vector(variable().min(0.0).max(capacity_kwh), steps + 1);
        let pumping_kw = vars.add_vector(variable().min(0.0), steps);

        let mut delivered_kw: Vec<Vec<Variable>> = Vec::with_capacity(n_buildings);
        for building in self.buildings.iter() {
            let mut per_step = Vec::with_capacity(steps);
            for t in 0..steps {
                let demand = building.demand_kw(t);
                let band = building.flex_band(t);
                let lower = (demand - band.down_kw).max(0.0);
                let mut upper = demand + band.up_kw;
                if let Some(cap) = branch_cap_kw {
                    upper = upper.min(cap);
                }
                if lower > upper {
                    return Err(OptimizeError::InvalidInput(format!(
                        "building \"{}\" has an empty delivery range [{lower:.1}, {upper:.1}] kW \
                         at step {t}",
                        building.id()
                    )));
                }
                per_step.push(vars.add(variable().min(lower).max(upper)));
            }
            delivered_kw.push(per_step);
        }

        // 3. Objective: total electricity cost of generation and pumping
        let electric_per_thermal = 1.0 / self.plant.cop;
        let objective = (0..steps)
            .map(|t| {
                let price = self.config.price_per_kwh(t);
                price * dt * (electric_per_thermal * plant_kw[t] + pumping_kw[t])
            })
            .sum::<Expression>();

        let mut model = vars.minimise(objective).using(good_lp::microlp);

        // 4. Constraints
        let initial_soc_kwh = self.plant.initial_soc_frac * capacity_kwh;
        model = model.with(constraint!(soc_kwh[0] == initial_soc_kwh));

        let supply_factor = 1.0 + self.plant.distribution_loss_frac;
        for t in 0..steps {
            // Storage dynamics: charge fills, discharge drains, both with
            // their conversion losses on the store side.
            let soc_delta: Expression = charge_kw[t] * (self.plant.eta_charge * dt)
                - discharge_kw[t] * (dt / self.plant.eta_discharge);
            model = model.with(constraint!(soc_kwh[t + 1] == soc_kwh[t] + soc_delta));

            // Thermal balance: generation plus net storage flow covers
            // delivered cooling and distribution losses.
            let delivered_total = delivered_kw
                .iter()
                .map(|per_step| Expression::from(per_step[t]))
                .sum::<Expression>();
            let supply: Expression = plant_kw[t] + discharge_kw[t] - charge_kw[t];
            let demand_side: Expression = supply_factor * delivered_total.clone();
            model = model.with(constraint!(supply == demand_side));

            // Pumping power for the active topology; the other topology has
            // no variables in this model.
            let pump_demand: Expression = match mode {
                PumpingMode::Centralized => {
                    let critical = branch_of
                        .iter()
                        .map(|&branch| heads.head_m(t, branch))
                        .fold(0.0, f64::max);
                    self.grid.pump_coefficient(critical) * delivered_total
                }
                PumpingMode::Distributed => delivered_kw
                    .iter()
                    .zip(&branch_of)
                    .map(|(per_step, &branch)| {
                        self.grid.pump_coefficient(heads.head_m(t, branch)) * per_step[t]
                    })
                    .sum::<Expression>(),
            };
            model = model.with(constraint!(pumping_kw[t] == pump_demand));
        }

        // Flexibility shifts load, it never sheds it: per-building energy
        // over the horizon is conserved.
        for (b, building) in self.buildings.iter().enumerate() {
            let delivered_total = (0..steps)
                .map(|t| Expression::from(delivered_kw[b][t]))
                .sum::<Expression>();
            let demand_total: f64 = (0..steps).map(|t| building.demand_kw(t)).sum();
            model = model.with(constraint!(delivered_total == demand_total));
        }

        // 5. Solve
        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => OptimizeError::Infeasible,
            ResolutionError::Unbounded => OptimizeError::Unbounded,
            other => OptimizeError::Solver(other.to_string()),
        })?;

        // 6. Extract the schedule
        let rows: Vec<DispatchRow> = (0..steps)
            .map(|t| DispatchRow {
                timestep: t,
                time_hr: t as f64 * dt,
                plant_kw: solution.value(plant_kw[t]),
                charge_kw: solution.value(charge_kw[t]),
                discharge_kw: solution.value(discharge_kw[t]),
                soc_kwh: solution.value(soc_kwh[t + 1]),
                pumping_kw: solution.value(pumping_kw[t]),
                delivered_kw: delivered_kw
                    .iter()
                    .map(|per_step| solution.value(per_step[t]))
                    .collect(),
            })
            .collect();

        let objective_cost: f64 = rows
            .iter()
            .map(|r| {
                self.config.price_per_kwh(r.timestep)
                    * dt
                    * (electric_per_thermal * r.plant_kw + r.pumping_kw)
            })
            .sum();

        info!(cost = objective_cost, mode = %mode, tes_kwh = capacity_kwh, "dispatch solved");

        Ok(SolvedDispatch {
            status: SolveStatus::Optimal,
            objective_cost,
            pumping_mode: mode,
            tes_capacity_kwh: capacity_kwh,
            building_ids: self.buildings.ids().into_iter().map(str::to_string).collect(),
            rows,
        })
    }
}
