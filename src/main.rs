//! Dispatch sweep driver — CLI wiring and config-driven optimization runs.

use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dcn_opt::config::ScenarioConfig;
use dcn_opt::demand::BuildingSet;
use dcn_opt::grid::CoolingGrid;
use dcn_opt::io::export::export_solution_csv;
use dcn_opt::io::head::read_head_csv_path;
use dcn_opt::opt::{DispatchOptimizer, HeadSeries, PumpingMode, TesCapacity};
use dcn_opt::plant::CoolingPlant;

/// Default TES-capacity sweep in kWh (0, 625, 1250, 1875, 2500 MWh).
const DEFAULT_TES_SWEEP_KWH: &[f64] = &[0.0, 625_000.0, 1_250_000.0, 1_875_000.0, 2_500_000.0];

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    heads_path: Option<String>,
    tes_kwh: Vec<f64>,
    distributed: bool,
    out_dir: Option<String>,
    label: String,
    quiet: bool,
}

fn print_help() {
    eprintln!("dcn-opt — District cooling network dispatch optimizer");
    eprintln!();
    eprintln!("Usage: dcn-opt [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (baseline, high_flex)");
    eprintln!("  --heads <path>      Head-difference CSV (default: constant heads)");
    eprintln!("  --tes <kwh,...>     TES capacities to sweep, in kWh");
    eprintln!("  --dsp               Distributed secondary pumping (default: centralized)");
    eprintln!("  --out <dir>         Save each solved schedule as CSV under <dir>");
    eprintln!("  --label <prefix>    Filename prefix for saved schedules");
    eprintln!("  --quiet             Suppress per-run summary lines");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        heads_path: None,
        tes_kwh: DEFAULT_TES_SWEEP_KWH.to_vec(),
        distributed: false,
        out_dir: None,
        label: String::new(),
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--heads" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --heads requires a path argument");
                    process::exit(1);
                }
                cli.heads_path = Some(args[i].clone());
            }
            "--tes" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --tes requires a comma-separated kWh list");
                    process::exit(1);
                }
                let mut sweep = Vec::new();
                for part in args[i].split(',') {
                    match part.trim().parse::<f64>() {
                        Ok(kwh) => sweep.push(kwh),
                        Err(_) => {
                            eprintln!("error: --tes value \"{part}\" is not a number");
                            process::exit(1);
                        }
                    }
                }
                cli.tes_kwh = sweep;
            }
            "--dsp" => {
                cli.distributed = true;
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a directory argument");
                    process::exit(1);
                }
                cli.out_dir = Some(args[i].clone());
            }
            "--label" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --label requires a prefix argument");
                    process::exit(1);
                }
                cli.label = args[i].clone();
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads and validates the scenario from CLI selection.
fn load_scenario(cli: &CliArgs) -> ScenarioConfig {
    let cfg = if let Some(path) = &cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }
    cfg
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = parse_args();
    let cfg = load_scenario(&cli);

    let grid = CoolingGrid::from_config(&cfg);
    let plant = CoolingPlant::from_config(&cfg);
    let buildings = match BuildingSet::from_config(&cfg) {
        Ok(buildings) => buildings,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let heads = match &cli.heads_path {
        Some(path) => match read_head_csv_path(Path::new(path)) {
            Ok(heads) => heads,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => {
            let ids = buildings.ids();
            HeadSeries::constant(cfg.network.default_head_m, cfg.horizon.steps, &ids)
        }
    };
    info!(
        steps = heads.steps(),
        branches = heads.branch_ids().len(),
        max_head_m = heads.max_head_m(),
        "head series ready"
    );

    let optimizer = match DispatchOptimizer::new(&cfg, &grid, &plant, &buildings) {
        Ok(optimizer) => optimizer,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let mode = if cli.distributed {
        PumpingMode::Distributed
    } else {
        PumpingMode::Centralized
    };

    if let Some(dir) = &cli.out_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("error: cannot create \"{dir}\": {e}");
        process::exit(1);
    }

    for &tes_kwh in &cli.tes_kwh {
        let tes = match TesCapacity::capacity(tes_kwh) {
            Ok(tes) => tes,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };

        let solved = match optimizer.build_and_solve(&heads, tes, mode) {
            Ok(solved) => solved,
            Err(e) => {
                eprintln!("error: solve failed for TES {tes_kwh} kWh: {e}");
                process::exit(1);
            }
        };

        if !cli.quiet {
            let summary = solved.summary(cfg.horizon.step_hours);
            println!("TES {tes_kwh:>12.0} kWh  {mode}  {summary}");
        }

        if let Some(dir) = &cli.out_dir {
            let label = format!("{}TES={tes_kwh:.0}kWh_{}_", cli.label, mode.label());
            match export_solution_csv(&solved, Path::new(dir), &label) {
                Ok(path) => info!(path = %path.display(), "schedule saved"),
                Err(e) => {
                    eprintln!("error: cannot save schedule: {e}");
                    process::exit(1);
                }
            }
        }
    }
}
