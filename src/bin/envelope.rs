use std::path::PathBuf;

use clap::Parser;
use natops_perf::envelope::{EnvelopeRequest, EnvelopeResult};
use natops_perf::{Configuration, PerformanceEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Minimum takeoff power setting for one flight condition"
)]
struct Cli {
    /// Directory holding engine_deck.csv, aero_polars.csv and the policy document
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Policy document overriding the one in the data directory (TOML or YAML)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Gross weight (lbf)
    #[arg(long)]
    weight: f64,

    /// Pressure altitude (ft)
    #[arg(long, default_value_t = 0.0)]
    altitude: f64,

    #[arg(long, default_value_t = 0.25)]
    mach: f64,

    /// CLEAN, MANEUVER or FULL (defaults to the weight schedule)
    #[arg(long)]
    config: Option<Configuration>,

    /// Wing sweep in degrees (defaults to the automatic schedule)
    #[arg(long)]
    sweep: Option<f64>,

    /// Permit afterburner regardless of the policy document
    #[arg(long, default_value_t = false)]
    allow_ab: bool,

    /// Emit the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// List every evaluated setting
    #[arg(long, default_value_t = false)]
    trials: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let engine = PerformanceEngine::load(&cli.data_dir)?;
    let mut policy = match &cli.policy {
        Some(path) => natops_perf::config::load_policy(path)?,
        None => engine.policy().clone(),
    };
    if cli.allow_ab {
        policy.policy.allow_ab = true;
    }
    let engine = engine.with_policy(policy);

    let configuration = cli
        .config
        .unwrap_or_else(|| Configuration::auto_for_weight(cli.weight));
    let mut request = EnvelopeRequest::new(cli.weight, cli.altitude, cli.mach, configuration);
    if let Some(sweep) = cli.sweep {
        request = request.with_sweep(sweep);
    }

    let result = engine.solve(&request)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, cli.trials);
    }
    Ok(())
}

fn print_result(result: &EnvelopeResult, trials: bool) {
    let request = &result.request;
    println!(
        "Condition: {:.0} lbf, {:.0} ft, M{:.2}, {} (sweep {:.0} deg)",
        request.weight_lbf,
        request.altitude_ft,
        request.mach,
        request.configuration,
        result.sweep_deg
    );
    println!("RPM floor: {:.1}%", result.floor_pct);
    println!("Setting: {}", result.setting);
    println!(
        "Thrust: {:.0} lbf  RPM: {:.1}%  Fuel flow: {:.0} pph  Drag: {:.0} lbf",
        result.thrust_lbf, result.rpm_pct, result.fuel_flow_pph, result.drag_lbf
    );
    println!(
        "Climb gradient: AEO {:.0} ft/nm, OEI {:.0} ft/nm",
        result.aeo_gradient_ft_nm, result.oei_gradient_ft_nm
    );
    println!("Status: {}", result.status);

    if trials {
        println!("Trials:");
        for trial in &result.trials {
            println!(
                "  {:<14} thrust {:>7.0} lbf  AEO {:>6.0}  OEI {:>6.0}  {}",
                trial.setting.to_string(),
                trial.thrust_lbf,
                trial.aeo_gradient_ft_nm,
                trial.oei_gradient_ft_nm,
                if trial.meets_margins { "ok" } else { "short" }
            );
        }
    }
}
