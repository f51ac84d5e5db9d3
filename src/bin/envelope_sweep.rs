use std::path::PathBuf;

use clap::Parser;
use natops_perf::envelope::{EnvelopeRequest, weight_range};
use natops_perf::export::{summary, sweep};
use natops_perf::{Configuration, PerformanceEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Sweep the takeoff envelope over gross weight and export CSV/JSON"
)]
struct Cli {
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long)]
    policy: Option<PathBuf>,

    /// First gross weight (lbf)
    #[arg(long, default_value_t = 50_000.0)]
    start: f64,

    /// Last gross weight (lbf), inclusive
    #[arg(long, default_value_t = 74_000.0)]
    end: f64,

    #[arg(long, default_value_t = 2_000.0)]
    step: f64,

    #[arg(long, default_value_t = 0.0)]
    altitude: f64,

    #[arg(long, default_value_t = 0.25)]
    mach: f64,

    /// Fixed configuration; without it each weight follows the flap schedule
    #[arg(long)]
    config: Option<Configuration>,

    #[arg(long)]
    sweep: Option<f64>,

    #[arg(long, default_value_t = false)]
    allow_ab: bool,

    /// CSV destination, `-` for stdout
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Optional JSON summary path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let weights = weight_range(cli.start, cli.end, cli.step);
    if weights.is_empty() {
        anyhow::bail!(
            "empty weight range: start {} end {} step {}",
            cli.start,
            cli.end,
            cli.step
        );
    }

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
        .unwrap_or_else(|| Configuration::auto_for_weight(weights[0]));
    let mut base = EnvelopeRequest::new(weights[0], cli.altitude, cli.mach, configuration);
    if let Some(deg) = cli.sweep {
        base = base.with_sweep(deg);
    }
    let results = engine.sweep(&base, &weights, cli.config.is_none())?;

    let mut writer = sweep::writer_for_path(&cli.output)?;
    sweep::write_all(writer.as_mut(), &results)?;

    if let Some(path) = &cli.summary {
        let deck = cli.data_dir.join(natops_perf::ENGINE_DECK_FILE);
        let aero = cli.data_dir.join(natops_perf::AERO_POLARS_FILE);
        let policy = cli
            .policy
            .clone()
            .unwrap_or_else(|| cli.data_dir.join(natops_perf::POLICY_TOML_FILE));
        let meta = summary::Metadata {
            aircraft: "F-14",
            engine_deck: &deck.display().to_string(),
            aero_table: &aero.display().to_string(),
            policy: &policy.display().to_string(),
        };
        summary::write_summary(path, &meta, &results)?;
    }
    Ok(())
}
