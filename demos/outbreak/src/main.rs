//! outbreak — the reference scenario of the epi outbreak simulator.
//!
//! 100 agents in the unit square, one seed infection at the centre, social
//! distancing on, run until the outbreak has burned out (or 500 ticks).
//!
//! ```text
//! outbreak [CONFIG.json] [OUTPUT_DIR]
//! ```
//!
//! `CONFIG.json` is an `EpiConfig`; any field it omits keeps its default.
//! Without it, the defaults run with a snapshot every 10 ticks.
//! Set `RUST_LOG=debug` to log every tick.

use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use epi_core::EpiConfig;
use epi_output::{CsvWriter, SimOutputObserver};
use epi_sim::{SimBuilder, TimeSeries};


const DEFAULT_OUTPUT_DIR: &str = "output/outbreak";
/// Snapshot cadence of the built-in scenario.
const DEMO_SNAPSHOT_INTERVAL: u64 = 10;

fn load_config(path: &Path) -> Result<EpiConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// The built-in scenario: defaults plus periodic snapshots.
fn demo_config() -> EpiConfig {
    let mut config = EpiConfig::default();
    config.run.snapshot_interval_ticks = DEMO_SNAPSHOT_INTERVAL;
    config
}

fn print_summary(series: &TimeSeries, elapsed_secs: f64) {
    let Some(last) = series.final_record() else {
        return;
    };
    let (contact, environment) = series.exposures_by_channel();
    let (peak_tick, peak) = series.peak_infectious().unwrap_or_default();

    println!("Simulation complete in {elapsed_secs:.3} s ({} ticks)", last.tick.0);
    println!("  ever infected  : {}", series.ever_infected());
    println!("  peak infectious: {peak} at {peak_tick}");
    println!("  exposures      : {contact} by contact, {environment} via the environment");
    println!();
    println!("{:<12} {:>6}", "State", "Final");
    println!("{}", "-".repeat(19));
    for (name, n) in [
        ("susceptible", last.susceptible),
        ("exposed", last.exposed),
        ("infectious", last.infectious),
        ("recovered", last.recovered),
        ("deceased", last.deceased),
    ] {
        println!("{name:<12} {n:>6}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => demo_config(),
    };
    let out_dir = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from);

    println!("=== outbreak — epi outbreak simulator ===");
    println!(
        "Agents: {}  |  Max ticks: {}  |  Seed: {}",
        config.population.size, config.run.max_ticks, config.run.seed
    );
    println!();

    // 1. Build sim.
    let mut sim = SimBuilder::standard(config)?.build()?;

    // 2. Set up output.
    let writer = CsvWriter::new(&out_dir)?;
    let mut obs = SimOutputObserver::new(writer);

    // 3. Run.
    let t0 = Instant::now();
    let series = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        return Err(e).context("writing CSV output");
    }

    // 4. Summary.
    let summary_path = out_dir.join("series.json");
    fs::write(&summary_path, serde_json::to_vec_pretty(&series)?)?;
    info!(dir = %out_dir.display(), records = series.len(), "output written");

    print_summary(&series, elapsed.as_secs_f64());
    Ok(())
}
