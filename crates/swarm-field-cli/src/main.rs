use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use swarm_field_core::{SimConfig, Simulation};
use tracing::info;

/// Run the swarm field simulation headless and write a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "swarm-field", version)]
struct Args {
    /// JSON file of `SimConfig` fields; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated wall-clock seconds to run.
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Host frame rate driving the tick loop.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Playback speed multiplier (the UI offers 1, 2 and 4).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Sample metrics every N frames.
    #[arg(long, default_value_t = 60)]
    sample_every: usize,

    #[arg(long)]
    drones: Option<usize>,

    #[arg(long)]
    grid: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Include the final snapshot (drones and grid) in the output.
    #[arg(long)]
    snapshot: bool,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(drones) = args.drones {
        config.drone_count = drones;
    }
    if let Some(grid) = args.grid {
        config.grid_resolution = grid;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be positive"
    );
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be non-negative"
    );

    let config = load_config(&args)?;
    let mut sim = Simulation::new(config).context("building simulation")?;

    let frames = (args.seconds * args.fps).round() as usize;
    let frame_dt = 1.0 / args.fps;
    info!(
        frames,
        frame_dt,
        speed = args.speed,
        drones = sim.config().drone_count,
        "starting headless run"
    );
    let summary = sim
        .try_run_headless(frames, frame_dt, args.speed, args.sample_every)
        .context("running simulation")?;
    info!(
        area = summary.final_stats.total_area_covered,
        pest_reduction = summary.final_stats.pest_reduction,
        cost_savings = summary.final_stats.cost_savings,
        mean_density = summary.final_field.mean_density,
        "run complete"
    );

    let mut output = serde_json::to_value(&summary)?;
    if args.snapshot {
        output["snapshot"] = serde_json::to_value(sim.snapshot())?;
    }
    let text = serde_json::to_string_pretty(&output)?;
    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("writing summary to {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}
