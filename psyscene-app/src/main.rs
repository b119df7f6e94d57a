use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use psyscene_render::{OffscreenSurface, load_font};
use psyscene_scene::Context;
use psyscene_timing::HighPrecisionTimer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

mod config;
mod session;
mod sim;
mod window;

use config::SessionConfig;
use sim::{IdlePointer, SimulatedKeyboard};
use window::WindowSurface;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reaction-time session built from scenes", long_about = None)]
struct Cli {
    /// TOML session configuration; defaults apply to missing fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run offscreen with a simulated participant instead of opening a window.
    #[arg(long)]
    simulate: bool,

    /// Where to write the result rows.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for trial randomisation.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        simulate = cli.simulate,
        seed,
        trials = config.trials,
        "starting session"
    );

    let timer = HighPrecisionTimer::new();
    let ctx = if cli.simulate {
        let sim = &config.simulation;
        let surface = OffscreenSurface::new(sim.width, sim.height, sim.refresh_rate, timer.clone())?;
        let keyboard = SimulatedKeyboard::new(timer.clone(), sim, seed.wrapping_add(1));
        Context::new(surface, keyboard, IdlePointer, timer)
    } else {
        let (surface, keyboard, pointer) = WindowSurface::open(timer.clone())?;
        Context::new(surface, keyboard, pointer, timer)
    };
    let ctx = match &config.font_path {
        Some(path) => ctx.with_font(load_font(path)?),
        None => ctx,
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let summary = session::run(&ctx, &config, &mut rng)?;
    summary.log();
    ctx.save_results(&config.output)?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
