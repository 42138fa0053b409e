//! Collision Sim entry point
//!
//! Runs the simulation headless at a capped tick rate and logs the HUD and
//! per-second physics counters. A windowed front end drives the same
//! `Simulation` API and draws `Simulation::visible()` instead.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use collision_sim::SimConfig;
use collision_sim::sim::{Simulation, TickInput, TickStats};
use collision_sim::view::Hud;

#[derive(Parser, Debug)]
#[command(version, about = "2D elastic collision simulation")]
struct Args {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of bodies
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Ticks to run (0 runs until killed)
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Don't sleep between ticks
    #[arg(long)]
    uncapped: bool,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(bodies) = args.bodies {
        config.num_bodies = bodies;
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

/// Running totals between log lines
#[derive(Default)]
struct Window {
    ticks: u64,
    candidate_pairs: usize,
    collisions: usize,
}

impl Window {
    fn add(&mut self, stats: &TickStats) {
        self.ticks += 1;
        self.candidate_pairs += stats.candidate_pairs;
        self.collisions += stats.collisions_resolved;
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Collision Sim (headless) starting...");

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut sim = Simulation::new(&config)?;

    let frame_time = Duration::from_secs_f64(1.0 / config.tick_rate_hz as f64);
    let cursor = sim.screen_size / 2.0;
    let input = TickInput {
        cursor,
        ..Default::default()
    };

    let mut hud = Hud::new();
    let mut window = Window::default();
    let start = Instant::now();
    let mut frame: u64 = 0;

    while args.ticks == 0 || frame < args.ticks {
        let frame_start = Instant::now();

        if let Some(stats) = sim.tick(&input) {
            window.add(&stats);
        }
        hud.update(&sim, cursor, start.elapsed().as_secs_f64());

        frame += 1;
        if frame % config.tick_rate_hz as u64 == 0 {
            log::info!("{}", hud.lines().join(" | "));
            if window.ticks > 0 {
                log::debug!(
                    "tick {}: {:.1} candidate pairs/tick, {:.2} collisions/tick, KE {:.1}",
                    sim.time_ticks,
                    window.candidate_pairs as f64 / window.ticks as f64,
                    window.collisions as f64 / window.ticks as f64,
                    sim.world.kinetic_energy()
                );
            }
            window = Window::default();
        }

        if !args.uncapped {
            // Cap the loop rate by sleeping off the rest of the frame
            if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    let border = sim.camera.world_border(sim.world.size);
    log::info!(
        "Done after {} ticks in {:.2}s; world border on screen at ({:.0}, {:.0}) size {:.0}x{:.0}",
        sim.time_ticks,
        start.elapsed().as_secs_f64(),
        border.min.x,
        border.min.y,
        border.size.x,
        border.size.y
    );
    Ok(())
}
