//! Coin Chase - headless driver for the spawn and match core.
//!
//! Walks the player along a scripted loop through the arena, ticking the
//! session at a fixed frame rate, and prints the final state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chase::config::{GameConfig, PlacementBackend};
use chase::hud::LogPresenter;
use chase::session::ChaseSession;
use chase::MatchState;
use clap::{Parser, ValueEnum};
use engine_core::DVec3;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Raycast,
    NavGrid,
}

impl From<Backend> for PlacementBackend {
    fn from(value: Backend) -> Self {
        match value {
            Backend::Raycast => PlacementBackend::Raycast,
            Backend::NavGrid => PlacementBackend::NavGrid,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Config file (default: ./config.ron, or built-in defaults if missing).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames to simulate.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,
    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
    /// Override the spawn seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the placement backend.
    #[arg(long, value_enum)]
    backend: Option<Backend>,
    /// Radius of the player's scripted loop.
    #[arg(long, default_value_t = 25.0)]
    path_radius: f64,
    /// Player speed along the loop, units per second.
    #[arg(long, default_value_t = 6.0)]
    speed: f64,
    /// Signal a capture at this simulation time (seconds).
    #[arg(long)]
    catch_at: Option<f64>,
    /// After the match ends, reset and play again this many times.
    #[arg(long, default_value_t = 0)]
    rematches: u32,
    /// Write the effective config to ./config.ron and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load_from(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::load(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(backend) = cli.backend {
        config.placement.backend = backend.into();
    }
    config.validate().context("effective config")?;

    if cli.write_config {
        config.save();
        log::info!("Config written");
        return Ok(());
    }

    log::info!("Starting Coin Chase ({:?} placement)", config.placement.backend);
    let start = config.player_start.map(DVec3::from_array).unwrap_or(DVec3::ZERO);
    let mut session = ChaseSession::from_config(config, LogPresenter::default());

    let mut rounds_left = cli.rematches;
    loop {
        let mut distance = 0.0;
        for _ in 0..cli.ticks {
            let now = session.time().elapsed_seconds();
            if cli.catch_at.is_some_and(|t| now >= t) {
                session.on_player_contact();
            }
            if session.match_state() == MatchState::Ended {
                break;
            }

            distance += cli.speed * cli.dt;
            let angle = distance / cli.path_radius.max(1.0);
            let position = start + DVec3::new(angle.cos() - 1.0, 0.0, angle.sin()) * cli.path_radius;
            session.tick(cli.dt, Some(position));
        }

        let score = *session.machine().scoreboard();
        println!(
            "{:?} after {:.1}s | coins {} | exp {} | level {} | collectibles alive {} | adversaries {}",
            session.match_state(),
            session.machine().survival_seconds(),
            score.coins,
            score.experience,
            score.level(),
            session.active_collectibles(),
            session.adversary_count(),
        );
        let stats = session.spawner().stats();
        println!(
            "spawned {} | misses {} | refused {} | bursts {} | movement batches {} | respawns {}",
            stats.spawned,
            stats.misses,
            stats.refused,
            stats.bursts_accepted,
            stats.displacement_batches,
            stats.periodic_fires,
        );

        if rounds_left == 0 {
            break;
        }
        rounds_left -= 1;
        session.reset();
    }
    Ok(())
}
