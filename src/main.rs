mod cli;
mod config;
mod error;
mod playback;
mod playlist;
mod render;
mod session;
mod visualizer;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use cli::Cli;
use playback::clock::{Clock, SystemClock};
use playback::probe::probe_duration;
use playback::transport::NullTransport;
use playlist::Playlist;
use render::terminal::{format_time, TerminalSurface};
use session::input::spawn_stdin_reader;
use session::{Session, SessionOptions};
use visualizer::animation::DEFAULT_FPS;
use visualizer::DEFAULT_BARS;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect cardamomo.toml / global config
    let config_path = cli.config.clone().or_else(config::find_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.bars == DEFAULT_BARS { cli.bars = cfg.visualizer.bars; }
            if cli.fps == DEFAULT_FPS { cli.fps = cfg.visualizer.fps; }
            if cli.seed.is_none() { cli.seed = cfg.visualizer.seed; }
            if cli.volume == 1.0 { cli.volume = cfg.playback.volume; }
            if cli.poll_hz == 10 { cli.poll_hz = cfg.playback.poll_hz; }
            if !cli.shuffle { cli.shuffle = cfg.playback.shuffle; }
            if !cli.repeat { cli.repeat = cfg.playback.repeat; }
            if cli.playlist.is_none() { cli.playlist = cfg.playlist.path; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let cache_path = cli.playlist.clone().unwrap_or_else(playlist::default_cache_path);
    let mut playlist = Playlist::load(&cache_path);
    if cli.clear {
        log::info!("Clearing playlist");
        playlist.clear();
    }

    for input in &cli.inputs {
        if input.is_dir() {
            playlist
                .add_folder(input, probe_duration)
                .with_context(|| format!("Failed to scan folder: {}", input.display()))?;
        } else if input.is_file() {
            if !playlist.add(input, probe_duration) {
                log::info!("Already in playlist: {}", input.display());
            }
        } else {
            anyhow::bail!("Input not found: {}", input.display());
        }
    }

    if !cli.inputs.is_empty() || cli.clear || cli.list {
        if let Err(err) = playlist.save() {
            log::warn!("Failed to save playlist: {}", err);
        }
    }

    if cli.list {
        for (i, track) in playlist.tracks().iter().enumerate() {
            println!("{:>3}  {:<40} {}", i, track.name, format_time(track.duration));
        }
        return Ok(());
    }

    if playlist.is_empty() {
        anyhow::bail!("Playlist is empty. Pass audio files or folders to add them.");
    }
    if cli.bars == 0 {
        anyhow::bail!("--bars must be at least 1");
    }

    let seed = cli.seed.unwrap_or_else(rand::random);

    log::info!("cardamomo - terminal player (silent transport)");
    log::info!("Playlist: {} ({} tracks)", cache_path.display(), playlist.len());
    log::info!("Seed: {}", seed);
    log::info!("Commands: p, n, b, s <secs>, %<pct>, v <0-1>, shuffle, repeat, q");

    let options = SessionOptions {
        bars: cli.bars,
        fps: cli.fps,
        poll_hz: cli.poll_hz,
        volume: cli.volume,
        seed,
        shuffle: cli.shuffle,
        repeat: cli.repeat,
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let mut session = Session::new(NullTransport::new(), playlist, clock, options);

    session.start_loops()?;
    spawn_stdin_reader(session.sender()).context("Failed to spawn input reader")?;
    session.play_track(0);

    let mut surface = TerminalSurface::new();
    session.run(&mut surface)?;
    drop(surface);

    log::info!("Shutting down ({} tracks)", session.playlist().len());
    session.shutdown();
    Ok(())
}
