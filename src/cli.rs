use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cardamomo",
    about = "Terminal music player with a synthetic bar visualizer"
)]
pub struct Cli {
    /// Audio files or folders to add to the playlist
    pub inputs: Vec<PathBuf>,

    /// Number of visualizer bars
    #[arg(long, default_value_t = 32)]
    pub bars: usize,

    /// Visualizer frames per second
    #[arg(long, default_value_t = 20)]
    pub fps: u32,

    /// Position updates per second
    #[arg(long, default_value_t = 10)]
    pub poll_hz: u32,

    /// Initial volume (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    pub volume: f32,

    /// Seed for the visualizer's noise and shuffle order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pick the next track at random
    #[arg(long)]
    pub shuffle: bool,

    /// Replay the current track when it ends
    #[arg(long)]
    pub repeat: bool,

    /// Playlist cache file (default: ~/.cardamomo_playlist.json)
    #[arg(long)]
    pub playlist: Option<PathBuf>,

    /// Empty the saved playlist before adding inputs
    #[arg(long)]
    pub clear: bool,

    /// Print the playlist and exit
    #[arg(long)]
    pub list: bool,

    /// Config file (default: ./cardamomo.toml or ~/.config/cardamomo/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
