use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::visualizer::animation::DEFAULT_FPS;
use crate::visualizer::DEFAULT_BARS;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
}

#[derive(Debug, Deserialize)]
pub struct VisualizerConfig {
    #[serde(default = "default_bars")]
    pub bars: usize,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_poll_hz")]
    pub poll_hz: u32,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            bars: default_bars(),
            fps: default_fps(),
            seed: None,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            poll_hz: default_poll_hz(),
            shuffle: false,
            repeat: false,
        }
    }
}

fn default_bars() -> usize { DEFAULT_BARS }
fn default_fps() -> u32 { DEFAULT_FPS }
fn default_volume() -> f32 { 1.0 }
fn default_poll_hz() -> u32 { 10 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// `./cardamomo.toml`, then `~/.config/cardamomo/config.toml`, then the
/// platform config dir.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("cardamomo.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("cardamomo").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("cardamomo").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
