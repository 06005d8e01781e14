pub mod scan;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PlaylistError;

const CACHE_FILE_NAME: &str = ".cardamomo_playlist.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
    /// Seconds, as reported by the duration probe
    pub duration: f64,
    /// Unix seconds when the track was added
    pub added: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlaylistFile {
    #[serde(default)]
    playlist: Vec<Track>,
    #[serde(default)]
    last_updated: f64,
    #[serde(default)]
    total_songs: usize,
}

/// Ordered track list persisted as JSON.
#[derive(Debug)]
pub struct Playlist {
    cache_path: PathBuf,
    tracks: Vec<Track>,
}

/// `~/.cardamomo_playlist.json`, or the working directory without a home.
pub fn default_cache_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_FILE_NAME)
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

impl Playlist {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            tracks: Vec::new(),
        }
    }

    /// Load the cache, dropping entries whose file no longer exists. A
    /// missing or unreadable cache yields an empty playlist.
    pub fn load(cache_path: impl Into<PathBuf>) -> Self {
        let mut playlist = Self::new(cache_path);
        if !playlist.cache_path.exists() {
            log::info!("No saved playlist at {}", playlist.cache_path.display());
            return playlist;
        }

        match playlist.read_cache() {
            Ok(tracks) => {
                let total = tracks.len();
                playlist.tracks = tracks.into_iter().filter(|t| t.path.exists()).collect();
                log::info!(
                    "Loaded playlist: {} tracks ({} missing files skipped)",
                    playlist.tracks.len(),
                    total - playlist.tracks.len()
                );
            }
            Err(err) => {
                log::warn!(
                    "Failed to load playlist from {}: {}",
                    playlist.cache_path.display(),
                    err
                );
            }
        }
        playlist
    }

    fn read_cache(&self) -> Result<Vec<Track>, PlaylistError> {
        let content = std::fs::read_to_string(&self.cache_path)?;
        let file: PlaylistFile = serde_json::from_str(&content)?;
        Ok(file.playlist)
    }

    pub fn save(&self) -> Result<(), PlaylistError> {
        let file = PlaylistFile {
            playlist: self.tracks.clone(),
            last_updated: unix_now(),
            total_songs: self.tracks.len(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.cache_path, json)?;
        log::info!("Saved playlist: {} tracks", self.tracks.len());
        Ok(())
    }

    /// Append a track unless its path is already listed.
    pub fn add(&mut self, path: &Path, probe: impl Fn(&Path) -> f64) -> bool {
        if self.tracks.iter().any(|t| t.path == path) {
            return false;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.tracks.push(Track {
            path: path.to_path_buf(),
            name,
            duration: probe(path),
            added: unix_now(),
        });
        true
    }

    /// Scan `dir` and add every new audio file. Returns how many were added.
    pub fn add_folder(
        &mut self,
        dir: &Path,
        probe: impl Fn(&Path) -> f64,
    ) -> Result<usize, PlaylistError> {
        let files = scan::scan_folder(dir)?;
        let added = files.iter().filter(|f| self.add(f, &probe)).count();
        log::info!(
            "Scanned {}: {} new, {} total",
            dir.display(),
            added,
            self.tracks.len()
        );
        Ok(added)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index after `current`, wrapping. Shuffle picks any index.
    pub fn next_index(
        &self,
        current: Option<usize>,
        shuffle: bool,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if shuffle {
            return Some(rng.gen_range(0..len));
        }
        Some(current.map_or(0, |i| (i + 1) % len))
    }

    /// Index before `current`, wrapping. Shuffle picks any index.
    pub fn previous_index(
        &self,
        current: Option<usize>,
        shuffle: bool,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if shuffle {
            return Some(rng.gen_range(0..len));
        }
        Some(current.map_or(len - 1, |i| (i + len - 1) % len))
    }
}
