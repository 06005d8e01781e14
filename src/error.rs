use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an audio transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Track file does not exist or cannot be read
    #[error("Cannot load track {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// Command needs a loaded track
    #[error("No track loaded")]
    NothingLoaded,

    /// Seek target is not a finite, non-negative position
    #[error("Invalid seek position: {0}")]
    InvalidSeek(f64),
}

/// Errors raised while reading or writing the playlist cache
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Playlist I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Playlist JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
