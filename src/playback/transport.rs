use std::path::{Path, PathBuf};

use crate::error::TransportError;

pub type Result<T> = std::result::Result<T, TransportError>;

/// Audio output collaborator. The session drives it alongside the tracker;
/// nothing in the core reads audio back from it.
pub trait Transport: Send {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    fn is_busy(&self) -> bool;
    fn seek(&mut self, position: f64) -> Result<()>;
}

/// Silent transport: keeps load/play/pause bookkeeping but emits no sound.
#[derive(Debug, Default)]
pub struct NullTransport {
    loaded: Option<PathBuf>,
    playing: bool,
    paused: bool,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for NullTransport {
    fn load(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(TransportError::Load {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.playing = false;
        self.paused = false;
        log::debug!("Transport loaded {}", path.display());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(TransportError::NothingLoaded);
        }
        self.playing = true;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    fn unpause(&mut self) {
        self.paused = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
    }

    /// Busy means actively producing audio, so a paused track is not busy.
    fn is_busy(&self) -> bool {
        self.playing && !self.paused
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        if self.loaded.is_none() {
            return Err(TransportError::NothingLoaded);
        }
        if !position.is_finite() || position < 0.0 {
            return Err(TransportError::InvalidSeek(position));
        }
        Ok(())
    }
}
