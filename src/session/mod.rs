pub mod input;
pub mod message;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use self::message::{Command, UiMessage};
use crate::playback::clock::Clock;
use crate::playback::poller;
use crate::playback::tracker::PositionTracker;
use crate::playback::transport::Transport;
use crate::playback::PlayerState;
use crate::playlist::Playlist;
use crate::render::RenderSurface;
use crate::visualizer::animation::AnimationLoop;
use crate::visualizer::generator::SignalGenerator;

/// UI queue depth. Producers drop messages rather than wait when it fills.
const QUEUE_DEPTH: usize = 64;
/// A track counts as finished this close to its end
const END_MARGIN: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub bars: usize,
    pub fps: u32,
    pub poll_hz: u32,
    pub volume: f32,
    pub seed: u64,
    pub shuffle: bool,
    pub repeat: bool,
}

/// Owns everything a running player needs. All transport commands and all
/// tracker writes happen on the thread that calls [`Session::run`]; the
/// background loops only read shared state and enqueue messages.
pub struct Session<T: Transport> {
    state: Arc<RwLock<PlayerState>>,
    clock: Arc<dyn Clock>,
    transport: T,
    playlist: Playlist,
    options: SessionOptions,
    current: Option<usize>,
    rng: StdRng,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
    running: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
    status: Option<String>,
    closed: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(
        transport: T,
        playlist: Playlist,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        let tracker = PositionTracker::new(clock.clone());
        let state = Arc::new(RwLock::new(PlayerState::new(tracker, options.volume)));
        let (tx, rx) = bounded(QUEUE_DEPTH);

        Self {
            state,
            clock,
            transport,
            playlist,
            rng: StdRng::seed_from_u64(options.seed.wrapping_add(1)),
            options,
            current: None,
            tx,
            rx,
            running: Arc::new(AtomicBool::new(true)),
            workers: Vec::new(),
            status: None,
            closed: false,
        }
    }

    /// Spawn the position poller and the visualizer loop.
    pub fn start_loops(&mut self) -> Result<()> {
        let poller = poller::spawn(
            self.state.clone(),
            self.tx.clone(),
            self.running.clone(),
            self.options.poll_hz,
        )
        .context("Failed to spawn position poller")?;
        self.workers.push(poller);

        let generator = SignalGenerator::new(
            self.options.bars,
            StdRng::seed_from_u64(self.options.seed),
            self.clock.clone(),
        );
        let animation = AnimationLoop::new(generator, self.options.fps)
            .spawn(self.state.clone(), self.tx.clone(), self.running.clone())
            .context("Failed to spawn visualizer loop")?;
        self.workers.push(animation);

        log::info!(
            "Visualizer: {} synthetic bars @ {} fps (not derived from audio)",
            self.options.bars,
            self.options.fps
        );
        Ok(())
    }

    /// Queue handle for other producers (e.g. an input reader).
    pub fn sender(&self) -> Sender<UiMessage> {
        self.tx.clone()
    }

    /// Drain the UI queue until a quit command arrives.
    pub fn run(&mut self, surface: &mut impl RenderSurface) -> Result<()> {
        self.flush_status(surface);
        while let Ok(msg) = self.rx.recv() {
            let keep_going = self.handle(msg, surface);
            self.flush_status(surface);
            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    /// Apply one queued message. Returns `false` on quit.
    pub fn handle(&mut self, msg: UiMessage, surface: &mut impl RenderSurface) -> bool {
        match msg {
            UiMessage::Frame(frame) => surface.draw_bars(&frame),
            UiMessage::Position { position, duration } => {
                surface.show_position(position, duration);
                self.check_track_end();
            }
            UiMessage::Command(Command::Quit) => return false,
            UiMessage::Command(cmd) => self.apply(cmd),
        }
        true
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::PlayPause => self.play_pause(),
            Command::Next => self.next_track(),
            Command::Previous => self.previous_track(),
            Command::Seek(secs) => self.seek(secs),
            Command::SeekPercent(pct) => self.seek_percent(pct),
            Command::SetVolume(v) => self.set_volume(v),
            Command::ToggleShuffle => {
                self.options.shuffle = !self.options.shuffle;
                self.set_status(format!("Shuffle: {}", on_off(self.options.shuffle)));
            }
            Command::ToggleRepeat => {
                self.options.repeat = !self.options.repeat;
                self.set_status(format!("Repeat: {}", on_off(self.options.repeat)));
            }
            Command::Quit => {}
        }
    }

    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index).cloned() else {
            return;
        };

        if self.transport.is_busy() {
            self.transport.stop();
        }
        self.current = Some(index);
        self.state.write().tracker.start(track.duration);

        let started = self
            .transport
            .load(&track.path)
            .and_then(|()| self.transport.play());
        if let Err(err) = started {
            log::warn!("Cannot play {}: {}", track.name, err);
            self.state.write().tracker.stop();
            self.set_status(format!("Error playing {}", track.name));
            return;
        }

        log::info!("Playing [{}] {} ({:.1}s)", index, track.name, track.duration);
        self.set_status(format!("Playing {}", track.name));
    }

    pub fn play_pause(&mut self) {
        if self.playlist.is_empty() {
            self.set_status("Add music first".to_string());
            return;
        }

        let Some(index) = self.current else {
            self.play_track(0);
            return;
        };

        if self.state.read().tracker.is_paused() {
            self.transport.unpause();
            self.state.write().tracker.resume();
            self.set_status("Playing".to_string());
        } else if self.transport.is_busy() {
            self.transport.pause();
            self.state.write().tracker.pause();
            self.set_status("Paused".to_string());
        } else {
            self.play_track(index);
        }
    }

    pub fn next_track(&mut self) {
        if let Some(index) =
            self.playlist
                .next_index(self.current, self.options.shuffle, &mut self.rng)
        {
            self.play_track(index);
        }
    }

    pub fn previous_track(&mut self) {
        if let Some(index) =
            self.playlist
                .previous_index(self.current, self.options.shuffle, &mut self.rng)
        {
            self.play_track(index);
        }
    }

    /// Move to `secs`. The tracker always follows; a transport that rejects
    /// the seek is logged and otherwise ignored.
    pub fn seek(&mut self, secs: f64) {
        if self.current.is_none() {
            return;
        }
        let target = {
            let mut state = self.state.write();
            state.tracker.seek(secs);
            state.tracker.position()
        };
        if let Err(err) = self.transport.seek(target) {
            log::warn!("Transport seek to {:.1}s failed: {}", target, err);
        }
    }

    pub fn seek_percent(&mut self, pct: f64) {
        let duration = self.state.read().tracker.duration();
        if duration > 0.0 {
            self.seek(pct.clamp(0.0, 100.0) / 100.0 * duration);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };
        self.state.write().volume = volume;
        self.set_status(format!("Volume {:.0}%", volume * 100.0));
    }

    fn check_track_end(&mut self) {
        let finished = {
            let state = self.state.read();
            let tracker = &state.tracker;
            tracker.is_playing()
                && tracker.duration() > 0.0
                && tracker.position() >= tracker.duration() - END_MARGIN
        };
        if !finished {
            return;
        }

        match self.current {
            Some(index) if self.options.repeat => self.play_track(index),
            _ => self.next_track(),
        }
    }

    fn set_status(&mut self, status: String) {
        self.status = Some(status);
    }

    fn flush_status(&mut self, surface: &mut impl RenderSurface) {
        if let Some(status) = self.status.take() {
            surface.show_status(&status);
        }
    }

    #[allow(dead_code)]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &Arc<RwLock<PlayerState>> {
        &self.state
    }

    /// Stop the loops, let in-flight messages settle, then release the
    /// transport and persist the playlist. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.running.store(false, Ordering::Release);

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::warn!("Background loop panicked during shutdown");
            }
        }
        let dropped = self.rx.try_iter().count();
        log::debug!("Discarded {} queued UI messages", dropped);

        self.transport.stop();
        self.state.write().tracker.stop();

        if let Err(err) = self.playlist.save() {
            log::warn!("Failed to save playlist: {}", err);
        }
        log::info!("Session closed");
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
