use crossbeam_channel::{Sender, TrySendError};
use parking_lot::RwLock;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::generator::SignalGenerator;
use crate::playback::PlayerState;
use crate::session::message::UiMessage;

/// Default visualizer tick rate
pub const DEFAULT_FPS: u32 = 20;

/// Background loop that samples the generator at a fixed cadence and hands
/// frames to the UI queue. It never waits for the renderer: when the queue
/// is full the frame is dropped.
pub struct AnimationLoop<R> {
    generator: SignalGenerator<R>,
    interval: Duration,
}

impl<R: Rng + Send + 'static> AnimationLoop<R> {
    pub fn new(generator: SignalGenerator<R>, fps: u32) -> Self {
        Self {
            generator,
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }

    /// Run one tick. Returns `false` once the UI side has hung up.
    fn tick(&mut self, state: &RwLock<PlayerState>, tx: &Sender<UiMessage>) -> bool {
        let (playing, paused, volume) = {
            let state = state.read();
            (state.tracker.is_playing(), state.tracker.is_paused(), state.volume)
        };

        let frame = self.generator.generate(playing, paused, volume);
        match tx.try_send(UiMessage::Frame(frame)) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn spawn(
        mut self,
        state: Arc<RwLock<PlayerState>>,
        tx: Sender<UiMessage>,
        running: Arc<AtomicBool>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("visualizer".into())
            .spawn(move || {
                log::debug!(
                    "Visualizer loop started ({:.0} fps, synthetic bars)",
                    1.0 / self.interval.as_secs_f64()
                );
                while running.load(Ordering::Acquire) {
                    if !self.tick(&state, &tx) {
                        break;
                    }
                    thread::sleep(self.interval);
                }
                log::debug!("Visualizer loop stopped");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::clock::{Clock, ManualClock};
    use crate::playback::tracker::PositionTracker;
    use crossbeam_channel::bounded;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shared_state(clock: Arc<dyn Clock>) -> Arc<RwLock<PlayerState>> {
        Arc::new(RwLock::new(PlayerState::new(PositionTracker::new(clock), 1.0)))
    }

    fn animation(clock: Arc<dyn Clock>, fps: u32) -> AnimationLoop<StdRng> {
        AnimationLoop::new(SignalGenerator::new(8, StdRng::seed_from_u64(0), clock), fps)
    }

    #[test]
    fn full_queue_drops_frames_without_blocking() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0.0));
        let state = shared_state(clock.clone());
        let (tx, rx) = bounded(1);
        let mut anim = animation(clock, 20);

        assert!(anim.tick(&state, &tx));
        assert!(anim.tick(&state, &tx));
        assert!(anim.tick(&state, &tx));
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn disconnected_queue_ends_loop() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0.0));
        let state = shared_state(clock.clone());
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut anim = animation(clock, 20);
        assert!(!anim.tick(&state, &tx));
    }

    #[test]
    fn frames_follow_tracker_state() {
        let clock = Arc::new(ManualClock::new(0.0));
        let state = shared_state(clock.clone());
        state.write().tracker.start(60.0);

        let (tx, rx) = bounded(64);
        let mut anim = animation(clock.clone(), 20);
        for _ in 0..40 {
            clock.advance(0.05);
            anim.tick(&state, &tx);
        }
        let frames: Vec<_> = rx.try_iter().collect();
        assert_eq!(frames.len(), 40);
        match frames.last() {
            Some(UiMessage::Frame(frame)) => {
                assert_eq!(frame.len(), 8);
                assert!(frame.intensities.iter().any(|&v| v > 0.05));
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn spawned_loop_stops_when_flag_clears() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0.0));
        let state = shared_state(clock.clone());
        let (tx, rx) = bounded(16);
        let running = Arc::new(AtomicBool::new(true));

        let handle = animation(clock, 200).spawn(state, tx, running.clone()).unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());

        running.store(false, Ordering::Release);
        handle.join().unwrap();
    }
}
