use crossbeam_channel::{Sender, TrySendError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::PlayerState;
use crate::session::message::UiMessage;

/// Publishes the tracker position to the UI queue at a fixed rate while a
/// track is playing. Read-only with respect to playback state.
pub fn spawn(
    state: Arc<RwLock<PlayerState>>,
    tx: Sender<UiMessage>,
    running: Arc<AtomicBool>,
    rate_hz: u32,
) -> std::io::Result<JoinHandle<()>> {
    let interval = Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64);

    thread::Builder::new()
        .name("position-poller".into())
        .spawn(move || {
            log::debug!("Position poller started ({} Hz)", rate_hz);
            while running.load(Ordering::Acquire) {
                let update = {
                    let state = state.read();
                    state.tracker.is_playing().then(|| UiMessage::Position {
                        position: state.tracker.position(),
                        duration: state.tracker.duration(),
                    })
                };

                if let Some(msg) = update {
                    if let Err(TrySendError::Disconnected(_)) = tx.try_send(msg) {
                        break;
                    }
                }
                thread::sleep(interval);
            }
            log::debug!("Position poller stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::clock::ManualClock;
    use crate::playback::tracker::PositionTracker;
    use crossbeam_channel::bounded;

    #[test]
    fn publishes_only_while_playing_and_stops_on_flag() {
        let clock = Arc::new(ManualClock::new(0.0));
        let state = Arc::new(RwLock::new(PlayerState::new(
            PositionTracker::new(clock.clone()),
            1.0,
        )));
        let (tx, rx) = bounded(256);
        let running = Arc::new(AtomicBool::new(true));

        let handle = spawn(state.clone(), tx, running.clone(), 200).unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "idle tracker must not publish");

        {
            let mut state = state.write();
            state.tracker.start(100.0);
            clock.advance(7.0);
        }

        let msg = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        match msg {
            UiMessage::Position { position, duration } => {
                assert!((position - 7.0).abs() < 1e-9);
                assert_eq!(duration, 100.0);
            }
            other => panic!("unexpected message {:?}", other),
        }

        running.store(false, Ordering::Release);
        handle.join().unwrap();
    }
}
