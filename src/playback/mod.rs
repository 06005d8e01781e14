pub mod clock;
pub mod poller;
pub mod probe;
pub mod tracker;
pub mod transport;

use self::tracker::PositionTracker;

/// Playback state shared between the session (sole writer) and the
/// background loops (readers).
pub struct PlayerState {
    pub tracker: PositionTracker,
    /// Output volume, 0.0-1.0
    pub volume: f32,
}

impl PlayerState {
    pub fn new(tracker: PositionTracker, volume: f32) -> Self {
        Self {
            tracker,
            volume: volume.clamp(0.0, 1.0),
        }
    }
}
