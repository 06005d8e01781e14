use std::sync::Arc;

use super::clock::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// Derives the playback position from wall-clock deltas.
///
/// Nothing is accumulated per tick: every read recomputes `now - start_ref`,
/// so a late or skipped poll can never make the position drift.
pub struct PositionTracker {
    clock: Arc<dyn Clock>,
    state: PlaybackState,
    /// Clock time at which position 0 would have been played
    start_ref: f64,
    /// Position reported while paused or idle
    paused_at: f64,
    duration: f64,
}

impl PositionTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: PlaybackState::Idle,
            start_ref: 0.0,
            paused_at: 0.0,
            duration: 0.0,
        }
    }

    pub fn start(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.start_ref = self.clock.now();
        self.paused_at = 0.0;
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.paused_at = self.position();
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused && self.duration > 0.0 {
            self.start_ref = self.clock.now() - self.paused_at;
            self.state = PlaybackState::Playing;
        }
    }

    pub fn stop(&mut self) {
        self.paused_at = 0.0;
        self.start_ref = self.clock.now();
        self.state = PlaybackState::Idle;
    }

    /// Jump to `position` seconds, clamped to the track. Takes effect on the
    /// next read in every state.
    pub fn seek(&mut self, position: f64) {
        if position.is_nan() {
            return;
        }
        let position = position.clamp(0.0, self.duration);
        self.start_ref = self.clock.now() - position;
        self.paused_at = position;
    }

    pub fn position(&self) -> f64 {
        match self.state {
            PlaybackState::Playing => {
                (self.clock.now() - self.start_ref).clamp(0.0, self.duration)
            }
            PlaybackState::Paused | PlaybackState::Idle => self.paused_at,
        }
    }

    /// Position as a percentage of the duration (0-100).
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.position() / self.duration * 100.0
    }

    #[allow(dead_code)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::clock::ManualClock;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn tracker() -> (Arc<ManualClock>, PositionTracker) {
        let clock = Arc::new(ManualClock::new(1000.0));
        let tracker = PositionTracker::new(clock.clone());
        (clock, tracker)
    }

    #[test]
    fn start_pause_resume_scenario() {
        let (clock, mut t) = tracker();
        t.start(200.0);

        clock.advance(50.0);
        assert!((t.position() - 50.0).abs() < EPS);

        t.pause();
        clock.advance(20.0);
        assert!((t.position() - 50.0).abs() < EPS);

        t.resume();
        clock.advance(10.0);
        assert!((t.position() - 60.0).abs() < EPS);
    }

    #[test]
    fn seek_near_end_reports_progress() {
        let (_clock, mut t) = tracker();
        t.start(200.0);
        t.seek(190.0);
        assert!((t.progress() - 95.0).abs() < EPS);
    }

    #[test]
    fn pause_then_resume_keeps_position() {
        let (clock, mut t) = tracker();
        t.start(120.0);
        clock.advance(33.3);
        let before = t.position();
        t.pause();
        t.resume();
        assert!((t.position() - before).abs() < EPS);
    }

    #[test]
    fn position_is_capped_at_duration() {
        let (clock, mut t) = tracker();
        t.start(10.0);
        clock.advance(25.0);
        assert_eq!(t.position(), 10.0);
        assert_eq!(t.progress(), 100.0);
    }

    #[test]
    fn progress_is_non_decreasing_while_playing() {
        let (clock, mut t) = tracker();
        t.start(30.0);
        let mut last = t.progress();
        for _ in 0..400 {
            clock.advance(0.1);
            let p = t.progress();
            assert!(p >= last);
            assert!(p <= 100.0);
            last = p;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn seek_while_paused_is_visible_immediately() {
        let (clock, mut t) = tracker();
        t.start(100.0);
        clock.advance(5.0);
        t.pause();
        t.seek(42.0);
        assert!((t.position() - 42.0).abs() < EPS);

        t.resume();
        clock.advance(1.0);
        assert!((t.position() - 43.0).abs() < EPS);
    }

    #[test]
    fn seek_clamps_to_track_bounds() {
        let (_clock, mut t) = tracker();
        t.start(60.0);
        t.seek(-5.0);
        assert_eq!(t.position(), 0.0);
        t.seek(500.0);
        assert_eq!(t.position(), 60.0);
        t.seek(f64::NAN);
        assert_eq!(t.position(), 60.0);
    }

    #[test]
    fn stop_resets_to_idle() {
        let (clock, mut t) = tracker();
        t.start(60.0);
        clock.advance(12.0);
        t.stop();
        assert_eq!(t.state(), PlaybackState::Idle);
        assert_eq!(t.position(), 0.0);

        // resume only applies to a paused track
        t.resume();
        assert_eq!(t.state(), PlaybackState::Idle);
    }

    #[test]
    fn pause_is_noop_when_idle() {
        let (_clock, mut t) = tracker();
        t.pause();
        assert_eq!(t.state(), PlaybackState::Idle);
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn zero_duration_is_guarded() {
        let (clock, mut t) = tracker();
        t.start(0.0);
        clock.advance(3.0);
        assert_eq!(t.position(), 0.0);
        assert_eq!(t.progress(), 0.0);

        t.pause();
        t.resume();
        assert_eq!(t.state(), PlaybackState::Paused);
    }

    #[test]
    fn negative_duration_is_treated_as_zero() {
        let (_clock, mut t) = tracker();
        t.start(-4.0);
        assert_eq!(t.duration(), 0.0);
        assert_eq!(t.progress(), 0.0);
    }

    proptest! {
        #[test]
        fn seek_then_read_returns_target(
            duration in 0.1f64..10_000.0,
            frac in 0.0f64..=1.0,
            paused in any::<bool>(),
        ) {
            let (_clock, mut t) = tracker();
            t.start(duration);
            if paused {
                t.pause();
            }
            let target = duration * frac;
            t.seek(target);
            prop_assert!((t.position() - target).abs() < 1e-6);
        }
    }
}
