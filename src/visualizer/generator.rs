use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::PI;
use std::sync::Arc;

use super::color::gradient;
use super::frame::{BarFrame, Rgb};
use super::history::HistoryBuffer;
use crate::playback::clock::Clock;

const ENERGY_ATTACK: f32 = 0.05;
const ENERGY_RELEASE: f32 = 0.1;
/// Clock seconds between beat counter increments
const BEAT_INTERVAL: f64 = 0.5;
const MIN_PLAYING_HEIGHT: f32 = 0.05;
const NEIGHBOR_BLEND: f32 = 0.3;
const DROP_CHANCE: f32 = 0.02;
const SWEEP_CHANCE: f32 = 0.01;
const SMOOTHING_PLAYING: f32 = 0.85;
const SMOOTHING_IDLE: f32 = 0.7;

/// Beat accent for bar `i` of `n`: every 4th beat lifts the low quarter,
/// other even beats lift the middle.
fn rhythm_accent(beat: u64, i: usize, n: usize) -> f32 {
    let x = i as f32 / n as f32;
    if beat % 4 == 0 {
        if i < n / 4 { 0.4 * (1.0 - x) } else { 0.0 }
    } else if beat % 2 == 0 {
        0.3 * (-8.0 * (x - 0.5).powi(2)).exp()
    } else {
        0.0
    }
}

/// Produces pseudo-spectrum bar heights from play state and elapsed time.
///
/// Nothing here looks at audio samples. Randomness (noise, drop and sweep
/// events) comes from the injected `rng`, so a fixed seed and clock give a
/// reproducible sequence.
pub struct SignalGenerator<R = StdRng> {
    num_bars: usize,
    rng: R,
    clock: Arc<dyn Clock>,
    energy: f32,
    beat_counter: u64,
    last_beat: f64,
    history: HistoryBuffer,
    visible: Vec<f32>,
    colors: Arc<[Rgb]>,
}

impl<R: Rng> SignalGenerator<R> {
    pub fn new(num_bars: usize, rng: R, clock: Arc<dyn Clock>) -> Self {
        let last_beat = clock.now();
        Self {
            num_bars,
            rng,
            clock,
            energy: 0.0,
            beat_counter: 0,
            last_beat,
            history: HistoryBuffer::new(),
            visible: vec![0.0; num_bars],
            colors: gradient(num_bars).into(),
        }
    }

    /// Advance one tick and return the smoothed, visible frame.
    pub fn generate(&mut self, is_playing: bool, is_paused: bool, volume: f32) -> BarFrame {
        let active = is_playing && !is_paused;
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };

        let target = if active {
            self.energy = (self.energy + ENERGY_ATTACK).min(1.0);
            self.playing_target(volume)
        } else {
            self.energy = (self.energy - ENERGY_RELEASE).max(0.0);
            vec![0.0; self.num_bars]
        };

        self.history.push(target);
        let averaged = self.history.weighted_average(self.num_bars);

        let factor = if active { SMOOTHING_PLAYING } else { SMOOTHING_IDLE };
        for (v, &a) in self.visible.iter_mut().zip(averaged.iter()) {
            *v = factor * *v + (1.0 - factor) * a;
        }

        BarFrame {
            intensities: self.visible.clone(),
            colors: self.colors.clone(),
        }
    }

    fn playing_target(&mut self, volume: f32) -> Vec<f32> {
        let now = self.clock.now();
        if now - self.last_beat >= BEAT_INTERVAL {
            self.beat_counter += 1;
            self.last_beat = now;
        }

        let n = self.num_bars;
        let t = (now * 2.0) as f32;
        let mut target = vec![0.0f32; n];

        for i in 0..n {
            let x = i as f32 / n as f32;

            let wave1 = 0.6 * (t * 1.5 + x * 6.0 * PI).sin();
            let wave2 = 0.3 * (t * 0.8 + x * 12.0 * PI + 1.3).sin();
            let wave3 = 0.2 * (t * 3.2 + x * 24.0 * PI + 2.7).sin();

            // Gaussian bump centered on the middle bar
            let envelope = (-4.0 * (x - 0.5).powi(2)).exp();

            let rhythm = rhythm_accent(self.beat_counter, i, n);

            // Higher bars get more jitter
            let noise = self.standard_normal() * (0.1 + x * 0.2) * 0.3;

            let mut height = (wave1 + wave2 + wave3) * envelope + rhythm + noise;
            height = (height + 1.0) / 2.0;
            height *= self.energy * volume;

            if i > 0 {
                height = (1.0 - NEIGHBOR_BLEND) * height + NEIGHBOR_BLEND * target[i - 1];
            }
            target[i] = height.clamp(MIN_PLAYING_HEIGHT, 1.0);
        }

        if self.rng.gen::<f32>() < DROP_CHANCE {
            let strength = self.rng.gen_range(0.3f32..0.7);
            for (j, v) in target.iter_mut().enumerate() {
                let lift = strength * (1.0 - (j as f32 / n as f32 - 0.5).abs());
                *v = (*v + lift).min(1.0);
            }
        }

        if self.rng.gen::<f32>() < SWEEP_CHANCE {
            let sweep_pos = (now * 4.0).rem_euclid(1.0);
            let center = ((sweep_pos * n as f64) as usize).min(n.saturating_sub(1));
            for j in center.saturating_sub(2)..(center + 3).min(n) {
                let distance = j.abs_diff(center) as f32 / 2.0;
                target[j] = (target[j] + 0.5 * (1.0 - distance)).min(1.0);
            }
        }

        target
    }

    /// Box-Muller sample from N(0, 1).
    fn standard_normal(&mut self) -> f32 {
        let u1 = 1.0 - self.rng.gen::<f32>();
        let u2 = self.rng.gen::<f32>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    #[allow(dead_code)]
    pub fn colors(&self) -> &Arc<[Rgb]> {
        &self.colors
    }

    #[allow(dead_code)]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[allow(dead_code)]
    pub fn beat_counter(&self) -> u64 {
        self.beat_counter
    }

    /// Most recent unsmoothed target frame.
    #[allow(dead_code)]
    pub fn last_target(&self) -> Option<&[f32]> {
        self.history.latest()
    }
}
