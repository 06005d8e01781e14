use std::collections::VecDeque;

/// Frames kept for temporal smoothing
pub const HISTORY_LEN: usize = 5;

/// Weights applied most-recent first
pub const HISTORY_WEIGHTS: [f32; HISTORY_LEN] = [0.4, 0.3, 0.15, 0.1, 0.05];

/// Bounded FIFO of recent target frames. Pushing past capacity evicts the
/// oldest frame.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    frames: VecDeque<Vec<f32>>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn push(&mut self, frame: Vec<f32>) {
        if self.frames.len() == HISTORY_LEN {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn latest(&self) -> Option<&[f32]> {
        self.frames.back().map(Vec::as_slice)
    }

    /// Weighted sum of the buffered frames. Weights are not renormalized, so
    /// until the buffer fills the average ramps up from below.
    pub fn weighted_average(&self, num_bars: usize) -> Vec<f32> {
        let mut avg = vec![0.0f32; num_bars];
        for (frame, &w) in self.frames.iter().rev().zip(HISTORY_WEIGHTS.iter()) {
            for (a, &v) in avg.iter_mut().zip(frame.iter()) {
                *a += v * w;
            }
        }
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut history = HistoryBuffer::new();
        for i in 0..7 {
            history.push(vec![i as f32]);
        }
        assert_eq!(history.len(), HISTORY_LEN);
        assert_eq!(history.latest(), Some(&[6.0][..]));

        // frames 2..=6 remain; most recent gets the heaviest weight
        let avg = history.weighted_average(1)[0];
        let expected = 6.0 * 0.4 + 5.0 * 0.3 + 4.0 * 0.15 + 3.0 * 0.1 + 2.0 * 0.05;
        assert!((avg - expected).abs() < 1e-5);
    }

    #[test]
    fn full_buffer_of_constant_frames_averages_to_constant() {
        let mut history = HistoryBuffer::new();
        for _ in 0..HISTORY_LEN {
            history.push(vec![0.5; 4]);
        }
        for v in history.weighted_average(4) {
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn partial_buffer_uses_leading_weights() {
        let mut history = HistoryBuffer::new();
        history.push(vec![1.0, 1.0]);
        history.push(vec![0.0, 2.0]);
        let avg = history.weighted_average(2);
        assert!((avg[0] - 0.3).abs() < 1e-6);
        assert!((avg[1] - (2.0 * 0.4 + 0.3)).abs() < 1e-6);
    }

    #[test]
    fn empty_buffer_is_all_zero() {
        let history = HistoryBuffer::new();
        assert!(history.latest().is_none());
        assert_eq!(history.weighted_average(3), vec![0.0; 3]);
    }
}
