//! Synthetic bar visualizer.
//!
//! The bars are cosmetic: they are shaped from sinusoids, a Gaussian
//! envelope, a wall-clock beat counter and seeded noise. No audio samples
//! are analyzed.

pub mod animation;
pub mod color;
pub mod frame;
pub mod generator;
pub mod history;

/// Bars drawn by default
pub const DEFAULT_BARS: usize = 32;
