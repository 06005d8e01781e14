use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One visualizer tick, ready for a rendering surface
#[derive(Clone, Debug)]
pub struct BarFrame {
    /// Bar heights, 0.0-1.0, low bars first
    pub intensities: Vec<f32>,
    /// Per-bar colors, shared by every frame of a generator
    pub colors: Arc<[Rgb]>,
}

impl BarFrame {
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_hex() {
        assert_eq!(Rgb::new(0, 204, 102).to_string(), "#00cc66");
        assert_eq!(Rgb::new(255, 0, 0).to_string(), "#ff0000");
    }
}
