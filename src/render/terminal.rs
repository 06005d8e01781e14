use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;

use super::RenderSurface;
use crate::visualizer::frame::BarFrame;

const GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
/// Progress bar length; position is shown in per-mille of the track
const PROGRESS_STEPS: u64 = 1000;

/// Single-line terminal UI: colored bar row, elapsed/total time and a
/// progress bar, redrawn in place by indicatif.
pub struct TerminalSurface {
    pb: ProgressBar,
    status: String,
    bars: String,
}

impl TerminalSurface {
    pub fn new() -> Self {
        let pb = ProgressBar::new(PROGRESS_STEPS);
        let style = ProgressStyle::with_template(
            "{msg} {prefix} {bar:30.cyan/blue}",
        )
        .unwrap_or_else(|err| {
            log::warn!("Invalid progress template: {}", err);
            ProgressStyle::default_bar()
        })
        .progress_chars("=>-");
        pb.set_style(style);
        pb.set_prefix(format!("{} / {}", format_time(0.0), format_time(0.0)));

        Self {
            pb,
            status: String::new(),
            bars: String::new(),
        }
    }

    fn refresh_message(&self) {
        if self.status.is_empty() {
            self.pb.set_message(self.bars.clone());
        } else {
            self.pb.set_message(format!("{} {}", self.bars, self.status));
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}

impl RenderSurface for TerminalSurface {
    fn draw_bars(&mut self, frame: &BarFrame) {
        self.bars = bar_line(frame);
        self.refresh_message();
    }

    fn show_position(&mut self, position: f64, duration: f64) {
        let permille = if duration > 0.0 {
            (position / duration * PROGRESS_STEPS as f64).clamp(0.0, PROGRESS_STEPS as f64)
        } else {
            0.0
        };
        self.pb.set_position(permille as u64);
        self.pb
            .set_prefix(format!("{} / {}", format_time(position), format_time(duration)));
    }

    fn show_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.refresh_message();
    }
}

/// One block glyph per bar, colored with 24-bit ANSI escapes.
pub fn bar_line(frame: &BarFrame) -> String {
    let mut line = String::with_capacity(frame.len() * 20);
    for (&v, color) in frame.intensities.iter().zip(frame.colors.iter()) {
        let _ = write!(
            line,
            "\x1b[38;2;{};{};{}m{}",
            color.r,
            color.g,
            color.b,
            glyph(v)
        );
    }
    line.push_str("\x1b[0m");
    line
}

fn glyph(intensity: f32) -> char {
    let level = (intensity.clamp(0.0, 1.0) * (GLYPHS.len() - 1) as f32).round() as usize;
    GLYPHS[level]
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    if total >= 3600 {
        format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    } else {
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::frame::Rgb;
    use std::sync::Arc;

    #[test]
    fn glyph_covers_extremes() {
        assert_eq!(glyph(0.0), ' ');
        assert_eq!(glyph(1.0), '█');
        assert_eq!(glyph(2.0), '█');
        assert_eq!(glyph(-1.0), ' ');
        assert_eq!(glyph(0.5), '▄');
    }

    #[test]
    fn bar_line_colors_each_bar() {
        let frame = BarFrame {
            intensities: vec![0.0, 1.0],
            colors: Arc::from(vec![Rgb::new(0, 0, 255), Rgb::new(255, 0, 0)]),
        };
        let line = bar_line(&frame);
        assert_eq!(line, "\x1b[38;2;0;0;255m \x1b[38;2;255;0;0m█\x1b[0m");
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(185.0), "03:05");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(-3.0), "00:00");
    }
}
