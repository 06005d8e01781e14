pub mod terminal;

use crate::visualizer::frame::BarFrame;

/// Where the UI thread draws. Only the thread that owns the session calls
/// into a surface.
pub trait RenderSurface {
    fn draw_bars(&mut self, frame: &BarFrame);
    fn show_position(&mut self, position: f64, duration: f64);
    fn show_status(&mut self, status: &str);
}
