use crate::color::Rgba;

/// Immediate-mode 2D path drawing, modeled on a canvas context.
pub trait DrawingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self, color: &Rgba);
    fn stroke(&mut self, color: &Rgba);
}
