use render::{DrawingSurface, Rgba};
use web_sys::CanvasRenderingContext2d;

/// Drawing surface backed by a canvas 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl DrawingSurface for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, color: &Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke(&mut self, color: &Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }
}
