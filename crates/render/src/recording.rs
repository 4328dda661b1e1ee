use crate::color::Rgba;
use crate::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    ClearRect(f64, f64, f64, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Fill(Rgba),
    Stroke(Rgba),
}

/// Surface that records calls instead of drawing; used for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Fill(_)))
            .count()
    }

    pub fn drain(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::ClearRect(x, y, width, height));
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn fill(&mut self, color: &Rgba) {
        self.ops.push(SurfaceOp::Fill(*color));
    }

    fn stroke(&mut self, color: &Rgba) {
        self.ops.push(SurfaceOp::Stroke(*color));
    }
}
