use foundation::math::Pixel;

use crate::color::Rgba;
use crate::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear {
        width: u32,
        height: u32,
    },
    /// Closed polygon; stroked first when `stroke` is set, then filled.
    Path {
        points: Vec<Pixel>,
        fill: Rgba,
        stroke: Option<Rgba>,
    },
}

/// Everything drawn for one frame, in draw order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, width: u32, height: u32) {
        self.commands.push(RenderCommand::Clear { width, height });
    }

    /// Appends a path; empty paths are dropped.
    pub fn path(&mut self, points: Vec<Pixel>, fill: Rgba, stroke: Option<Rgba>) {
        if points.is_empty() {
            return;
        }
        self.commands.push(RenderCommand::Path {
            points,
            fill,
            stroke,
        });
    }

    pub fn paths(&self) -> impl Iterator<Item = (&[Pixel], &Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Path { points, fill, .. } => Some((points.as_slice(), fill)),
            RenderCommand::Clear { .. } => None,
        })
    }

    pub fn replay<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                RenderCommand::Clear { width, height } => {
                    surface.clear_rect(0.0, 0.0, *width as f64, *height as f64);
                }
                RenderCommand::Path {
                    points,
                    fill,
                    stroke,
                } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    surface.begin_path();
                    surface.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        surface.line_to(p.x as f64, p.y as f64);
                    }
                    surface.close_path();
                    if let Some(stroke) = stroke {
                        surface.stroke(stroke);
                    }
                    surface.fill(fill);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::color::Rgba;
    use crate::recording::{RecordingSurface, SurfaceOp};
    use foundation::math::Pixel;
    use pretty_assertions::assert_eq;

    #[test]
    fn replays_in_canvas_order() {
        let mut frame = RenderFrame::new();
        frame.clear(10, 20);
        frame.path(
            vec![Pixel::new(1, 1), Pixel::new(5, 1), Pixel::new(5, 5)],
            Rgba::rgb(1, 2, 3),
            Some(Rgba::rgb(9, 9, 9)),
        );

        let mut surface = RecordingSurface::new();
        frame.replay(&mut surface);
        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::ClearRect(0.0, 0.0, 10.0, 20.0),
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(1.0, 1.0),
                SurfaceOp::LineTo(5.0, 1.0),
                SurfaceOp::LineTo(5.0, 5.0),
                SurfaceOp::ClosePath,
                SurfaceOp::Stroke(Rgba::rgb(9, 9, 9)),
                SurfaceOp::Fill(Rgba::rgb(1, 2, 3)),
            ]
        );
    }

    #[test]
    fn empty_paths_are_dropped() {
        let mut frame = RenderFrame::new();
        frame.path(Vec::new(), Rgba::rgb(0, 0, 0), None);
        assert!(frame.commands.is_empty());
    }
}
