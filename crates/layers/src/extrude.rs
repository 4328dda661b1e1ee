//! Pseudo-3D extrusion of footprints as seen from a fixed camera.
//!
//! The camera hovers above the bottom-center of the screen. A roof at height
//! `h` is the footprint scaled away from the camera's ground point by
//! `camera_height / (camera_height - h)`; walls join each footprint edge to its
//! roof edge and are drawn only when they face the camera.

use std::collections::VecDeque;

use foundation::math::Pixel;
use render::{RenderFrame, Rgba};

use crate::scale::ScaledBuilding;
use crate::symbology::FrameColors;
use crate::viewport::{Viewport, ViewportMeta};

/// Global alpha for `zoom`: opaque at `max_zoom`, `1 - falloff` at `min_zoom`.
pub fn zoom_alpha(zoom: u8, min_zoom: u8, max_zoom: u8, falloff: f32) -> f32 {
    if max_zoom <= min_zoom {
        return 1.0;
    }
    let below_max = max_zoom.saturating_sub(zoom) as f32;
    (1.0 - below_max * falloff / (max_zoom - min_zoom) as f32).clamp(0.0, 1.0)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extruder {
    camera_height: f64,
}

impl Extruder {
    pub fn new(camera_height: f64) -> Self {
        Self { camera_height }
    }

    /// Appends walls and roofs of every visible building to `frame`.
    pub fn draw(
        &self,
        frame: &mut RenderFrame,
        viewport: &Viewport,
        meta: &ViewportMeta,
        buildings: &[ScaledBuilding],
        fade_factor: f64,
        colors: &FrameColors,
        stroke_roofs: bool,
    ) {
        let Some(offset) = viewport.top_left().checked_sub(meta.origin) else {
            return;
        };
        let camera = Pixel::new(viewport.half_size().x, viewport.height as i32);
        let stroke = stroke_roofs.then_some(colors.stroke);

        for building in buildings {
            if building.footprint.len() < 2 {
                continue;
            }

            // A vertex that cannot be shifted into screen space is garbage data.
            let Some(screen) = building
                .footprint
                .iter()
                .map(|&p| p.checked_sub(offset))
                .collect::<Option<Vec<Pixel>>>()
            else {
                continue;
            };
            if !screen.iter().any(|&p| viewport.shows(p)) {
                continue;
            }

            let height = building.effective_height(fade_factor);
            self.extrude(frame, &screen, height, camera, colors, stroke);
        }
    }

    /// Draws one building whose closed ring is already in screen pixels.
    pub fn extrude(
        &self,
        frame: &mut RenderFrame,
        ring: &[Pixel],
        height: f64,
        camera: Pixel,
        colors: &FrameColors,
        stroke: Option<Rgba>,
    ) {
        let scale = self.camera_height / (self.camera_height - height);
        let mut roof = Vec::with_capacity(ring.len().saturating_sub(1));
        let mut walls: VecDeque<Pixel> = VecDeque::new();

        for edge in ring.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            let roof_a = project(a, camera, scale);
            let roof_b = project(b, camera, scale);

            if faces_camera(a, b, roof_a) {
                // Ground vertices grow at the front, roof vertices at the back,
                // so a run of walls stays one closed outline.
                if walls.is_empty() {
                    walls.push_front(a);
                    walls.push_back(roof_a);
                }
                walls.push_front(b);
                walls.push_back(roof_b);
            } else {
                flush(frame, &mut walls, colors);
            }

            roof.push(roof_a);
        }
        flush(frame, &mut walls, colors);

        frame.path(roof, colors.roof, stroke);
    }
}

/// Perspective-scales `p` away from the camera's ground point, truncating toward zero.
pub fn project(p: Pixel, camera: Pixel, scale: f64) -> Pixel {
    let (px, py) = (p.x as f64, p.y as f64);
    let (cx, cy) = (camera.x as f64, camera.y as f64);
    Pixel::new(
        ((px - cx) * scale + cx) as i32,
        ((py - cy) * scale + cy) as i32,
    )
}

/// Wall `a -> b` of a clockwise ring is visible when its roof edge leans to the
/// outside of the turn.
pub fn faces_camera(a: Pixel, b: Pixel, roof_a: Pixel) -> bool {
    let (ax, ay) = (a.x as i64, a.y as i64);
    let (ex, ey) = (b.x as i64 - ax, b.y as i64 - ay);
    let (rx, ry) = (roof_a.x as i64 - ax, roof_a.y as i64 - ay);
    ex * ry - ey * rx > 0
}

fn flush(frame: &mut RenderFrame, walls: &mut VecDeque<Pixel>, colors: &FrameColors) {
    if walls.is_empty() {
        return;
    }
    frame.path(walls.drain(..).collect(), colors.wall, None);
}

#[cfg(test)]
mod tests {
    use super::{Extruder, faces_camera, project, zoom_alpha};
    use crate::scale::ScaledBuilding;
    use crate::symbology::{BuildingStyle, FrameColors};
    use crate::viewport::{Viewport, ViewportMeta};
    use foundation::math::Pixel;
    use pretty_assertions::assert_eq;
    use render::{RenderCommand, RenderFrame};

    fn colors() -> FrameColors {
        BuildingStyle::default().frame_colors(1.0)
    }

    // Screen-clockwise square left of the camera, which sits at (200, 400).
    fn square() -> Vec<Pixel> {
        vec![
            Pixel::new(50, 150),
            Pixel::new(150, 150),
            Pixel::new(150, 250),
            Pixel::new(50, 250),
            Pixel::new(50, 150),
        ]
    }

    fn wall_paths(frame: &RenderFrame, colors: &FrameColors) -> Vec<Vec<Pixel>> {
        frame
            .paths()
            .filter(|(_, fill)| **fill == colors.wall)
            .map(|(points, _)| points.to_vec())
            .collect()
    }

    #[test]
    fn alpha_is_full_at_max_zoom() {
        assert_eq!(zoom_alpha(18, 14, 18, 0.3), 1.0);
        assert!((zoom_alpha(14, 14, 18, 0.3) - 0.7).abs() < 1e-6);
        assert!((zoom_alpha(16, 14, 18, 0.3) - 0.85).abs() < 1e-6);
        assert_eq!(zoom_alpha(15, 15, 15, 0.3), 1.0);
    }

    #[test]
    fn projection_truncates_toward_zero() {
        let camera = Pixel::new(200, 400);
        let scale = 400.0 / 300.0;
        assert_eq!(project(Pixel::new(150, 150), camera, scale), Pixel::new(133, 66));
        assert_eq!(project(camera, camera, scale), camera);
    }

    #[test]
    fn square_culls_two_walls_and_merges_the_rest() {
        let camera = Pixel::new(200, 400);
        let scale = 400.0 / 300.0;
        let ring = square();
        let visible: Vec<bool> = ring
            .windows(2)
            .map(|e| faces_camera(e[0], e[1], project(e[0], camera, scale)))
            .collect();
        assert_eq!(visible, vec![false, true, true, false]);

        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).extrude(&mut frame, &ring, 100.0, camera, &colors, None);

        let walls = wall_paths(&frame, &colors);
        assert_eq!(walls.len(), 1);
        let b = Pixel::new(150, 150);
        let c = Pixel::new(150, 250);
        let d = Pixel::new(50, 250);
        assert_eq!(
            walls[0],
            vec![
                d,
                c,
                b,
                project(b, camera, scale),
                project(c, camera, scale),
                project(d, camera, scale),
            ]
        );
    }

    #[test]
    fn roof_is_drawn_last_with_one_vertex_per_edge() {
        let camera = Pixel::new(200, 400);
        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).extrude(&mut frame, &square(), 100.0, camera, &colors, Some(colors.stroke));

        match frame.commands.last() {
            Some(RenderCommand::Path { points, fill, stroke }) => {
                assert_eq!(points.len(), 4);
                assert_eq!(*fill, colors.roof);
                assert_eq!(*stroke, Some(colors.stroke));
            }
            other => panic!("expected roof path, got {other:?}"),
        }
    }

    #[test]
    fn flat_building_has_no_walls() {
        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).extrude(&mut frame, &square(), 0.0, Pixel::new(200, 400), &colors, None);
        assert!(wall_paths(&frame, &colors).is_empty());
        assert_eq!(frame.commands.len(), 1);
    }

    #[test]
    fn offscreen_buildings_are_skipped() {
        let viewport = Viewport::new(400, 400, Pixel::new(10_200, 20_200), 16);
        let meta = ViewportMeta::world(16);
        let on = ScaledBuilding {
            height: 50,
            footprint: square().into_iter().map(|p| p + Pixel::new(10_000, 20_000)).collect(),
            is_new: false,
        };
        let off = ScaledBuilding {
            footprint: square().into_iter().map(|p| p + Pixel::new(50_000, 20_000)).collect(),
            ..on.clone()
        };

        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).draw(&mut frame, &viewport, &meta, &[off, on], 1.0, &colors, false);
        let roofs = frame.paths().filter(|(_, fill)| **fill == colors.roof).count();
        assert_eq!(roofs, 1);
    }

    #[test]
    fn unshiftable_footprints_are_skipped() {
        let viewport = Viewport::new(400, 400, Pixel::new(300, 300), 16);
        let meta = ViewportMeta::world(16);
        let far = ScaledBuilding {
            height: 50,
            footprint: vec![
                Pixel::new(200, 200),
                Pixel::new(i32::MIN, 200),
                Pixel::new(200, 400),
                Pixel::new(200, 200),
            ],
            is_new: false,
        };
        let near = ScaledBuilding {
            footprint: square().into_iter().map(|p| p + Pixel::new(100, 100)).collect(),
            ..far.clone()
        };

        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).draw(&mut frame, &viewport, &meta, &[far, near], 1.0, &colors, false);
        let roofs = frame.paths().filter(|(_, fill)| **fill == colors.roof).count();
        assert_eq!(roofs, 1);

        let mut frame = RenderFrame::new();
        let lost = ViewportMeta {
            origin: Pixel::new(i32::MIN, 0),
            ..meta
        };
        Extruder::new(400.0).draw(&mut frame, &viewport, &lost, &[square_building()], 1.0, &colors, false);
        assert!(frame.commands.is_empty());
    }

    fn square_building() -> ScaledBuilding {
        ScaledBuilding {
            height: 50,
            footprint: square(),
            is_new: false,
        }
    }

    #[test]
    fn new_buildings_use_faded_height() {
        let viewport = Viewport::new(400, 400, Pixel::new(200, 200), 16);
        let meta = ViewportMeta::world(16);
        let building = ScaledBuilding {
            height: 100,
            footprint: square(),
            is_new: true,
        };
        let colors = colors();
        let mut frame = RenderFrame::new();
        Extruder::new(400.0).draw(&mut frame, &viewport, &meta, &[building], 0.0, &colors, false);
        // zero effective height: roof only
        assert_eq!(frame.commands.len(), 1);
    }
}
