use crate::core::{FramePoint, GazePoint};
use crate::render::surface::DrawSurface;
use crate::style::{GroupStyle, StyleMap};

/// Default disc radius in surface units
const POINT_RADIUS: f32 = 5.0;

/// Default outline width in surface units
const LINE_WIDTH: f32 = 1.0;

/// Stateless frame drawing over an opaque surface handle.
///
/// Every frame is drawn from a blank surface; there is no incremental
/// redraw, so stale points can never accumulate.
pub struct FrameRenderer<S: DrawSurface> {
    surface: S,
    point_radius: f32,
    line_width: f32,
}

impl<S: DrawSurface> FrameRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            point_radius: POINT_RADIUS,
            line_width: LINE_WIDTH,
        }
    }

    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    /// Erase the whole surface
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Draw one gaze point as a filled, stroked disc
    pub fn draw_point(&mut self, point: GazePoint, style: &GroupStyle) {
        self.surface.draw_disc(
            point.x,
            point.y,
            self.point_radius,
            style.fill,
            style.stroke,
            self.line_width,
        );
    }

    /// Clear, then draw every point of one frame.
    ///
    /// Points are drawn in the order given (the session emits them in
    /// viewer order, which fixes the draw order within a run). A point
    /// whose group has no resolved style is skipped; engine construction
    /// verifies coverage so this does not happen in practice.
    pub fn draw_frame(&mut self, points: &[FramePoint<'_>], styles: &StyleMap) {
        self.surface.clear();
        for fp in points {
            if let Some(style) = styles.get(&fp.viewer.group) {
                self.draw_point(fp.point, style);
            }
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
