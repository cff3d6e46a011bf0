/// RGBA color, each channel in `[0, 1]`
pub type Color = [f32; 4];

/// The opaque drawing-surface handle the renderer draws through.
///
/// A surface only needs to erase itself and draw a filled, stroked disc;
/// the renderer requires no other capability. Implementations live with
/// the host (a real canvas, a logging stand-in, a recording mock).
pub trait DrawSurface {
    /// Erase the entire surface
    fn clear(&mut self);

    /// Draw a filled disc with a stroked outline centered at (x, y)
    fn draw_disc(&mut self, x: f32, y: f32, radius: f32, fill: Color, stroke: Color, line_width: f32);
}
