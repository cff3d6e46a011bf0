use serde::{Deserialize, Serialize};

/// A single recorded gaze sample in screen coordinates.
///
/// Point arrays store `Option<GazePoint>`; a `None` slot means the tracker
/// recorded nothing usable at that sample index and nothing is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f32,
    pub y: f32,
}

impl GazePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One viewer's present sample at a given index, as produced by the
/// session for the renderer
#[derive(Debug, Clone, Copy)]
pub struct FramePoint<'a> {
    pub viewer: &'a crate::core::Viewer,
    pub point: GazePoint,
}
