pub mod engine;
pub mod session;

pub use engine::PlaybackEngine;
pub use session::StimulusSession;

/// Playback state machine. `Stopped` covers both "never started" and
/// "paused"; pausing keeps the indices so a later play resumes in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Speed multiplier, 1.0 = real-time, 2.0 = 2x speed
    pub speed: f64,
    /// Redraw rate of the frame loop. Governs redraw granularity only;
    /// playback speed is derived from elapsed wall-clock time.
    pub target_fps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            target_fps: 30,
        }
    }
}
