use thiserror::Error;

/// Typed failures surfaced by the playback core.
///
/// All of these are raised synchronously at the call that triggers them
/// (stimulus selection, speed change, dataset load, style resolution).
/// The frame loop itself never raises; out-of-range indices are clamped.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Stimulus index outside `[0, stimuli.len())`
    #[error("stimulus index {index} out of range ({count} stimuli)")]
    InvalidIndex { index: usize, count: usize },

    /// Playback speed must be a positive, finite multiplier
    #[error("invalid playback speed {0} (must be > 0)")]
    InvalidSpeed(f64),

    /// Dataset failed validation at load time
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    /// A viewer references a group with no style in the active scheme
    #[error("viewer group '{0}' has no style in the active color scheme")]
    UnknownGroup(String),

    /// Construction-time configuration mistake (fps, scheme name)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
