pub mod config;
pub mod core;
pub mod input;
pub mod playback;
pub mod render;
pub mod style;

pub use crate::config::PlayerConfig;
pub use crate::core::{FramePoint, GazePoint, ReplayError, ViewDataset, Viewer};
pub use crate::playback::{PlaybackConfig, PlaybackEngine, PlaybackState, StimulusSession};
pub use crate::render::{Color, DrawSurface, FrameRenderer, MockSurface};
pub use crate::style::{
    resolve_styles, scheme_by_name, ColorScheme, GroupStyle, StyleMap,
};
