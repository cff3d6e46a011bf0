use crate::core::{GazePoint, ReplayError, Viewer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_screen_width() -> f32 {
    800.0
}

fn default_screen_height() -> f32 {
    600.0
}

/// A complete recorded viewing study: stimuli, viewers, and the per-viewer
/// gaze point arrays for each stimulus.
///
/// Loaded once, validated, and never mutated afterwards. Point sequences
/// for different viewers on the same stimulus may have different lengths;
/// the session length for a stimulus is the maximum over its viewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDataset {
    /// Ordered stimulus identifiers (the navigation order)
    pub stimuli: Vec<String>,

    /// Stimulus id -> image reference (consumed by the navigation UI)
    #[serde(default)]
    pub stimulus_images: HashMap<String, String>,

    /// Ordered viewers; iteration order fixes the draw order
    pub viewers: Vec<Viewer>,

    /// Viewer name -> index into `viewers`, rebuilt by `validate`
    #[serde(skip)]
    pub viewer_directory: HashMap<String, usize>,

    /// Ordered group identifiers; ordinal position selects the palette role
    pub viewer_groups: Vec<String>,

    /// Stimulus id -> viewer name -> one point per sample index
    pub view_data: HashMap<String, HashMap<String, Vec<Option<GazePoint>>>>,

    /// Fixed sampling rate of the recording, in samples per second
    pub samples_per_second: f64,

    /// Coordinate space of the recording
    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
    #[serde(default = "default_screen_height")]
    pub screen_height: f32,
}

impl ViewDataset {
    /// Check structural invariants and rebuild the viewer directory.
    ///
    /// Called by the loaders before the dataset reaches a session; a
    /// dataset that fails here is a fatal configuration error, not
    /// something playback recovers from.
    pub fn validate(&mut self) -> Result<(), ReplayError> {
        if !(self.samples_per_second.is_finite() && self.samples_per_second > 0.0) {
            return Err(ReplayError::MalformedDataset(format!(
                "samples_per_second must be positive, got {}",
                self.samples_per_second
            )));
        }

        if self.stimuli.is_empty() {
            return Err(ReplayError::MalformedDataset(
                "dataset contains no stimuli".to_string(),
            ));
        }

        self.viewer_directory.clear();
        for (idx, viewer) in self.viewers.iter().enumerate() {
            if !self.viewer_groups.contains(&viewer.group) {
                return Err(ReplayError::MalformedDataset(format!(
                    "viewer '{}' references unknown group '{}'",
                    viewer.name, viewer.group
                )));
            }
            if self
                .viewer_directory
                .insert(viewer.name.clone(), idx)
                .is_some()
            {
                return Err(ReplayError::MalformedDataset(format!(
                    "duplicate viewer name '{}'",
                    viewer.name
                )));
            }
        }

        for (stimulus, per_viewer) in &self.view_data {
            if !self.stimuli.contains(stimulus) {
                return Err(ReplayError::MalformedDataset(format!(
                    "view data for unknown stimulus '{}'",
                    stimulus
                )));
            }
            for name in per_viewer.keys() {
                if !self.viewer_directory.contains_key(name) {
                    return Err(ReplayError::MalformedDataset(format!(
                        "view data for unknown viewer '{}' on stimulus '{}'",
                        name, stimulus
                    )));
                }
            }
        }

        Ok(())
    }

    /// Point arrays for one stimulus, if any viewer recorded data for it
    pub fn points_for(&self, stimulus: &str) -> Option<&HashMap<String, Vec<Option<GazePoint>>>> {
        self.view_data.get(stimulus)
    }

    pub fn stimulus_count(&self) -> usize {
        self.stimuli.len()
    }
}
