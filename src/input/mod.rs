pub mod iview;
pub mod json;

pub use iview::{load_iview, IViewRecording};
pub use json::load_dataset;

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{ReplayError, ViewDataset, Viewer};

/// Input format detection result
#[derive(Debug, Clone)]
pub enum InputFormat {
    /// JSON dataset manifest
    Dataset,
    /// Bare tab-separated eye-tracker export
    IView,
    Unknown,
}

/// Detect the format of an input file by its extension
pub fn detect_format(path: &Path) -> InputFormat {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => InputFormat::Dataset,
        Some("txt") | Some("tsv") => InputFormat::IView,
        _ => InputFormat::Unknown,
    }
}

/// Load a dataset from a file, auto-detecting the format.
///
/// A bare export file becomes a one-stimulus, one-viewer dataset; its
/// `## Sample Rate` header supplies the sampling rate.
pub fn load_file(path: &Path) -> Result<ViewDataset> {
    match detect_format(path) {
        InputFormat::Dataset => json::load_dataset(path),
        InputFormat::IView => wrap_recording(path),
        InputFormat::Unknown => anyhow::bail!("Unknown input format: {}", path.display()),
    }
}

fn wrap_recording(path: &Path) -> Result<ViewDataset> {
    let recording = iview::load_iview(path)?;
    let stimulus = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("recording")
        .to_string();
    if let Some(at) = recording.recorded_at {
        tracing::info!(recorded_at = %at, "loaded recording");
    }
    dataset_from_recording(recording, stimulus).map_err(Into::into)
}

/// Wrap a single recording as a minimal dataset
fn dataset_from_recording(
    recording: IViewRecording,
    stimulus: String,
) -> Result<ViewDataset, ReplayError> {
    let rate = recording.sample_rate.ok_or_else(|| {
        ReplayError::MalformedDataset(
            "export carries no '## Sample Rate' header".to_string(),
        )
    })?;

    let mut per_viewer = HashMap::new();
    per_viewer.insert("subject".to_string(), recording.samples);
    let mut view_data = HashMap::new();
    view_data.insert(stimulus.clone(), per_viewer);

    let mut dataset = ViewDataset {
        stimuli: vec![stimulus],
        stimulus_images: HashMap::new(),
        viewers: vec![Viewer::new("subject", "all")],
        viewer_directory: HashMap::new(),
        viewer_groups: vec!["all".to_string()],
        view_data,
        samples_per_second: rate,
        screen_width: 800.0,
        screen_height: 600.0,
    };
    dataset.validate()?;
    Ok(dataset)
}
