use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{GazePoint, ViewDataset, Viewer};
use crate::input::iview;

/// A viewer's samples in the manifest: inline (`null` = absent sample) or
/// a path to an eye-tracker export, resolved relative to the manifest
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleSource {
    Inline(Vec<Option<GazePoint>>),
    File(String),
}

/// On-disk dataset manifest
#[derive(Debug, Deserialize)]
struct DatasetManifest {
    samples_per_second: f64,
    stimuli: Vec<String>,
    #[serde(default)]
    stimulus_images: HashMap<String, String>,
    viewers: Vec<Viewer>,
    viewer_groups: Vec<String>,
    #[serde(default)]
    view_data: HashMap<String, HashMap<String, SampleSource>>,
    screen_width: Option<f32>,
    screen_height: Option<f32>,
}

/// Load a JSON dataset manifest, pulling in any referenced export files
pub fn load_dataset(path: &Path) -> Result<ViewDataset> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: DatasetManifest =
        serde_json::from_str(&raw).context("Failed to parse dataset manifest")?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_manifest(manifest, base)
}

/// Parse a manifest from raw JSON; referenced files resolve against `base`
pub fn parse_dataset(raw: &str, base: &Path) -> Result<ViewDataset> {
    let manifest: DatasetManifest =
        serde_json::from_str(raw).context("Failed to parse dataset manifest")?;
    resolve_manifest(manifest, base)
}

fn resolve_manifest(manifest: DatasetManifest, base: &Path) -> Result<ViewDataset> {
    let mut view_data = HashMap::new();
    for (stimulus, per_viewer) in manifest.view_data {
        let mut resolved = HashMap::new();
        for (viewer, source) in per_viewer {
            let samples = match source {
                SampleSource::Inline(samples) => samples,
                SampleSource::File(relative) => {
                    let path = base.join(&relative);
                    let recording = iview::load_iview(&path).with_context(|| {
                        format!("Failed to load recording for viewer '{}'", viewer)
                    })?;
                    if let Some(rate) = recording.sample_rate {
                        if (rate - manifest.samples_per_second).abs() > 1e-6 {
                            // the manifest rate wins; playback uses one clock
                            tracing::warn!(
                                viewer = %viewer,
                                export_rate = rate,
                                manifest_rate = manifest.samples_per_second,
                                "export sample rate differs from manifest"
                            );
                        }
                    }
                    recording.samples
                }
            };
            resolved.insert(viewer, samples);
        }
        view_data.insert(stimulus, resolved);
    }

    let mut dataset = ViewDataset {
        stimuli: manifest.stimuli,
        stimulus_images: manifest.stimulus_images,
        viewers: manifest.viewers,
        viewer_directory: HashMap::new(),
        viewer_groups: manifest.viewer_groups,
        view_data,
        samples_per_second: manifest.samples_per_second,
        screen_width: manifest.screen_width.unwrap_or(800.0),
        screen_height: manifest.screen_height.unwrap_or(600.0),
    };
    dataset.validate()?;
    Ok(dataset)
}
