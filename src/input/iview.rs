use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;

use crate::core::GazePoint;

/// One parsed eye-tracker export: a single viewer's samples plus the
/// metadata carried in the file header
#[derive(Debug, Clone)]
pub struct IViewRecording {
    /// One slot per sample index; unusable samples are `None`
    pub samples: Vec<Option<GazePoint>>,
    /// `## Sample Rate` header value, if present
    pub sample_rate: Option<f64>,
    /// `## Date` header value, if present and parseable
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Load a tab-separated iView-style gaze export.
///
/// Header metadata lines start with `##` (`## Sample Rate:`, `## Date:`);
/// the first non-comment row names the columns. Only the x/y gaze columns
/// are consumed; pupil and corneal-reflex columns are ignored.
pub fn load_iview(path: &Path) -> Result<IViewRecording> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_iview(&raw)
}

/// Parse an export from its raw text
pub fn parse_iview(raw: &str) -> Result<IViewRecording> {
    let mut sample_rate = None;
    let mut recorded_at = None;

    for line in raw.lines() {
        let Some(rest) = line.strip_prefix("##") else {
            continue;
        };
        // metadata lines look like "## Sample Rate:\t60"
        let Some((key, value)) = rest.split_once(':') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "sample rate" => sample_rate = value.trim().parse::<f64>().ok(),
            "date" => recorded_at = parse_date(value.trim()),
            _ => {}
        }
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = rdr.headers().context("Failed to read column headers")?;
    let x_idx = find_column(headers, &["x", "por_x", "gaze_x", "b_por_x"])?;
    let y_idx = find_column(headers, &["y", "por_y", "gaze_y", "b_por_y"])?;

    let mut samples = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read sample row")?;
        let x = record.get(x_idx).and_then(|s| s.parse::<f32>().ok());
        let y = record.get(y_idx).and_then(|s| s.parse::<f32>().ok());
        samples.push(match (x, y) {
            (Some(x), Some(y)) if usable(x, y) => Some(GazePoint::new(x, y)),
            _ => None,
        });
    }

    Ok(IViewRecording {
        samples,
        sample_rate,
        recorded_at,
    })
}

/// Trackers report (0, 0) when they lose the eye; those samples, along
/// with negative or non-finite coordinates, are recorded as absent.
fn usable(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0 && !(x == 0.0 && y == 0.0)
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    anyhow::bail!("Could not find column with names: {:?}", names)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    for format in ["%d.%m.%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    tracing::warn!(value, "unparseable date header");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
## Sample Rate:\t60
## Date:\t12.03.2009 10:21:33
time\tset\tpupil_h\tpupil_v\tx\ty\tdiam_h\tdiam_v
0\tA\t11\t12\t400\t300\t5\t5
16\tA\t11\t12\t0\t0\t5\t5
33\tA\t11\t12\t410\t310\t5\t5
50\tA\t11\t12\t-3\t310\t5\t5
";

    #[test]
    fn test_parse_samples_and_metadata() {
        let recording = parse_iview(EXPORT).unwrap();
        assert_eq!(recording.samples.len(), 4);
        assert_eq!(recording.samples[0], Some(GazePoint::new(400.0, 300.0)));
        assert_eq!(recording.sample_rate, Some(60.0));
        let at = recording.recorded_at.unwrap();
        assert_eq!(at.to_rfc3339(), "2009-03-12T10:21:33+00:00");
    }

    #[test]
    fn test_lost_eye_and_negative_samples_are_absent() {
        let recording = parse_iview(EXPORT).unwrap();
        assert_eq!(recording.samples[1], None); // (0, 0)
        assert_eq!(recording.samples[3], None); // negative x
    }

    #[test]
    fn test_missing_gaze_columns_is_an_error() {
        let raw = "time\tset\n0\tA\n";
        assert!(parse_iview(raw).is_err());
    }

    #[test]
    fn test_headers_without_metadata() {
        let raw = "x\ty\n10\t20\n";
        let recording = parse_iview(raw).unwrap();
        assert_eq!(recording.samples.len(), 1);
        assert_eq!(recording.sample_rate, None);
        assert_eq!(recording.recorded_at, None);
    }
}
