use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scanplay::config::PlayerConfig;
use scanplay::input;
use scanplay::playback::{PlaybackConfig, PlaybackEngine, StimulusSession};
use scanplay::render::{Color, DrawSurface, FrameRenderer};
use scanplay::style::{resolve_styles, scheme_by_name};

const USAGE: &str =
    "usage: scanplay <dataset.json|recording.tsv> [--stimulus N] [--speed X] [--fps N] [--scheme NAME] [--all-frames]";

/// Drawing surface that counts and trace-logs draw calls.
///
/// Stands in for the real canvas this host doesn't have: playback runs
/// end to end and the counters feed the exit summary.
#[derive(Debug, Default)]
struct LogSurface {
    frames: u64,
    points: u64,
}

impl DrawSurface for LogSurface {
    fn clear(&mut self) {
        self.frames += 1;
    }

    fn draw_disc(
        &mut self,
        x: f32,
        y: f32,
        _radius: f32,
        _fill: Color,
        _stroke: Color,
        _line_width: f32,
    ) {
        self.points += 1;
        tracing::trace!(x, y, "disc");
    }
}

struct Args {
    dataset: PathBuf,
    stimulus: usize,
    speed: Option<f64>,
    fps: Option<u32>,
    scheme: Option<String>,
    all_frames: bool,
}

fn parse_args() -> Result<Args> {
    let mut dataset = None;
    let mut stimulus = 0;
    let mut speed = None;
    let mut fps = None;
    let mut scheme = None;
    let mut all_frames = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stimulus" => {
                stimulus = args
                    .next()
                    .context("--stimulus needs a value")?
                    .parse()
                    .context("--stimulus must be an integer")?;
            }
            "--speed" => {
                speed = Some(
                    args.next()
                        .context("--speed needs a value")?
                        .parse()
                        .context("--speed must be a number")?,
                );
            }
            "--fps" => {
                fps = Some(
                    args.next()
                        .context("--fps needs a value")?
                        .parse()
                        .context("--fps must be an integer")?,
                );
            }
            "--scheme" => {
                scheme = Some(args.next().context("--scheme needs a value")?);
            }
            "--all-frames" => all_frames = true,
            other if !other.starts_with('-') && dataset.is_none() => {
                dataset = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("unrecognized argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(Args {
        dataset: dataset.ok_or_else(|| anyhow::anyhow!("no input file given\n{}", USAGE))?,
        stimulus,
        speed,
        fps,
        scheme,
        all_frames,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;

    let mut config = PlayerConfig::load();
    if let Some(speed) = args.speed {
        config.default_speed = speed;
    }
    if let Some(fps) = args.fps {
        config.target_fps = fps;
    }
    if let Some(name) = &args.scheme {
        config.color_scheme = name.clone();
    }
    config.validate()?;

    let dataset = input::load_file(&args.dataset)
        .with_context(|| format!("Failed to load {}", args.dataset.display()))?;
    info!(
        stimuli = dataset.stimuli.len(),
        viewers = dataset.viewers.len(),
        rate = dataset.samples_per_second,
        "dataset loaded"
    );

    let scheme = scheme_by_name(&config.color_scheme)
        .ok_or_else(|| anyhow::anyhow!("unknown color scheme '{}'", config.color_scheme))?;
    let styles = resolve_styles(&dataset.viewer_groups, scheme);

    let session = StimulusSession::new(dataset)?;
    let renderer = FrameRenderer::new(LogSurface::default());
    let mut engine = PlaybackEngine::new(
        session,
        renderer,
        styles,
        PlaybackConfig {
            speed: config.default_speed,
            target_fps: config.target_fps,
        },
    )?;

    engine.select_stimulus(args.stimulus)?;
    info!(
        stimulus = engine.session().active_stimulus(),
        length = engine.session_length(),
        speed = engine.speed(),
        "ready"
    );

    if args.all_frames {
        engine.render_all_frames();
        info!(
            frames = engine.surface().frames,
            points = engine.surface().points,
            "rendered all frames"
        );
    } else {
        engine.run(true);
        info!(
            final_index = engine.position(),
            frames = engine.surface().frames,
            points = engine.surface().points,
            "playback finished"
        );
    }

    Ok(())
}
