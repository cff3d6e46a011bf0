use crate::core::ReplayError;
use crate::playback::{PlaybackConfig, PlaybackState, StimulusSession};
use crate::render::{DrawSurface, FrameRenderer};
use crate::style::{ensure_coverage, StyleMap};
use std::time::{Duration, Instant};

/// The playback scheduler: the only timing authority.
///
/// Owns the play/pause state, the speed multiplier, the current and
/// offset sample indices, and the self-rescheduling frame loop that
/// drives the renderer. The sample index is re-derived from elapsed
/// wall-clock time on every iteration rather than incremented, so
/// playback speed stays accurate no matter how long each redraw takes.
///
/// Single-threaded by construction: the next loop iteration is armed only
/// from inside the currently running one, so at most one iteration is
/// ever in flight and a pause takes effect at the end of the iteration
/// that observes it.
pub struct PlaybackEngine<S: DrawSurface> {
    session: StimulusSession,
    renderer: FrameRenderer<S>,
    styles: StyleMap,
    config: PlaybackConfig,
    state: PlaybackState,
    /// Index whose frame the next iteration will draw
    current_index: usize,
    /// Index playback resumed from when the current segment started
    index_offset: usize,
    /// Wall-clock instant the current play segment started at
    epoch: Option<Instant>,
}

impl<S: DrawSurface> PlaybackEngine<S> {
    pub fn new(
        session: StimulusSession,
        renderer: FrameRenderer<S>,
        styles: StyleMap,
        config: PlaybackConfig,
    ) -> Result<Self, ReplayError> {
        if !(config.speed.is_finite() && config.speed > 0.0) {
            return Err(ReplayError::InvalidSpeed(config.speed));
        }
        if config.target_fps == 0 {
            return Err(ReplayError::InvalidConfig(
                "target_fps must be at least 1".to_string(),
            ));
        }
        ensure_coverage(&session.dataset().viewers, &styles)?;

        Ok(Self {
            session,
            renderer,
            styles,
            config,
            state: PlaybackState::Stopped,
            current_index: 0,
            index_offset: 0,
            epoch: None,
        })
    }

    /// Start or resume playback, drawing the first frame synchronously.
    ///
    /// With `from_start`, or when the current index already sits at the
    /// last valid sample, playback restarts at index 0. Calling this while
    /// already running is a no-op unless `from_start` is set.
    pub fn play(&mut self, from_start: bool) {
        self.play_at(from_start, Instant::now());
    }

    fn play_at(&mut self, from_start: bool, now: Instant) {
        if self.state == PlaybackState::Running && !from_start {
            return;
        }

        let length = self.session.session_length();
        if from_start || self.current_index + 1 >= length {
            self.current_index = 0;
            self.index_offset = 0;
        }
        self.epoch = Some(now);
        self.state = PlaybackState::Running;
        tracing::debug!(
            index = self.current_index,
            speed = self.config.speed,
            "playback started"
        );

        // synchronous first frame
        self.step(now);
    }

    /// Stop without resetting indices; the next `play(false)` resumes here
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.index_offset = self.current_index;
        self.epoch = None;
        tracing::debug!(index = self.current_index, "playback paused");
    }

    /// Change the speed multiplier, effective from now on.
    ///
    /// While running, the elapsed-time base is re-anchored at the current
    /// index so already-consumed wall-clock time is not rescaled.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ReplayError> {
        self.set_speed_at(speed, Instant::now())
    }

    fn set_speed_at(&mut self, speed: f64, now: Instant) -> Result<(), ReplayError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ReplayError::InvalidSpeed(speed));
        }
        if self.state == PlaybackState::Running {
            self.index_offset = self.current_index;
            self.epoch = Some(now);
        }
        self.config.speed = speed;
        Ok(())
    }

    /// Jump to a sample index, clamped to the valid range.
    ///
    /// While running, the elapsed-time base is re-anchored so playback
    /// continues from the target.
    pub fn seek(&mut self, index: usize) {
        self.seek_at(index, Instant::now());
    }

    fn seek_at(&mut self, index: usize, now: Instant) {
        let last = self.session.session_length().saturating_sub(1);
        let index = index.min(last);
        self.current_index = index;
        self.index_offset = index;
        if self.state == PlaybackState::Running {
            self.epoch = Some(now);
        }
    }

    /// Switch the active stimulus; stops playback and resets both indices.
    ///
    /// On `InvalidIndex` nothing changes.
    pub fn select_stimulus(&mut self, index: usize) -> Result<(), ReplayError> {
        self.session.select_stimulus(index)?;
        self.state = PlaybackState::Stopped;
        self.current_index = 0;
        self.index_offset = 0;
        self.epoch = None;
        Ok(())
    }

    /// Run one frame-loop iteration against the real clock.
    ///
    /// Returns whether playback is still running, so a host event loop
    /// can drive the scheduler the same way `run` does.
    pub fn tick(&mut self) -> bool {
        self.step(Instant::now())
    }

    /// One iteration of the timing core.
    ///
    /// The next index is `index_offset` plus the samples covered by the
    /// elapsed wall-clock time of the current segment; the frame drawn is
    /// the index computed on the previous iteration. When the derived
    /// index passes the end it is clamped to the last sample and playback
    /// stops. Known boundary quirk: because drawing trails the clamp by
    /// one iteration, the final sample itself is never rendered.
    fn step(&mut self, now: Instant) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        let Some(epoch) = self.epoch else {
            return false;
        };

        let length = self.session.session_length();
        let elapsed_ms = now.duration_since(epoch).as_secs_f64() * 1000.0;
        let advance =
            (elapsed_ms * self.config.speed * self.session.samples_per_second() / 1000.0).floor()
                as usize;

        let mut next = self.index_offset + advance;
        if next >= length {
            next = length.saturating_sub(1);
            self.state = PlaybackState::Stopped;
            self.index_offset = self.current_index;
            self.epoch = None;
            tracing::debug!(index = self.current_index, "playback reached end");
        }

        let points = self.session.points_at(self.current_index);
        self.renderer.draw_frame(&points, &self.styles);
        tracing::trace!(
            index = self.current_index,
            drawn = points.len(),
            "frame"
        );

        self.current_index = next;
        self.state == PlaybackState::Running
    }

    /// The blocking cooperative loop: play, then redraw every
    /// `1000 / target_fps` milliseconds until playback stops.
    ///
    /// Each iteration arms the next one only after it has finished, so no
    /// two iterations ever overlap. The interval governs redraw
    /// granularity only; the advance rate comes from the elapsed-time
    /// formula in `step`.
    pub fn run(&mut self, from_start: bool) {
        self.play(from_start);
        let interval = Duration::from_millis(1000 / self.config.target_fps as u64);
        while self.state == PlaybackState::Running {
            std::thread::sleep(interval);
            self.tick();
        }
    }

    /// Draw every frame of the active stimulus back to back, bypassing
    /// the timing loop entirely. Playback state is untouched; useful for
    /// overlay-style inspection of a whole recording.
    pub fn render_all_frames(&mut self) {
        for index in 0..self.session.session_length() {
            let points = self.session.points_at(index);
            self.renderer.draw_frame(&points, &self.styles);
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Current sample index (the frame the next iteration will draw)
    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn session_length(&self) -> usize {
        self.session.session_length()
    }

    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    pub fn session(&self) -> &StimulusSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.renderer.surface_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GazePoint, ViewDataset, Viewer};
    use crate::render::MockSurface;
    use crate::style::{resolve_styles, scheme_by_name};
    use std::collections::HashMap;

    /// One stimulus, one viewer, `len` samples at 30 Hz
    fn engine(len: usize) -> PlaybackEngine<MockSurface> {
        let samples = (0..len)
            .map(|i| Some(GazePoint::new(i as f32, i as f32)))
            .collect();
        let mut per_viewer = HashMap::new();
        per_viewer.insert("v1".to_string(), samples);
        let mut view_data = HashMap::new();
        view_data.insert("s1".to_string(), per_viewer);

        let dataset = ViewDataset {
            stimuli: vec!["s1".to_string(), "s2".to_string()],
            stimulus_images: HashMap::new(),
            viewers: vec![Viewer::new("v1", "control")],
            viewer_directory: HashMap::new(),
            viewer_groups: vec!["control".to_string()],
            view_data,
            samples_per_second: 30.0,
            screen_width: 800.0,
            screen_height: 600.0,
        };

        let session = StimulusSession::new(dataset).unwrap();
        let scheme = scheme_by_name("classic").unwrap();
        let styles = resolve_styles(&["control".to_string()], scheme);
        PlaybackEngine::new(
            session,
            FrameRenderer::new(MockSurface::new()),
            styles,
            PlaybackConfig::default(),
        )
        .unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_second_advances_by_sample_rate() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        // 1000ms * 1.0 * 30Hz = 30 samples
        assert_eq!(engine.position(), 30);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_index_advance_scales_with_speed() {
        let mut engine = engine(90);
        engine.set_speed(2.0).unwrap();
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        assert_eq!(engine.position(), 60);
    }

    #[test]
    fn test_index_sequence_is_non_decreasing() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        let mut last = engine.position();
        for step_ms in [40, 40, 200, 500, 900, 1700, 2500] {
            engine.step(base + ms(step_ms));
            assert!(engine.position() >= last);
            last = engine.position();
        }
    }

    #[test]
    fn test_clamps_at_end_and_stops() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000)); // index 30
        engine.step(base + ms(10_000)); // derived index 300, past the end
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), 89);
        // the frame at 89 was never drawn; resume continues from the last
        // rendered index, not the clamped end
        assert_eq!(engine.index_offset, 30);
    }

    #[test]
    fn test_first_frame_drawn_at_offset() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        // the synchronous first frame draws index 0 (one clear + one disc)
        let ops = engine.surface_mut().take_ops();
        assert!(matches!(
            ops[1],
            crate::render::mock::DrawOp::Disc { x, .. } if x == 0.0
        ));
    }

    #[test]
    fn test_pause_then_resume_continues_in_place() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        engine.pause();
        assert!(!engine.is_playing());
        assert_eq!(engine.index_offset, engine.position());
        let pos = engine.position();

        let resume = base + ms(60_000);
        engine.play_at(false, resume);
        assert_eq!(engine.position(), pos);
        engine.step(resume + ms(500)); // 15 more samples
        assert_eq!(engine.position(), pos + 15);
    }

    #[test]
    fn test_play_from_start_always_resets() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        engine.pause();
        engine.play_at(true, base + ms(2000));
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.index_offset, 0);
    }

    #[test]
    fn test_play_resume_at_end_restarts() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(10_000));
        assert!(!engine.is_playing());
        // seek to the true end, then a plain play restarts from 0
        engine.seek(89);
        engine.play_at(false, base + ms(20_000));
        assert_eq!(engine.index_offset, 0);
    }

    #[test]
    fn test_play_while_running_is_idempotent() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        let pos = engine.position();
        engine.play_at(false, base + ms(1500));
        assert_eq!(engine.position(), pos);
        assert_eq!(engine.index_offset, 0);
    }

    #[test]
    fn test_pause_while_stopped_is_a_noop() {
        let mut engine = engine(90);
        engine.pause();
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn test_set_speed_rejects_non_positive() {
        let mut engine = engine(90);
        assert!(matches!(
            engine.set_speed(0.0),
            Err(ReplayError::InvalidSpeed(_))
        ));
        assert!(matches!(
            engine.set_speed(-1.0),
            Err(ReplayError::InvalidSpeed(_))
        ));
        assert_eq!(engine.speed(), 1.0);
    }

    #[test]
    fn test_speed_change_applies_only_going_forward() {
        let mut engine = engine(200);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000)); // index 30 at 1x
        engine.set_speed_at(2.0, base + ms(1000)).unwrap();
        engine.step(base + ms(2000)); // +1000ms at 2x = +60
        assert_eq!(engine.position(), 90);
    }

    #[test]
    fn test_seek_clamps_to_valid_range() {
        let mut engine = engine(90);
        engine.seek(1000);
        assert_eq!(engine.position(), 89);
        engine.seek(10);
        assert_eq!(engine.position(), 10);
        assert_eq!(engine.index_offset, 10);
    }

    #[test]
    fn test_select_stimulus_resets_playback() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        engine.select_stimulus(1).unwrap();
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.session_length(), 0);
    }

    #[test]
    fn test_select_stimulus_invalid_index_changes_nothing() {
        let mut engine = engine(90);
        let base = Instant::now();
        engine.play_at(true, base);
        engine.step(base + ms(1000));
        let pos = engine.position();
        assert!(matches!(
            engine.select_stimulus(5),
            Err(ReplayError::InvalidIndex { index: 5, count: 2 })
        ));
        assert!(engine.is_playing());
        assert_eq!(engine.position(), pos);
    }

    #[test]
    fn test_empty_session_stops_immediately() {
        let mut engine = engine(90);
        engine.select_stimulus(1).unwrap(); // no data for s2
        let base = Instant::now();
        engine.play_at(true, base);
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn test_render_all_frames_draws_every_index_untimed() {
        let mut engine = engine(90);
        engine.render_all_frames();
        assert_eq!(engine.surface().clear_count(), 90);
        assert_eq!(engine.surface().disc_count(), 90);
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.index_offset, 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let samples = vec![Some(GazePoint::new(0.0, 0.0))];
        let mut per_viewer = HashMap::new();
        per_viewer.insert("v1".to_string(), samples);
        let mut view_data = HashMap::new();
        view_data.insert("s1".to_string(), per_viewer);
        let dataset = ViewDataset {
            stimuli: vec!["s1".to_string()],
            stimulus_images: HashMap::new(),
            viewers: vec![Viewer::new("v1", "control")],
            viewer_directory: HashMap::new(),
            viewer_groups: vec!["control".to_string()],
            view_data,
            samples_per_second: 30.0,
            screen_width: 800.0,
            screen_height: 600.0,
        };
        let session = StimulusSession::new(dataset).unwrap();
        let scheme = scheme_by_name("classic").unwrap();
        let styles = resolve_styles(&["control".to_string()], scheme);

        let result = PlaybackEngine::new(
            session,
            FrameRenderer::new(MockSurface::new()),
            styles,
            PlaybackConfig {
                speed: 0.0,
                target_fps: 30,
            },
        );
        assert!(matches!(result, Err(ReplayError::InvalidSpeed(_))));
    }
}
