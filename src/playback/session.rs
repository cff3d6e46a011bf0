use crate::core::{FramePoint, ReplayError, ViewDataset};

/// The active stimulus's point data and its derived length.
///
/// The session length (max point-array length over this stimulus's
/// viewers) is cached on selection rather than recomputed per frame, so
/// the frame loop does no O(viewers) work to find it.
pub struct StimulusSession {
    dataset: ViewDataset,
    active: usize,
    length: usize,
}

impl StimulusSession {
    /// Validate the dataset and start on stimulus 0
    pub fn new(mut dataset: ViewDataset) -> Result<Self, ReplayError> {
        dataset.validate()?;
        let mut session = Self {
            dataset,
            active: 0,
            length: 0,
        };
        session.length = session.compute_length();
        Ok(session)
    }

    /// Switch the active stimulus and recompute the cached length.
    ///
    /// Fails with `InvalidIndex` without touching any state.
    pub fn select_stimulus(&mut self, index: usize) -> Result<(), ReplayError> {
        if index >= self.dataset.stimuli.len() {
            return Err(ReplayError::InvalidIndex {
                index,
                count: self.dataset.stimuli.len(),
            });
        }
        self.active = index;
        self.length = self.compute_length();
        tracing::debug!(
            stimulus = %self.active_stimulus(),
            length = self.length,
            "selected stimulus"
        );
        Ok(())
    }

    fn compute_length(&self) -> usize {
        self.dataset
            .points_for(self.active_stimulus())
            .map(|per_viewer| per_viewer.values().map(Vec::len).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Every present point at `sample_index`, in viewer order.
    ///
    /// Viewers whose array is shorter than the index, or whose slot is
    /// absent, contribute nothing. An out-of-range index yields an empty
    /// vec rather than an error; mid-playback is not a moment the caller
    /// can recover at.
    pub fn points_at(&self, sample_index: usize) -> Vec<FramePoint<'_>> {
        let Some(per_viewer) = self.dataset.points_for(self.active_stimulus()) else {
            return Vec::new();
        };

        self.dataset
            .viewers
            .iter()
            .filter_map(|viewer| {
                let point = per_viewer
                    .get(&viewer.name)
                    .and_then(|samples| samples.get(sample_index).copied())
                    .flatten()?;
                Some(FramePoint { viewer, point })
            })
            .collect()
    }

    /// Cached length of the active stimulus's longest point array
    pub fn session_length(&self) -> usize {
        self.length
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_stimulus(&self) -> &str {
        &self.dataset.stimuli[self.active]
    }

    pub fn samples_per_second(&self) -> f64 {
        self.dataset.samples_per_second
    }

    pub fn dataset(&self) -> &ViewDataset {
        &self.dataset
    }
}
