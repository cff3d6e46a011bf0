use serde::{Deserialize, Serialize};

/// One recorded subject. Every viewer belongs to exactly one group;
/// groups share a visual style during replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    /// Viewer name, unique within a dataset (keys `view_data` entries)
    pub name: String,

    /// Group identifier, must appear in the dataset's `viewer_groups`
    pub group: String,
}

impl Viewer {
    pub fn new(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
        }
    }
}
