pub mod dataset;
pub mod error;
pub mod point;
pub mod viewer;

pub use dataset::ViewDataset;
pub use error::ReplayError;
pub use point::{FramePoint, GazePoint};
pub use viewer::Viewer;
