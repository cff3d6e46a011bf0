pub mod frame;
pub mod mock;
pub mod surface;

pub use frame::FrameRenderer;
pub use mock::MockSurface;
pub use surface::{Color, DrawSurface};
