pub mod bitmap;
pub mod color;
pub mod index;
pub mod overlay;

pub use bitmap::CollisionImage;
pub use color::{Color, RegionTable};
pub use index::{Direction, Edge, PixelCollisionIndex, SampleWindow, sample_points};
pub use overlay::DebugOverlay;
