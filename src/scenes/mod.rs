pub mod bike;
pub mod palette;
pub mod particles;

pub use bike::{generate, SPOKE_COUNT};
pub use palette::Palette;
pub use particles::scatter;
