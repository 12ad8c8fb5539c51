pub mod builder;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod math;
pub mod scenes;
pub mod types;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::LoadError;
pub use frame::{FrameInfo, FrameIterator};
pub use types::{GeometryDescription, ModelKind, ModelParameters, Shape};
pub use viewer::{DisplayedGeometry, FrameView, Label, LoadState, Viewer};
