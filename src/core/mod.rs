pub mod animation;
pub mod asset_loader;
pub mod interaction;
pub mod timer;

pub use animation::{AnimationDriver, AnimationSettings, AnimationTransform, Placement};
pub use asset_loader::{AssetLoader, LoadEvent, LoadTask, ProgressReporter};
pub use interaction::{transition, Effect, InteractionMachine, InteractionState, PointerEvent};
pub use timer::Countdown;
