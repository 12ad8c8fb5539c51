//! Error types for asset loading

use thiserror::Error;

/// Why an external model could not be displayed
///
/// Never surfaced to the end user: the viewer logs it, records it in
/// `LoadState::Failed` and shows the procedural model instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed asset {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("unsupported asset location `{0}`")]
    UnsupportedLocation(String),

    #[error("asset {0} contains no geometry")]
    Empty(String),

    #[error("asset load timed out after {0:.1}s")]
    Timeout(f32),

    #[error("could not schedule asset load: {0}")]
    Spawn(#[from] futures::task::SpawnError),
}
