use futures::future::{BoxFuture, FutureExt};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{gltf::load_gltf_slice, json::load_json_slice};
use crate::core::asset_loader::ProgressReporter;
use crate::error::LoadError;
use crate::types::GeometryDescription;

const READ_CHUNK: usize = 64 * 1024;

/// Where external models come from
///
/// The returned future may run on any executor thread; it must not touch
/// viewer state and reports only through `progress` and its output.
pub trait AssetSource: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        progress: ProgressReporter,
    ) -> BoxFuture<'static, Result<GeometryDescription, LoadError>>;
}

/// Loads models from the local filesystem (plain paths or `file://` URLs)
///
/// Reads block the executor thread running the task, not the frame thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl AssetSource for FileSource {
    fn fetch(
        &self,
        url: &str,
        mut progress: ProgressReporter,
    ) -> BoxFuture<'static, Result<GeometryDescription, LoadError>> {
        let url = url.to_string();
        async move {
            let path = resolve_path(&url)?;
            let bytes = read_with_progress(&path, &mut progress).map_err(|source| LoadError::Io {
                location: url.clone(),
                source,
            })?;
            decode(&url, &path, &bytes)
        }
        .boxed()
    }
}

/// Maps a URL onto a local path. Network schemes are not handled here.
pub fn resolve_path(url: &str) -> Result<PathBuf, LoadError> {
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if url.contains("://") || url.trim().is_empty() {
        return Err(LoadError::UnsupportedLocation(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

fn read_with_progress(path: &Path, progress: &mut ProgressReporter) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let total = file.metadata()?.len();
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        progress.report_bytes(bytes.len() as u64, total);
    }

    Ok(bytes)
}

/// Picks a decoder by file extension
pub fn decode(location: &str, path: &Path, bytes: &[u8]) -> Result<GeometryDescription, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let decoded = match extension.as_deref() {
        Some("gltf") | Some("glb") => load_gltf_slice(bytes, path.parent()),
        Some("json") => load_json_slice(bytes),
        _ => return Err(LoadError::UnsupportedLocation(location.to_string())),
    };

    let geometry = decoded.map_err(|err| LoadError::Malformed {
        location: location.to_string(),
        reason: format!("{:#}", err),
    })?;

    if geometry.is_empty() {
        return Err(LoadError::Empty(location.to_string()));
    }
    Ok(geometry)
}
