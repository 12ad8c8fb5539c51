pub mod gltf;
pub mod json;
pub mod source;

pub use self::gltf::{load_gltf_file, load_gltf_slice};
pub use self::json::load_json_slice;
pub use self::source::{decode, resolve_path, AssetSource, FileSource};
