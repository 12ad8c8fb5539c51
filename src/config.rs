use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::animation::{AnimationSettings, Placement};
use crate::types::ModelKind;

pub const DEFAULT_LOAD_TIMEOUT_SECS: f32 = 30.0;

fn default_load_timeout() -> Option<f32> {
    Some(DEFAULT_LOAD_TIMEOUT_SECS)
}

/// Construction parameters of a viewer
///
/// Every field is optional in JSON; an unknown `kind` falls back to `road`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub kind: ModelKind,
    pub asset_url: Option<String>,
    pub placement: Placement,
    /// `None` waits for the asset indefinitely
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: Option<f32>,
    /// Fixed seed for the hover particles; entropy when absent
    pub particle_seed: Option<u64>,
    pub animation: AnimationSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            asset_url: None,
            placement: Placement::default(),
            load_timeout_secs: default_load_timeout(),
            particle_seed: None,
            animation: AnimationSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = Some(url.into());
        self
    }

    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particle_seed = Some(seed);
        self
    }

    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout_secs = timeout.map(|t| t.as_secs_f32());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid viewer configuration")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read viewer configuration: {:?}", path))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.load_timeout_secs, Some(DEFAULT_LOAD_TIMEOUT_SECS));
        assert_eq!(config.placement.scale, [1.0; 3]);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let config = ViewerConfig::from_json_str(r#"{ "kind": "penny-farthing" }"#).unwrap();
        assert_eq!(config.kind, ModelKind::Road);
    }

    #[test]
    fn test_full_config() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "kind": "electric",
                "asset_url": "models/e-bike.glb",
                "placement": { "position": [0.0, 1.0, 0.0] },
                "load_timeout_secs": null,
                "particle_seed": 9,
                "animation": { "amplitude": 0.3 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.kind, ModelKind::Electric);
        assert_eq!(config.asset_url.as_deref(), Some("models/e-bike.glb"));
        assert_eq!(config.placement.position, [0.0, 1.0, 0.0]);
        assert_eq!(config.placement.scale, [1.0; 3]);
        assert_eq!(config.load_timeout_secs, None);
        assert_eq!(config.particle_seed, Some(9));
        assert_eq!(config.animation.amplitude, 0.3);
        assert_eq!(config.animation.frequency, 1.5);
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(ViewerConfig::from_json_str(r#"{ "particle_seed": "seven" }"#).is_err());
    }
}
