use anyhow::{Context, Result};

use crate::types::GeometryDescription;

/// Decodes a serialized [`GeometryDescription`]
pub fn load_json_slice(bytes: &[u8]) -> Result<GeometryDescription> {
    serde_json::from_slice(bytes).context("Failed to parse geometry JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Part, Primitive};

    #[test]
    fn test_parses_tagged_primitives() {
        let json = br#"{
            "shapes": [{
                "part": "imported",
                "primitive": { "type": "sphere", "radius": 0.5 },
                "position": [0.0, 1.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
                "material": { "color": [1.0, 0.0, 0.0], "metalness": 0.2, "roughness": 0.4 }
            }]
        }"#;

        let geometry = load_json_slice(json).unwrap();
        assert_eq!(geometry.len(), 1);
        let shape = &geometry.shapes()[0];
        assert_eq!(shape.part, Part::Imported);
        assert_eq!(shape.primitive, Primitive::Sphere { radius: 0.5 });
        assert_eq!(shape.material.opacity, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(load_json_slice(b"[1, 2").is_err());
    }
}
