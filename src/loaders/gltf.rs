use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::path::Path;

use crate::math::AABB;
use crate::types::{GeometryDescription, Material, Part, Primitive, Shape};

/// Decodes a glTF (`.gltf` or `.glb`) document into box shapes
///
/// Each mesh primitive becomes one box spanning its transformed bounds, with
/// the primitive's PBR material. `base` resolves external buffer URIs.
pub fn load_gltf_slice(bytes: &[u8], base: Option<&Path>) -> Result<GeometryDescription> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).context("Failed to parse glTF document")?;
    let buffers =
        gltf::import_buffers(&document, base, blob).context("Failed to load glTF buffers")?;

    log::debug!(
        "glTF document: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut shapes = Vec::new();

    let scene = document.default_scene().or_else(|| document.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut shapes)?;
        }
    }

    log::debug!("Extracted {} shapes from glTF", shapes.len());
    Ok(GeometryDescription::new(shapes))
}

/// Reads and decodes a glTF file from disk
pub fn load_gltf_file(path: impl AsRef<Path>) -> Result<GeometryDescription> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).context(format!("Failed to read glTF file: {:?}", path))?;
    load_gltf_slice(&bytes, path.parent())
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    shapes: &mut Vec<Shape>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, shapes)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, shapes)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    shapes: &mut Vec<Shape>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

        let positions = reader
            .read_positions()
            .context(format!("Mesh {:?} has a primitive without positions", mesh.name()))?;

        let Some(bounds) = AABB::from_points(
            positions.map(|pos| transform.transform_point3(Vec3::from_array(pos))),
        ) else {
            continue;
        };

        let size = bounds.size();
        shapes.push(Shape {
            part: Part::Imported,
            primitive: Primitive::cuboid(size.x, size.y, size.z),
            position: bounds.center().to_array(),
            rotation: [0.0; 3],
            material: convert_material(&primitive.material()),
        });
    }

    Ok(())
}

fn convert_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    let mut converted = Material::metallic([r, g, b], pbr.metallic_factor(), pbr.roughness_factor());
    let emissive = material.emissive_factor();
    if emissive.iter().any(|&c| c > 0.0) {
        converted = converted.with_emissive(emissive);
    }
    if material.alpha_mode() == gltf::material::AlphaMode::Blend {
        converted = converted.with_opacity(a);
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_document_is_an_error() {
        let err = load_gltf_slice(b"{ not gltf", None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse glTF document"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_gltf_file("definitely/not/here.gltf").is_err());
    }
}
