use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::math::{hex_rgb, Rgb, AABB};

/// Product line of the displayed bike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Road,
    Mountain,
    Electric,
    Racing,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Road,
        ModelKind::Mountain,
        ModelKind::Electric,
        ModelKind::Racing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Road => "road",
            ModelKind::Mountain => "mountain",
            ModelKind::Electric => "electric",
            ModelKind::Racing => "racing",
        }
    }

    /// Emphasis color: indigo, green, red, amber
    pub fn accent(&self) -> Rgb {
        match self {
            ModelKind::Road => hex_rgb(0x4f46e5),
            ModelKind::Mountain => hex_rgb(0x059669),
            ModelKind::Electric => hex_rgb(0xdc2626),
            ModelKind::Racing => hex_rgb(0xf59e0b),
        }
    }

    /// Overlay text shown while hovered, e.g. `MOUNTAIN BIKE`
    pub fn label(&self) -> String {
        format!("{} BIKE", self.as_str().to_uppercase())
    }

    /// Parses a kind name, falling back to `Road` for anything unrecognized
    pub fn parse_lenient(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("{}; falling back to road", err);
                ModelKind::Road
            }
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for ModelKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Ok(ModelKind::Road),
            "mountain" => Ok(ModelKind::Mountain),
            "electric" => Ok(ModelKind::Electric),
            "racing" => Ok(ModelKind::Racing),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

// Cosmetic content: a bad kind in a config file degrades to the default
// palette instead of rejecting the whole file.
impl<'de> Deserialize<'de> for ModelKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ModelKind::parse_lenient(&name))
    }
}

/// Immutable inputs of the procedural generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub kind: ModelKind,
    pub accent: Rgb,
}

impl ModelParameters {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            accent: kind.accent(),
        }
    }

    pub fn with_accent(mut self, accent: Rgb) -> Self {
        self.accent = accent;
        self
    }
}

impl From<ModelKind> for ModelParameters {
    fn from(kind: ModelKind) -> Self {
        Self::new(kind)
    }
}

/// Surface description of one shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<Rgb>,
    /// `Some` marks the material as transparent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

impl Material {
    pub fn metallic(color: Rgb, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
            emissive: None,
            opacity: None,
        }
    }

    /// Non-metal, fully rough
    pub fn matte(color: Rgb) -> Self {
        Self::metallic(color, 0.0, 1.0)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn with_emissive(mut self, emissive: Rgb) -> Self {
        self.emissive = Some(emissive);
        self
    }
}

/// Primitive geometry with its dimensions. Cylinders run along local Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Sphere {
        radius: f32,
    },
}

impl Primitive {
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Primitive::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Primitive::Box { width, height, depth }
    }

    /// Stable numeric tag for GPU records
    pub fn id(&self) -> u32 {
        match self {
            Primitive::Box { .. } => 0,
            Primitive::Cylinder { .. } => 1,
            Primitive::Sphere { .. } => 2,
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        match *self {
            Primitive::Box { width, height, depth } => [width, height, depth],
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => [radius_top, radius_bottom, height],
            Primitive::Sphere { radius } => [radius, radius, radius],
        }
    }

    pub fn local_bounds(&self) -> AABB {
        let half = match *self {
            Primitive::Box { width, height, depth } => Vec3::new(width, height, depth) * 0.5,
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Primitive::Sphere { radius } => Vec3::splat(radius),
        };
        AABB::new(-half, half)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wheel {
    Front,
    Rear,
}

/// What a shape represents in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    FrameTube,
    SeatTube,
    HeadTube,
    Handlebar,
    Grip,
    Tire(Wheel),
    Rim(Wheel),
    Spoke(Wheel),
    Hub(Wheel),
    Cassette,
    Seat,
    Crankset,
    CrankArm,
    Pedal,
    ChainLink,
    /// Hover embellishment, never part of a generated model
    Particle,
    /// Shape decoded from an external asset
    Imported,
}

/// One primitive placed in model space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub part: Part,
    pub primitive: Primitive,
    pub position: [f32; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f32; 3],
    pub material: Material,
}

impl Shape {
    pub fn local_matrix(&self) -> Mat4 {
        let [rx, ry, rz] = self.rotation;
        Mat4::from_rotation_translation(
            Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            Vec3::from_array(self.position),
        )
    }

    pub fn bounds(&self) -> AABB {
        self.primitive.local_bounds().transformed(&self.local_matrix())
    }
}

/// Ordered, immutable shape list for one model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryDescription {
    shapes: Vec<Shape>,
}

impl GeometryDescription {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn count_parts(&self, pred: impl Fn(Part) -> bool) -> usize {
        self.shapes.iter().filter(|s| pred(s.part)).count()
    }

    pub fn bounds(&self) -> Option<AABB> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Flattens the shapes into GPU records under the given model matrix
    pub fn instances(&self, model: &Mat4) -> Vec<ShapeInstance> {
        self.shapes
            .iter()
            .map(|shape| ShapeInstance::new(shape, &(*model * shape.local_matrix())))
            .collect()
    }
}

/// Per-shape instance record for GPU upload by the host
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize)]
pub struct ShapeInstance {
    pub transform: [[f32; 4]; 4],
    pub dimensions: [f32; 3],
    pub primitive: u32,
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub _pad: [f32; 3],
}

impl ShapeInstance {
    pub fn new(shape: &Shape, world: &Mat4) -> Self {
        let material = &shape.material;
        Self {
            transform: world.to_cols_array_2d(),
            dimensions: shape.primitive.dimensions(),
            primitive: shape.primitive.id(),
            color: material.color,
            opacity: material.opacity.unwrap_or(1.0),
            emissive: material.emissive.unwrap_or([0.0; 3]),
            metalness: material.metalness,
            roughness: material.roughness,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!("Mountain".parse::<ModelKind>(), Ok(ModelKind::Mountain));
        assert_eq!(" racing ".parse::<ModelKind>(), Ok(ModelKind::Racing));
        assert!("tandem".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_kind_lenient_falls_back_to_road() {
        assert_eq!(ModelKind::parse_lenient("unicycle"), ModelKind::Road);
        assert_eq!(ModelKind::parse_lenient("electric"), ModelKind::Electric);
    }

    #[test]
    fn test_kind_label() {
        assert_eq!(ModelKind::Road.label(), "ROAD BIKE");
        assert_eq!(ModelKind::Electric.label(), "ELECTRIC BIKE");
    }

    #[test]
    fn test_kind_deserialize_unknown() {
        let kind: ModelKind = serde_json::from_str("\"hover-board\"").unwrap();
        assert_eq!(kind, ModelKind::Road);
    }

    #[test]
    fn test_material_opacity_clamped() {
        let m = Material::matte([1.0, 1.0, 1.0]).with_opacity(1.7);
        assert_eq!(m.opacity, Some(1.0));
    }

    #[test]
    fn test_shape_instance_is_pod_sized() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 128);
    }

    #[test]
    fn test_instances_apply_model_matrix() {
        let geometry = GeometryDescription::new(vec![Shape {
            part: Part::Seat,
            primitive: Primitive::cuboid(1.0, 1.0, 1.0),
            position: [1.0, 0.0, 0.0],
            rotation: [0.0; 3],
            material: Material::matte([0.5; 3]),
        }]);

        let model = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let instances = geometry.instances(&model);

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].transform[3], [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(instances[0].opacity, 1.0);
    }
}
