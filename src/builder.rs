//! Builder primitives for procedural models
//!
//! Shapes are pushed in call order, which is the order the host draws them.
//! A group offset translates every shape pushed inside [`ShapeBuilder::group`],
//! the same way a scene-graph group with only a position would.
//!
//! # Examples
//!
//! ```
//! use bike_viewer::builder::ShapeBuilder;
//! use bike_viewer::types::{Material, Part, Primitive};
//! use glam::Vec3;
//!
//! let geometry = ShapeBuilder::new()
//!     .add(Part::Seat, Primitive::cuboid(0.35, 0.08, 0.5), Vec3::ZERO, Vec3::ZERO, Material::matte([0.1; 3]))
//!     .build();
//! assert_eq!(geometry.len(), 1);
//! ```

use glam::Vec3;

use crate::types::{GeometryDescription, Material, Part, Primitive, Shape};

/// Evenly spaced angles `i * TAU / count` for `i in 0..count`
pub fn radial_angles(count: usize) -> impl Iterator<Item = f32> {
    let step = std::f32::consts::TAU / count as f32;
    (0..count).map(move |i| i as f32 * step)
}

/// Points on an axis-aligned ellipse in the XY plane
pub fn ellipse_points(center: Vec3, radius_x: f32, radius_y: f32, count: usize) -> Vec<Vec3> {
    radial_angles(count)
        .map(|angle| center + Vec3::new(angle.cos() * radius_x, angle.sin() * radius_y, 0.0))
        .collect()
}

/// Fluent builder for shape lists
pub struct ShapeBuilder {
    shapes: Vec<Shape>,
    offset: Vec3,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            offset: Vec3::ZERO,
        }
    }

    /// Adds one shape at `position` (relative to the current group)
    pub fn add(
        mut self,
        part: Part,
        primitive: Primitive,
        position: Vec3,
        rotation: Vec3,
        material: Material,
    ) -> Self {
        self.shapes.push(Shape {
            part,
            primitive,
            position: (self.offset + position).to_array(),
            rotation: rotation.to_array(),
            material,
        });
        self
    }

    /// Adds a cylinder rotated to lie in the XY plane, as wheels and discs do
    pub fn add_disc(
        self,
        part: Part,
        primitive: Primitive,
        position: Vec3,
        material: Material,
    ) -> Self {
        self.add(
            part,
            primitive,
            position,
            Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            material,
        )
    }

    /// Adds `count` copies rotated about Z at equal angular spacing
    pub fn add_radial(
        mut self,
        part: Part,
        primitive: Primitive,
        count: usize,
        material: Material,
    ) -> Self {
        for angle in radial_angles(count) {
            self = self.add(part, primitive, Vec3::ZERO, Vec3::new(0.0, 0.0, angle), material);
        }
        self
    }

    /// Adds one shape per point
    pub fn add_along(
        mut self,
        part: Part,
        primitive: Primitive,
        points: impl IntoIterator<Item = Vec3>,
        material: Material,
    ) -> Self {
        for point in points {
            self = self.add(part, primitive, point, Vec3::ZERO, material);
        }
        self
    }

    /// Runs `f` with every shape it adds translated by `offset`
    pub fn group(mut self, offset: Vec3, f: impl FnOnce(Self) -> Self) -> Self {
        let outer = self.offset;
        self.offset = outer + offset;
        let mut built = f(self);
        built.offset = outer;
        built
    }

    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    pub fn build(self) -> GeometryDescription {
        GeometryDescription::new(self.shapes)
    }
}

impl Default for ShapeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Material {
        Material::matte([0.5; 3])
    }

    #[test]
    fn test_radial_angles_spacing() {
        let angles: Vec<f32> = radial_angles(4).collect();
        assert_eq!(angles.len(), 4);
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((angles[3] - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_group_offsets_and_restores() {
        let geometry = ShapeBuilder::new()
            .group(Vec3::new(1.0, 0.0, 0.0), |b| {
                b.add(Part::Hub(crate::types::Wheel::Front), Primitive::Sphere { radius: 0.1 }, Vec3::Y, Vec3::ZERO, grey())
            })
            .add(Part::Seat, Primitive::Sphere { radius: 0.1 }, Vec3::ZERO, Vec3::ZERO, grey())
            .build();

        assert_eq!(geometry.shapes()[0].position, [1.0, 1.0, 0.0]);
        assert_eq!(geometry.shapes()[1].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_nested_groups_accumulate() {
        let geometry = ShapeBuilder::new()
            .group(Vec3::X, |b| {
                b.group(Vec3::Y, |b| {
                    b.add(Part::Seat, Primitive::Sphere { radius: 0.1 }, Vec3::Z, Vec3::ZERO, grey())
                })
            })
            .build();

        assert_eq!(geometry.shapes()[0].position, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_add_radial_count() {
        let builder = ShapeBuilder::new().add_radial(Part::ChainLink, Primitive::cylinder(0.01, 1.0), 12, grey());
        assert_eq!(builder.count(), 12);
    }

    #[test]
    fn test_ellipse_points() {
        let points = ellipse_points(Vec3::ZERO, 2.0, 1.0, 4);
        assert!((points[0] - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        assert!((points[1] - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }
}
