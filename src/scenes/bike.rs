use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

use super::palette::Palette;
use crate::builder::{ellipse_points, ShapeBuilder};
use crate::types::{GeometryDescription, Material, ModelParameters, Part, Primitive, Wheel};

pub const SPOKE_COUNT: usize = 12;
pub const CHAIN_LINKS: usize = 20;

pub const FRONT_WHEEL_CENTER: Vec3 = Vec3::new(1.1, -0.7, 0.0);
pub const REAR_WHEEL_CENTER: Vec3 = Vec3::new(-0.7, -0.7, 0.0);

const TIRE_RADIUS: f32 = 0.7;
const RIM_RADIUS: f32 = 0.72;
const SPOKE_LENGTH: f32 = 1.3;
const BOTTOM_BRACKET: Vec3 = Vec3::new(0.0, -0.4, 0.0);
const HANDLEBAR_CENTER: Vec3 = Vec3::new(1.1, 1.0, 0.0);

/// Builds the procedural bike for `params`
///
/// Pure and deterministic: the same inputs always give the same ordered shape
/// list. `emphasized` swaps the frame members to the accent color and nothing
/// else, so both palettes share shape count, dimensions and placement.
pub fn generate(params: &ModelParameters, emphasized: bool) -> GeometryDescription {
    let palette = Palette::select(emphasized, params.accent);

    let builder = frame(ShapeBuilder::new(), &palette);
    let builder = wheel(builder, Wheel::Front, &palette);
    let builder = wheel(builder, Wheel::Rear, &palette);
    let builder = builder.add(
        Part::Seat,
        Primitive::cuboid(0.35, 0.08, 0.5),
        Vec3::new(-0.7, 0.75, 0.0),
        Vec3::ZERO,
        Material::metallic(palette.dark, 0.0, 0.8),
    );
    let builder = drivetrain(builder, &palette);

    builder.build()
}

fn frame(builder: ShapeBuilder, palette: &Palette) -> ShapeBuilder {
    let tube = Material::metallic(palette.frame, 0.9, 0.1);
    let post = Material::metallic(palette.tube, 0.8, 0.2);
    let grip = Material::matte(palette.trim);
    let bar_rotation = Vec3::new(FRAC_PI_2, 0.0, 0.0);

    builder
        // Main triangle
        .add(Part::FrameTube, Primitive::cylinder(0.03, 1.8), Vec3::ZERO, Vec3::new(0.0, 0.0, FRAC_PI_6), tube)
        .add(Part::FrameTube, Primitive::cylinder(0.03, 1.4), Vec3::new(0.4, -0.2, 0.0), Vec3::new(0.0, 0.0, -FRAC_PI_4), tube)
        .add(Part::FrameTube, Primitive::cylinder(0.03, 1.0), Vec3::new(-0.2, -0.1, 0.0), Vec3::new(0.0, 0.0, FRAC_PI_3), tube)
        .add(Part::SeatTube, Primitive::cylinder(0.025, 0.7), Vec3::new(-0.7, 0.4, 0.0), Vec3::ZERO, post)
        .add(Part::HeadTube, Primitive::cylinder(0.025, 0.5), Vec3::new(1.1, 0.7, 0.0), Vec3::ZERO, post)
        .add(
            Part::Handlebar,
            Primitive::cylinder(0.02, 0.8),
            HANDLEBAR_CENTER,
            bar_rotation,
            Material::metallic(palette.bar, 0.7, 0.3),
        )
        // Grips stand upright at the bar ends
        .add(Part::Grip, Primitive::cylinder(0.04, 0.15), HANDLEBAR_CENTER + Vec3::new(0.0, 0.0, 0.35), Vec3::ZERO, grip)
        .add(Part::Grip, Primitive::cylinder(0.04, 0.15), HANDLEBAR_CENTER + Vec3::new(0.0, 0.0, -0.35), Vec3::ZERO, grip)
}

fn wheel(builder: ShapeBuilder, which: Wheel, palette: &Palette) -> ShapeBuilder {
    let center = match which {
        Wheel::Front => FRONT_WHEEL_CENTER,
        Wheel::Rear => REAR_WHEEL_CENTER,
    };

    builder.group(center, |b| {
        let b = b
            .add_disc(
                Part::Tire(which),
                Primitive::cylinder(TIRE_RADIUS, 0.05),
                Vec3::ZERO,
                Material::metallic(palette.tire, 0.95, 0.05),
            )
            .add_disc(
                Part::Rim(which),
                Primitive::cylinder(RIM_RADIUS, 0.02),
                Vec3::ZERO,
                Material::metallic(palette.rim, 0.8, 0.2),
            )
            .add_radial(
                Part::Spoke(which),
                Primitive::cylinder(0.008, SPOKE_LENGTH),
                SPOKE_COUNT,
                Material::metallic(palette.spoke, 0.9, 0.1),
            )
            .add_disc(
                Part::Hub(which),
                Primitive::cylinder(0.1, 0.12),
                Vec3::ZERO,
                Material::metallic(palette.hub, 0.9, 0.1),
            );

        match which {
            Wheel::Front => b,
            Wheel::Rear => b.add_disc(
                Part::Cassette,
                Primitive::Cylinder {
                    radius_top: 0.12,
                    radius_bottom: 0.08,
                    height: 0.04,
                },
                Vec3::new(0.0, 0.0, -0.08),
                Material::metallic(palette.dark, 0.8, 0.2),
            ),
        }
    })
}

fn drivetrain(builder: ShapeBuilder, palette: &Palette) -> ShapeBuilder {
    let arm = Material::metallic(palette.dark, 0.8, 0.2);
    let pedal = Material::matte(palette.trim);
    let link = Material::metallic(palette.chain, 0.8, 0.2);

    builder
        .add_disc(
            Part::Crankset,
            Primitive::cylinder(0.25, 0.03),
            BOTTOM_BRACKET,
            Material::metallic(palette.hub, 0.9, 0.1),
        )
        // Arms at opposing angles
        .add(Part::CrankArm, Primitive::cylinder(0.02, 0.35), BOTTOM_BRACKET + Vec3::new(0.15, 0.0, 0.0), Vec3::new(0.0, 0.0, FRAC_PI_4), arm)
        .add(Part::CrankArm, Primitive::cylinder(0.02, 0.35), BOTTOM_BRACKET + Vec3::new(-0.15, 0.0, 0.0), Vec3::new(0.0, 0.0, -FRAC_PI_4), arm)
        .add(Part::Pedal, Primitive::cuboid(0.25, 0.06, 0.1), Vec3::new(0.25, -0.65, 0.0), Vec3::ZERO, pedal)
        .add(Part::Pedal, Primitive::cuboid(0.25, 0.06, 0.1), Vec3::new(-0.25, -0.15, 0.0), Vec3::ZERO, pedal)
        .add_along(
            Part::ChainLink,
            Primitive::cuboid(0.03, 0.01, 0.01),
            ellipse_points(BOTTOM_BRACKET + Vec3::new(-0.2, 0.0, 0.0), 0.4, 0.1, CHAIN_LINKS),
            link,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelKind;

    #[test]
    fn test_shape_count_is_fixed() {
        // 8 frame + 2 * (tire, rim, 12 spokes, hub) + cassette + seat + 5 drivetrain + 20 links
        let expected = 8 + 2 * (3 + SPOKE_COUNT) + 1 + 1 + 5 + CHAIN_LINKS;
        for kind in ModelKind::ALL {
            assert_eq!(generate(&kind.into(), false).len(), expected);
            assert_eq!(generate(&kind.into(), true).len(), expected);
        }
    }

    #[test]
    fn test_wheels_centred_on_hubs() {
        let geometry = generate(&ModelKind::Road.into(), false);
        let hub = |w| geometry.iter().find(|s| s.part == Part::Hub(w)).unwrap().position;

        assert_eq!(hub(Wheel::Front), FRONT_WHEEL_CENTER.to_array());
        assert_eq!(hub(Wheel::Rear), REAR_WHEEL_CENTER.to_array());
    }

    #[test]
    fn test_crank_arms_oppose() {
        let geometry = generate(&ModelKind::Racing.into(), false);
        let arms: Vec<_> = geometry.iter().filter(|s| s.part == Part::CrankArm).collect();

        assert_eq!(arms.len(), 2);
        assert_eq!(arms[0].rotation[2], -arms[1].rotation[2]);
    }

    #[test]
    fn test_emphasis_tints_frame_tubes() {
        let params = ModelParameters::new(ModelKind::Mountain);
        let geometry = generate(&params, true);

        for tube in geometry.iter().filter(|s| s.part == Part::FrameTube) {
            assert_eq!(tube.material.color, params.accent);
        }
    }

    #[test]
    fn test_grips_sit_unrotated_at_bar_ends() {
        let geometry = generate(&ModelKind::Road.into(), false);
        let grips: Vec<_> = geometry.iter().filter(|s| s.part == Part::Grip).collect();

        assert_eq!(grips.len(), 2);
        for grip in &grips {
            assert_eq!(grip.rotation, [0.0; 3]);
            assert_eq!(grip.position[2].abs(), 0.35);
        }
    }

    #[test]
    fn test_custom_accent_reaches_frame_only_when_emphasized() {
        let custom = [0.1, 0.2, 0.3];
        let params = ModelParameters::new(ModelKind::Road).with_accent(custom);

        let emphasized = generate(&params, true);
        assert!(emphasized
            .iter()
            .filter(|s| s.part == Part::FrameTube)
            .all(|s| s.material.color == custom));

        let neutral = generate(&params, false);
        assert_eq!(neutral, generate(&ModelKind::Road.into(), false));
    }
}
