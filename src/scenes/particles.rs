use glam::Vec3;
use rand::Rng;

use crate::math::Rgb;
use crate::types::{Material, Part, Primitive, Shape};

pub const PARTICLE_COUNT: usize = 15;
/// Edge length of the cube the particles are scattered in, centred on the model
pub const PARTICLE_SPREAD: f32 = 5.0;
pub const PARTICLE_RADIUS: f32 = 0.02;
pub const PARTICLE_OPACITY: f32 = 0.6;

/// Scatters the hover particle set, drawing three values per particle from `rng`
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, color: Rgb) -> Vec<Shape> {
    let material = Material::matte(color).with_opacity(PARTICLE_OPACITY);

    (0..PARTICLE_COUNT)
        .map(|_| {
            let position = Vec3::new(
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
            ) * PARTICLE_SPREAD;

            Shape {
                part: Part::Particle,
                primitive: Primitive::Sphere {
                    radius: PARTICLE_RADIUS,
                },
                position: position.to_array(),
                rotation: [0.0; 3],
                material,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scatter_within_spread() {
        let mut rng = StdRng::seed_from_u64(3);
        let particles = scatter(&mut rng, [0.0, 1.0, 0.0]);

        assert_eq!(particles.len(), PARTICLE_COUNT);
        let half = PARTICLE_SPREAD * 0.5;
        for p in &particles {
            assert!(p.position.iter().all(|c| c.abs() <= half));
            assert_eq!(p.material.opacity, Some(PARTICLE_OPACITY));
            assert_eq!(p.part, Part::Particle);
        }
    }

    #[test]
    fn test_scatter_same_seed_same_positions() {
        let a = scatter(&mut StdRng::seed_from_u64(42), [1.0; 3]);
        let b = scatter(&mut StdRng::seed_from_u64(42), [1.0; 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_scatter_advances_rng() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = scatter(&mut rng, [1.0; 3]);
        let second = scatter(&mut rng, [1.0; 3]);
        assert_ne!(first, second);
    }
}
