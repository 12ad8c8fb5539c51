use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cadence the spin rate was originally tuned at
pub const REFERENCE_TICK_HZ: f32 = 60.0;
/// Spin per reference tick, in radians
pub const SPIN_PER_TICK: f32 = 0.008;

/// Tunable constants of the idle motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Spin around local Y, radians per second
    pub angular_rate: f32,
    /// Peak vertical bob
    pub amplitude: f32,
    /// Bob frequency, radians per second
    pub frequency: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            angular_rate: SPIN_PER_TICK * REFERENCE_TICK_HZ,
            amplitude: 0.15,
            frequency: 1.5,
        }
    }
}

/// Outer spin and bob contributed on top of the model's own placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTransform {
    pub rotation_y: f32,
    pub offset_y: f32,
}

impl AnimationTransform {
    pub const IDENTITY: Self = Self {
        rotation_y: 0.0,
        offset_y: 0.0,
    };
}

impl Default for AnimationTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Computes the idle motion from total elapsed time
///
/// Works from absolute elapsed time rather than per-frame deltas, so skipped
/// frames or a paused host never make the model drift.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationDriver {
    settings: AnimationSettings,
}

impl AnimationDriver {
    pub fn new(settings: AnimationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn advance(&self, elapsed: Duration) -> AnimationTransform {
        let t = elapsed.as_secs_f32();
        AnimationTransform {
            rotation_y: t * self.settings.angular_rate,
            offset_y: self.settings.amplitude * (t * self.settings.frequency).sin(),
        }
    }

    /// Gentle hover drift for overlays (label, particle cluster)
    pub fn float_offset(elapsed: Duration, speed: f32, intensity: f32) -> f32 {
        let t = elapsed.as_secs_f32();
        (t * speed / 4.0).sin() / 10.0 * intensity
    }
}

/// Placement of the model in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub position: [f32; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Placement {
    /// Model matrix with `motion` added to the placement's own Y rotation and height
    pub fn matrix(&self, motion: AnimationTransform) -> Mat4 {
        let [x, y, z] = self.position;
        let [rx, ry, rz] = self.rotation;

        Mat4::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            Quat::from_euler(EulerRot::XYZ, rx, ry + motion.rotation_y, rz),
            Vec3::new(x, y + motion.offset_y, z),
        )
    }
}
