//! View orientation.
//!
//! Movement input is mapped into world space through a yaw-only basis; mantle
//! probes follow the full (pitched) view direction.

use crate::math::{Vec2, Vec3, normalize_or_zero};

/// Supplies the orientation basis used to map input axes into world space.
pub trait OrientationProvider {
    /// Planar forward unit vector.
    fn forward(&self) -> Vec3;
    /// Planar right unit vector.
    fn right(&self) -> Vec3;
    /// Unit view direction, including pitch.
    fn view_direction(&self) -> Vec3;

    /// Feed raw look input for one frame. Fixed providers ignore it.
    fn apply_look(&mut self, _look_axes: Vec2, _dt: f32) {}
}

/// A fixed orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub view: Vec3,
}

impl Basis {
    /// Basis facing `forward` (flattened onto XZ) with a level view.
    pub fn facing(forward: Vec3) -> Self {
        let forward = normalize_or_zero(&Vec3::new(forward.x, 0.0, forward.z));
        // Left-handed convention: right = up x forward.
        let right = Vec3::y().cross(&forward);
        Self {
            forward,
            right,
            view: forward,
        }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::facing(Vec3::z())
    }
}

impl OrientationProvider for Basis {
    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }

    fn view_direction(&self) -> Vec3 {
        self.view
    }
}

/// Mouse-look rig: accumulates yaw/pitch from raw look axes.
///
/// Angles are in degrees. Yaw 0 faces +Z; positive yaw turns toward +X.
/// Positive pitch looks down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookRig {
    pub yaw: f32,
    pub pitch: f32,
    sens_x: f32,
    sens_y: f32,
    look_limit: f32,
}

impl LookRig {
    pub fn new(sens_x: f32, sens_y: f32, look_limit: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sens_x,
            sens_y,
            look_limit: look_limit.abs(),
        }
    }

    pub fn from_config(config: &crate::LocomotionConfig) -> Self {
        Self::new(config.sens_x, config.sens_y, config.look_limit)
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}

impl OrientationProvider for LookRig {
    fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(sin_yaw, 0.0, cos_yaw)
    }

    fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos_yaw, 0.0, -sin_yaw)
    }

    fn view_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let forward = self.forward();
        Vec3::new(
            forward.x * cos_pitch,
            -sin_pitch,
            forward.z * cos_pitch,
        )
    }

    fn apply_look(&mut self, look_axes: Vec2, dt: f32) {
        self.yaw += look_axes.x * dt * self.sens_x;
        self.pitch -= look_axes.y * dt * self.sens_y;
        self.pitch = self.pitch.clamp(-self.look_limit, self.look_limit);
    }
}
