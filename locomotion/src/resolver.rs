//! Movement force resolution and speed control.
//!
//! Each physics tick the controller builds a [`MotionFrame`] from fresh ground
//! facts and hands it here together with the current state's speed.

use crate::{
    body::{ForceMode, RigidBodyHandle},
    constants::{RENORMALIZE_DIAGONAL_INPUT, SLOPE_STICK_FORCE},
    ground::{GroundFacts, SlopeHit},
    look::OrientationProvider,
    math::{Vec2, Vec3, clamp_magnitude, normalize_or_zero, planar, project_on_plane, with_planar},
};

/// Transient per-tick movement facts. Rebuilt every physics tick and discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionFrame {
    /// Raw movement axes (`x` = horizontal, `y` = vertical).
    pub input: Vec2,
    /// World-space move direction derived from `input` and the orientation basis.
    pub move_direction: Vec3,
    pub grounded: bool,
    pub slope: Option<SlopeHit>,
    /// Grace flag: slope-follow forces are suspended until the body clears the surface.
    pub exiting_slope: bool,
}

impl MotionFrame {
    pub fn new(input: Vec2, move_direction: Vec3, facts: GroundFacts, exiting_slope: bool) -> Self {
        Self {
            input,
            move_direction,
            grounded: facts.grounded,
            slope: facts.slope,
            exiting_slope,
        }
    }

    /// Standing on a walkable slope, regardless of the grace flag.
    #[inline]
    pub fn on_walkable_slope(&self) -> bool {
        self.slope.is_some_and(|s| s.walkable)
    }

    /// Slope-follow movement applies: walkable slope and not leaving it.
    #[inline]
    pub fn follows_slope(&self) -> bool {
        self.on_walkable_slope() && !self.exiting_slope
    }
}

/// Which branch of the force policy ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceBranch {
    Slope,
    Ground,
    Air,
}

/// What [`apply_movement_forces`] did to the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceReport {
    pub branch: ForceBranch,
    /// Movement force applied (excluding the slope stick force).
    pub force: Vec3,
    /// Magnitude multiplier applied to the direction.
    pub scale: f32,
    pub gravity_enabled: bool,
}

/// `forward * vertical + right * horizontal`.
///
/// Not renormalized unless [`RENORMALIZE_DIAGONAL_INPUT`] is set.
pub fn move_direction<O: OrientationProvider + ?Sized>(orientation: &O, axes: Vec2) -> Vec3 {
    let dir = orientation.forward() * axes.y + orientation.right() * axes.x;
    if RENORMALIZE_DIAGONAL_INPUT && dir.norm_squared() > 1.0 {
        return dir.normalize();
    }
    dir
}

/// Apply this tick's movement force.
///
/// Priority:
/// 1. walkable slope (not exiting): along the slope plane, plus a downward stick force
///    while moving up;
/// 2. grounded: along the raw move direction;
/// 3. airborne: along the raw move direction, scaled by `air_multiplier`.
///
/// Gravity is disabled while on a walkable slope and enabled otherwise.
pub fn apply_movement_forces<B: RigidBodyHandle + ?Sized>(
    body: &mut B,
    frame: &MotionFrame,
    speed: f32,
    air_multiplier: f32,
) -> ForceReport {
    let (branch, force, scale) = match frame.slope.filter(|_| frame.follows_slope()) {
        Some(slope) => {
            let along = normalize_or_zero(&project_on_plane(&frame.move_direction, &slope.normal));
            let force = along * speed;
            body.add_force(force, ForceMode::Force);

            if body.velocity().y > 0.0 {
                body.add_force(-Vec3::y() * SLOPE_STICK_FORCE, ForceMode::Force);
            }
            (ForceBranch::Slope, force, speed)
        }
        None if frame.grounded => {
            let force = frame.move_direction * speed;
            body.add_force(force, ForceMode::Force);
            (ForceBranch::Ground, force, speed)
        }
        None => {
            let scale = speed * air_multiplier;
            let force = frame.move_direction * scale;
            body.add_force(force, ForceMode::Force);
            (ForceBranch::Air, force, scale)
        }
    };

    let gravity_enabled = !frame.on_walkable_slope();
    body.set_gravity_enabled(gravity_enabled);

    ForceReport {
        branch,
        force,
        scale,
        gravity_enabled,
    }
}

/// Clamp the body's velocity to `speed`.
///
/// On a followed slope the full 3-D velocity is clamped; otherwise only the planar part,
/// so falling and jumping are never capped by ground speed. Returns true if clamped.
pub fn speed_control<B: RigidBodyHandle + ?Sized>(
    body: &mut B,
    frame: &MotionFrame,
    speed: f32,
) -> bool {
    let velocity = body.velocity();

    if frame.follows_slope() {
        if velocity.norm() > speed {
            body.set_velocity(clamp_magnitude(&velocity, speed));
            return true;
        }
        return false;
    }

    let flat = planar(&velocity);
    if flat.norm() > speed {
        let limited = clamp_magnitude(&flat, speed);
        body.set_velocity(with_planar(&velocity, &limited));
        return true;
    }
    false
}
