use crate::math::Vec3;

/// How a vector passed to [`RigidBodyHandle::add_force`] is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Instant change in momentum (N·s).
    Impulse,
    /// Continuous force over the physics tick (N).
    Force,
    /// Continuous acceleration over the physics tick, mass-independent (m/s²).
    Acceleration,
}

/// The simulated rigid body a controller drives.
///
/// Provided by the physics engine. The controller is the only writer during a tick.
pub trait RigidBodyHandle {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn add_force(&mut self, force: Vec3, mode: ForceMode);
    fn set_drag(&mut self, drag: f32);
    fn set_gravity_enabled(&mut self, enabled: bool);
    fn set_kinematic(&mut self, kinematic: bool);
    fn is_kinematic(&self) -> bool;
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn scale(&self) -> Vec3;
    fn set_scale(&mut self, scale: Vec3);
}

/// Set only the vertical component of the body's scale.
pub(crate) fn set_y_scale<B: RigidBodyHandle + ?Sized>(body: &mut B, y: f32) {
    let s = body.scale();
    body.set_scale(Vec3::new(s.x, y, s.z));
}

impl<B: RigidBodyHandle + ?Sized> RigidBodyHandle for &mut B {
    fn velocity(&self) -> Vec3 {
        (**self).velocity()
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        (**self).set_velocity(velocity)
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        (**self).add_force(force, mode)
    }

    fn set_drag(&mut self, drag: f32) {
        (**self).set_drag(drag)
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        (**self).set_gravity_enabled(enabled)
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        (**self).set_kinematic(kinematic)
    }

    fn is_kinematic(&self) -> bool {
        (**self).is_kinematic()
    }

    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position)
    }

    fn scale(&self) -> Vec3 {
        (**self).scale()
    }

    fn set_scale(&mut self, scale: Vec3) {
        (**self).set_scale(scale)
    }
}
