//! Scripted collaborators for unit tests.

use std::cell::Cell;

use crate::{
    body::{ForceMode, RigidBodyHandle},
    layers::{CollisionLayer, LayerMask},
    math::Vec3,
    query::{GeometryQuery, RayHit},
};

/// Geometry with at most one floor (answers downward rays) and one wall (answers every
/// other ray with a canned hit).
pub struct MockQuery {
    floor: Option<(f32, Vec3, LayerMask)>,
    wall: Option<(RayHit, LayerMask)>,
    calls: Cell<usize>,
}

impl MockQuery {
    pub fn empty() -> Self {
        Self {
            floor: None,
            wall: None,
            calls: Cell::new(0),
        }
    }

    /// Floor at height `y` with surface normal `normal` on the ground layer.
    pub fn floor(y: f32, normal: Vec3) -> Self {
        Self {
            floor: Some((y, normal, LayerMask::of(&[CollisionLayer::Ground]))),
            ..Self::empty()
        }
    }

    /// Add a mantleable wall returning `hit` for non-downward rays.
    pub fn with_wall(mut self, hit: RayHit) -> Self {
        self.wall = Some((hit, LayerMask::of(&[CollisionLayer::Mantleable])));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl GeometryQuery for MockQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        self.calls.set(self.calls.get() + 1);

        if direction.y < -0.99 {
            let (y, normal, layers) = self.floor?;
            let distance = origin.y - y;
            if !filter.intersects(layers) || distance < 0.0 || distance > max_distance {
                return None;
            }
            return Some(RayHit {
                point: Vec3::new(origin.x, y, origin.z),
                normal,
                distance,
            });
        }

        let (hit, layers) = self.wall?;
        if filter.intersects(layers) && hit.distance <= max_distance {
            Some(hit)
        } else {
            None
        }
    }
}

/// Rigid body that integrates forces into velocity as soon as they are added and
/// records every force for inspection.
pub struct MockBody {
    pub velocity: Vec3,
    pub position: Vec3,
    pub scale: Vec3,
    pub drag: f32,
    pub gravity_enabled: bool,
    pub kinematic: bool,
    /// Ignore `set_kinematic(true)`, like an engine refusing the mode switch.
    pub refuse_kinematic: bool,
    pub mass: f32,
    /// Duration one `ForceMode::Force` call acts over.
    pub dt: f32,
    pub forces: Vec<(Vec3, ForceMode)>,
}

impl MockBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            velocity: Vec3::zeros(),
            position,
            scale: Vec3::new(1.0, 1.0, 1.0),
            drag: 0.0,
            gravity_enabled: true,
            kinematic: false,
            refuse_kinematic: false,
            mass: 1.0,
            dt: 0.02,
            forces: Vec::new(),
        }
    }

    pub fn forces_of(&self, mode: ForceMode) -> Vec<Vec3> {
        self.forces
            .iter()
            .filter(|(_, m)| *m == mode)
            .map(|(f, _)| *f)
            .collect()
    }
}

impl RigidBodyHandle for MockBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        self.forces.push((force, mode));
        if self.kinematic {
            return;
        }
        match mode {
            ForceMode::Impulse => self.velocity += force / self.mass,
            ForceMode::Force => self.velocity += force * (self.dt / self.mass),
            ForceMode::Acceleration => self.velocity += force * self.dt,
        }
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        if kinematic && self.refuse_kinematic {
            return;
        }
        self.kinematic = kinematic;
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}
