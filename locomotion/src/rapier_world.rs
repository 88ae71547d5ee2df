//! `rapier3d` implementations of the controller's collaborators.
//!
//! [`PhysicsWorld`] owns the Rapier sets and pipeline. It is shared between
//! the query adapter and the body adapter through [`SharedWorld`]; everything
//! runs on one thread, so a borrow that is already taken just means the
//! adapter call degrades (no hit, unchanged body) with a warning.

use std::{cell::RefCell, rc::Rc};

pub use rapier3d;

use rapier3d::prelude::*;

use crate::{
    body::{ForceMode, RigidBodyHandle as BodyHandle},
    layers::{CollisionLayer, LayerMask},
    math::{Vec3, normalize_or_zero},
    query::{GeometryQuery, RayHit},
    rapier::{WorldStaticDef, collider_from_def, layers_of, layers_to_user_data},
};

pub type SharedWorld = Rc<RefCell<PhysicsWorld>>;

/// Capsule used for a character at scale 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterShape {
    pub radius: f32,
    /// Total height including both caps.
    pub height: f32,
    pub mass: f32,
}

impl CharacterShape {
    /// Capsule half height (cylinder part) after scaling the total height by `y_scale`.
    pub fn half_height(&self, y_scale: f32) -> f32 {
        (self.height * y_scale * 0.5 - self.radius).max(0.0)
    }
}

impl Default for CharacterShape {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            mass: 1.0,
        }
    }
}

/// Handles of a spawned character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

pub struct PhysicsWorld {
    pub gravity: Vec3,
    pub integration_parameters: IntegrationParameters,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    islands: IslandManager,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pipeline: PhysicsPipeline,
}

impl PhysicsWorld {
    /// Build a world from static level geometry.
    ///
    /// Statics are inserted in `id` order as fixed bodies, then one step runs so
    /// scene queries see them immediately.
    pub fn build(mut statics: Vec<WorldStaticDef>) -> Self {
        statics.sort_by_key(|d| d.id);

        let mut world = Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            integration_parameters: IntegrationParameters::default(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            islands: IslandManager::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
        };

        for def in &statics {
            let rb = RigidBodyBuilder::fixed().pose(def.pose()).build();
            let rb_handle = world.bodies.insert(rb);
            world
                .colliders
                .insert_with_parent(collider_from_def(def), rb_handle, &mut world.bodies);
        }

        let dt = world.integration_parameters.dt;
        world.step(dt);
        log::debug!("Physics world built with {} statics", statics.len());
        world
    }

    pub fn into_shared(self) -> SharedWorld {
        Rc::new(RefCell::new(self))
    }

    /// Insert a dynamic, rotation-locked capsule standing at `position`.
    pub fn spawn_character(&mut self, position: Vec3, shape: CharacterShape) -> CharacterHandles {
        let rb = RigidBodyBuilder::dynamic()
            .translation(position)
            .lock_rotations()
            .ccd_enabled(true)
            .build();
        let body = self.bodies.insert(rb);

        let collider = ColliderBuilder::capsule_y(shape.half_height(1.0), shape.radius)
            .mass(shape.mass)
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .user_data(layers_to_user_data(LayerMask::of(&[
                CollisionLayer::Character,
            ])))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        CharacterHandles { body, collider }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Forces added through [`RapierBody`] act for exactly one step and are cleared
    /// afterwards.
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        for (_, rb) in self.bodies.iter_mut() {
            if rb.is_dynamic() {
                rb.reset_forces(false);
            }
        }
    }

    /// Borrowed query view over the current broad phase.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Nearest hit on a collider whose layers intersect `layers`.
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit> {
        let dir = normalize_or_zero(&direction);
        if dir == Vec3::zeros() {
            return None;
        }

        let on_layers =
            |_: ColliderHandle, collider: &Collider| layers_of(collider).intersects(layers);
        let mut filter = QueryFilter::default().predicate(&on_layers);
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }

        let ray = Ray::new(Point::from(origin), dir);
        let (_, hit) = self
            .query_pipeline(filter)
            .cast_ray_and_get_normal(&ray, max_distance, true)?;

        Some(RayHit {
            point: ray.point_at(hit.time_of_impact).coords,
            normal: hit.normal,
            distance: hit.time_of_impact,
        })
    }
}

/// [`GeometryQuery`] over a shared world, optionally ignoring one body (the
/// character itself).
#[derive(Clone)]
pub struct RapierQuery {
    world: SharedWorld,
    exclude: Option<RigidBodyHandle>,
}

impl RapierQuery {
    pub fn new(world: SharedWorld) -> Self {
        Self {
            world,
            exclude: None,
        }
    }

    pub fn excluding(mut self, body: RigidBodyHandle) -> Self {
        self.exclude = Some(body);
        self
    }
}

impl GeometryQuery for RapierQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        let Ok(world) = self.world.try_borrow() else {
            log::warn!("Physics world busy; treating raycast as no hit");
            return None;
        };
        world.cast_ray(origin, direction, max_distance, filter, self.exclude)
    }
}

/// Body adapter for a character spawned with [`PhysicsWorld::spawn_character`].
///
/// Scale is not a Rapier concept; it is kept here and applied by rebuilding the
/// capsule with a scaled height.
pub struct RapierBody {
    world: SharedWorld,
    handles: CharacterHandles,
    shape: CharacterShape,
    scale: Vec3,
}

impl RapierBody {
    pub fn new(world: SharedWorld, handles: CharacterHandles, shape: CharacterShape) -> Self {
        Self {
            world,
            handles,
            shape,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn handles(&self) -> CharacterHandles {
        self.handles
    }

    fn read<R>(&self, f: impl FnOnce(&RigidBody) -> R) -> Option<R> {
        let Ok(world) = self.world.try_borrow() else {
            log::warn!("Physics world busy; body read skipped");
            return None;
        };
        world.bodies.get(self.handles.body).map(f)
    }

    fn write(&self, f: impl FnOnce(&mut RigidBody)) {
        let Ok(mut world) = self.world.try_borrow_mut() else {
            log::warn!("Physics world busy; body write skipped");
            return;
        };
        if let Some(rb) = world.bodies.get_mut(self.handles.body) {
            f(rb);
        }
    }
}

impl BodyHandle for RapierBody {
    fn velocity(&self) -> Vec3 {
        self.read(|rb| *rb.linvel()).unwrap_or_else(Vec3::zeros)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.write(|rb| rb.set_linvel(velocity, true));
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        self.write(|rb| match mode {
            ForceMode::Impulse => rb.apply_impulse(force, true),
            ForceMode::Force => rb.add_force(force, true),
            ForceMode::Acceleration => {
                let mass = rb.mass();
                rb.add_force(force * mass, true);
            }
        });
    }

    fn set_drag(&mut self, drag: f32) {
        self.write(|rb| rb.set_linear_damping(drag));
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.write(|rb| rb.set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true));
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.write(|rb| {
            let body_type = if kinematic {
                RigidBodyType::KinematicPositionBased
            } else {
                RigidBodyType::Dynamic
            };
            if rb.body_type() != body_type {
                rb.set_body_type(body_type, true);
                rb.set_linvel(Vec3::zeros(), true);
            }
        });
    }

    fn is_kinematic(&self) -> bool {
        self.read(|rb| rb.is_kinematic()).unwrap_or(false)
    }

    fn position(&self) -> Vec3 {
        self.read(|rb| *rb.translation())
            .unwrap_or_else(Vec3::zeros)
    }

    fn set_position(&mut self, position: Vec3) {
        self.write(|rb| {
            rb.set_translation(position, true);
            if rb.is_kinematic() {
                rb.set_next_kinematic_translation(position);
            }
        });
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        let Ok(mut world) = self.world.try_borrow_mut() else {
            log::warn!("Physics world busy; collider resize skipped");
            return;
        };
        if let Some(collider) = world.colliders.get_mut(self.handles.collider) {
            let half_height = self.shape.half_height(scale.y);
            collider.set_shape(SharedShape::capsule_y(half_height, self.shape.radius));
        }
    }
}
