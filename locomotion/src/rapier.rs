//! Static level geometry for the `rapier3d` world.
//!
//! Every collider carries its [`LayerMask`] in `Collider::user_data` so ray
//! queries can filter by layer without a side table.

use rapier3d::{
    na::{Translation3, UnitQuaternion},
    prelude::*,
};

use crate::{layers::LayerMask, math::Vec3};

/// One immutable collider in the level.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Sort key; statics are inserted in `id` order.
    pub id: u32,
    pub translation: Vec3,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    pub layers: LayerMask,
}

#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite half-space whose surface normal is `rotation * +Y`, shifted by
    /// `offset_along_normal` from the pose origin.
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vec3 },
    Sphere { radius: f32 },
    CapsuleY { radius: f32, half_height: f32 },
    CylinderY { radius: f32, half_height: f32 },
}

impl WorldStaticDef {
    /// Horizontal ground plane at height `y`.
    pub fn ground_plane(id: u32, y: f32, layers: LayerMask) -> Self {
        Self {
            id,
            translation: Vec3::new(0.0, y, 0.0),
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            layers,
        }
    }

    /// Box centered at `center`.
    pub fn cuboid(
        id: u32,
        center: Vec3,
        half_extents: Vec3,
        rotation: UnitQuaternion<f32>,
        layers: LayerMask,
    ) -> Self {
        Self {
            id,
            translation: center,
            rotation,
            shape: ColliderShapeDef::Cuboid { half_extents },
            layers,
        }
    }

    pub fn pose(&self) -> Isometry<Real> {
        Isometry::from_parts(Translation3::from(self.translation), self.rotation)
    }
}

/// Layer tag stored in `Collider::user_data`.
#[inline]
pub fn layers_to_user_data(layers: LayerMask) -> u128 {
    u128::from(layers.bits)
}

/// Layers of a collider created by this crate. Foreign colliders (zero user data)
/// belong to no layer.
#[inline]
pub fn layers_of(collider: &Collider) -> LayerMask {
    LayerMask::from_bits((collider.user_data & u128::from(u32::MAX)) as u32)
}

/// Collider for `def`, in the local frame of a fixed parent body posed at `def.pose()`.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::halfspace(Vector::y_axis())
            .translation(Vector::y() * *offset_along_normal),
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };

    builder
        .user_data(layers_to_user_data(def.layers))
        .build()
}
