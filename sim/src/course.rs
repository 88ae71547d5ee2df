//! Test course: a ground plane, a 20° ramp and a 2 m mantleable wall, laid out
//! along +Z from the spawn point.

use locomotion::{CollisionLayer, LayerMask, Vec3, WorldStaticDef, rapier_world::rapier3d::na};

pub const SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

pub const RAMP_ANGLE_DEG: f32 = 20.0;
const RAMP_HALF_EXTENTS: Vec3 = Vec3::new(5.0, 0.25, 6.0);
/// Z of the ramp's low edge.
const RAMP_START_Z: f32 = 18.0;

pub const WALL_Z: f32 = 70.0;
pub const WALL_HEIGHT: f32 = 2.0;

pub fn statics() -> Vec<WorldStaticDef> {
    let ground = LayerMask::of(&[CollisionLayer::Ground]);
    let climbable = LayerMask::of(&[CollisionLayer::Ground, CollisionLayer::Mantleable]);

    // Pitch the box so its +Z end rises, then place it so the top face's low
    // edge sits on the ground at `RAMP_START_Z`.
    let tilt = na::UnitQuaternion::from_axis_angle(
        &na::Vector3::x_axis(),
        -RAMP_ANGLE_DEG.to_radians(),
    );
    let low_edge = tilt * Vec3::new(0.0, RAMP_HALF_EXTENTS.y, -RAMP_HALF_EXTENTS.z);
    let ramp_center = Vec3::new(0.0, -low_edge.y, RAMP_START_Z - low_edge.z);

    vec![
        WorldStaticDef::ground_plane(0, 0.0, ground),
        WorldStaticDef::cuboid(1, ramp_center, RAMP_HALF_EXTENTS, tilt, ground),
        WorldStaticDef::cuboid(
            2,
            Vec3::new(0.0, WALL_HEIGHT * 0.5, WALL_Z),
            Vec3::new(12.0, WALL_HEIGHT * 0.5, 0.5),
            na::UnitQuaternion::identity(),
            climbable,
        ),
    ]
}
