pub mod body;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod ground;
pub mod input;
pub mod layers;
pub mod look;
pub mod maneuver;
pub mod math;
pub mod query;
pub mod rapier;
pub mod rapier_world;
pub mod resolver;
pub mod state;

#[cfg(test)]
mod test_support;

pub use body::{ForceMode, RigidBodyHandle};
pub use config::LocomotionConfig;
pub use constants::{
    CROUCH_DOWN_IMPULSE, GROUND_PROBE_MARGIN, MANTLE_TARGET_LIFT, RENORMALIZE_DIAGONAL_INPUT,
    SLOPE_PROBE_MARGIN, SLOPE_STICK_FORCE,
};
pub use controller::{JumpCooldown, LocomotionController, LocomotionEvent};
pub use error::ConfigError;
pub use ground::{GroundFacts, SlopeHit, classify, classify_slope, is_grounded};
pub use input::{Action, ActionButtons, InputFrame};
pub use layers::{BitmaskFlags, CollisionLayer, FlagBitmask, LayerMask};
pub use look::{Basis, LookRig, OrientationProvider};
pub use maneuver::{ManeuverEnd, ManeuverKind, ManeuverScheduler, ManeuverTask, StartOutcome};
pub use math::{Vec2, Vec3};
pub use query::{GeometryQuery, RayHit};
pub use rapier::{ColliderShapeDef, WorldStaticDef, collider_from_def};
pub use rapier_world::{
    CharacterHandles, CharacterShape, PhysicsWorld, RapierBody, RapierQuery, SharedWorld,
};
pub use resolver::{
    ForceBranch, ForceReport, MotionFrame, apply_movement_forces, move_direction, speed_control,
};
pub use state::{MovementState, StateParams};
