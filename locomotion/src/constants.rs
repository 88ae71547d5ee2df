/// Extra ray length below the body's half height for the grounded probe (meters).
pub const GROUND_PROBE_MARGIN: f32 = 0.2;

/// Extra ray length below the body's half height for the slope probe (meters).
///
/// Slightly longer than [`GROUND_PROBE_MARGIN`] so slopes are still seen while the
/// body hovers over the crest of a ramp.
pub const SLOPE_PROBE_MARGIN: f32 = 0.3;

/// Downward force added on a walkable slope while moving up, so the body does not
/// launch off the crest.
pub const SLOPE_STICK_FORCE: f32 = 5.0;

/// Downward impulse applied when crouching starts to keep ground contact after shrinking.
pub const CROUCH_DOWN_IMPULSE: f32 = 5.0;

/// A mantle ends this far above the probed ledge point (meters).
pub const MANTLE_TARGET_LIFT: f32 = 1.0;

/// Whether diagonal input is renormalized before forces are applied.
///
/// Legacy behavior keeps `forward * v + right * h` as-is, so diagonal movement
/// pushes harder than axis-aligned movement.
pub const RENORMALIZE_DIAGONAL_INPUT: bool = false;

/// Planar speed below which the body counts as standing still (m/s).
pub const STILL_SPEED_EPS: f32 = 1.0e-4;
