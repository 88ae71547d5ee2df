//! Tick rates and dt clamps for the simulation loop.

/// Fixed physics tick frequency (Hz).
pub const DEFAULT_PHYSICS_HZ: u32 = 50;

/// Nominal frame tick frequency (Hz).
pub const DEFAULT_FRAME_HZ: u32 = 60;

/// Max dt (seconds) a single frame may feed into the physics accumulator.
///
/// A long stall would otherwise queue many physics steps at once.
pub const MAX_FRAME_DT_S: f32 = 0.10;

/// Relative jitter applied to the nominal frame dt so frame and physics ticks drift
/// against each other like a real render loop.
pub const FRAME_JITTER: f32 = 0.2;

/// Default scripted run length (seconds).
pub const DEFAULT_RUN_SECONDS: f32 = 20.0;
