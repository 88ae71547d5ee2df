//! Ground and slope classification from downward ray probes.
//!
//! Both probes start at the body origin and point straight down:
//! - grounded: `body_height / 2 + GROUND_PROBE_MARGIN`
//! - slope:    `body_height / 2 + SLOPE_PROBE_MARGIN`
//!
//! The functions here have no side effects; with unchanged position and geometry
//! they return the same answer every time.

use crate::{
    config::LocomotionConfig,
    constants::{GROUND_PROBE_MARGIN, SLOPE_PROBE_MARGIN},
    math::{Vec3, angle_from_up_deg},
    query::{GeometryQuery, checked_raycast},
};

/// Surface found under the body by the slope probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeHit {
    /// Unit surface normal.
    pub normal: Vec3,
    /// Distance from the body origin to the surface (meters).
    pub distance: f32,
    /// Angle between world up and the normal (degrees).
    pub angle_deg: f32,
    /// `0 < angle < max_slope_angle`. Perfectly flat ground is not a slope.
    pub walkable: bool,
}

/// Ground facts for one body position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundFacts {
    pub grounded: bool,
    pub slope: Option<SlopeHit>,
}

impl GroundFacts {
    /// The walkable slope under the body, if any.
    #[inline]
    pub fn walkable_slope(&self) -> Option<&SlopeHit> {
        self.slope.as_ref().filter(|s| s.walkable)
    }
}

/// Is there ground within the grounded probe below `position`?
pub fn is_grounded<Q: GeometryQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    config: &LocomotionConfig,
) -> bool {
    let max_distance = config.body_height * 0.5 + GROUND_PROBE_MARGIN;
    checked_raycast(
        query,
        position,
        -Vec3::y(),
        max_distance,
        config.ground_layers,
    )
    .is_some()
}

/// Probe the surface under `position` and classify its slope.
///
/// Returns `None` when nothing is hit within the slope probe.
pub fn classify_slope<Q: GeometryQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    config: &LocomotionConfig,
) -> Option<SlopeHit> {
    let max_distance = config.body_height * 0.5 + SLOPE_PROBE_MARGIN;
    let hit = checked_raycast(
        query,
        position,
        -Vec3::y(),
        max_distance,
        config.ground_layers,
    )?;

    let normal = hit.normal.normalize();
    let angle_deg = angle_from_up_deg(&normal);

    Some(SlopeHit {
        normal,
        distance: hit.distance,
        angle_deg,
        walkable: angle_deg > 0.0 && angle_deg < config.max_slope_angle,
    })
}

/// Run both probes.
pub fn classify<Q: GeometryQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    config: &LocomotionConfig,
) -> GroundFacts {
    GroundFacts {
        grounded: is_grounded(query, position, config),
        slope: classify_slope(query, position, config),
    }
}
