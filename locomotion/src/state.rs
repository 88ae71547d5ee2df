//! Discrete movement state and its per-state tuning.

use std::fmt;

use crate::config::LocomotionConfig;

/// The character's movement state. Exactly one is active at any tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementState {
    #[default]
    Walking,
    Crouching,
    Sprinting,
    Airborne,
    Diving,
    Sliding,
    Mantling,
}

/// Speed limit and drag for a state. `drag: None` leaves the body's drag as it was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateParams {
    pub speed: f32,
    pub drag: Option<f32>,
}

impl MovementState {
    /// True for states owned by a running maneuver.
    #[inline]
    pub fn is_maneuver(self) -> bool {
        matches!(
            self,
            MovementState::Diving | MovementState::Sliding | MovementState::Mantling
        )
    }

    /// Per-state speed and drag.
    pub fn params(self, config: &LocomotionConfig) -> StateParams {
        match self {
            MovementState::Walking => StateParams {
                speed: config.walk_speed,
                drag: Some(config.ground_drag),
            },
            MovementState::Crouching => StateParams {
                speed: config.crouch_speed,
                drag: Some(config.ground_drag),
            },
            MovementState::Sprinting => StateParams {
                speed: config.sprint_speed,
                drag: Some(config.ground_drag),
            },
            MovementState::Airborne => StateParams {
                speed: config.sprint_speed,
                drag: Some(config.air_drag),
            },
            MovementState::Diving | MovementState::Sliding => StateParams {
                speed: config.sprint_speed,
                drag: None,
            },
            MovementState::Mantling => StateParams {
                speed: 0.0,
                drag: None,
            },
        }
    }

    /// State implied by ground contact alone, before input is considered.
    ///
    /// - Airborne whenever ground is lost, unless a maneuver owns the state.
    /// - Landing always relaxes to Walking.
    /// - Moving on the ground relaxes to Walking unless crouching or sprinting.
    pub fn grounding_transition(self, grounded: bool, moving: bool) -> MovementState {
        if self.is_maneuver() {
            return self;
        }

        if !grounded {
            return MovementState::Airborne;
        }

        match self {
            MovementState::Airborne => MovementState::Walking,
            MovementState::Crouching | MovementState::Sprinting => self,
            _ if moving => MovementState::Walking,
            _ => self,
        }
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementState::Walking => "walking",
            MovementState::Crouching => "crouching",
            MovementState::Sprinting => "sprinting",
            MovementState::Airborne => "airborne",
            MovementState::Diving => "diving",
            MovementState::Sliding => "sliding",
            MovementState::Mantling => "mantling",
        };
        f.write_str(name)
    }
}
