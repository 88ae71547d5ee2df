//! Per-character locomotion tuning.
//!
//! Loaded once when a character is created and never mutated afterwards.
//! All values use metric units (meters, seconds, degrees).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, layers::LayerMask};

/// Immutable locomotion tuning for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub allow_move: bool,
    pub allow_sprint: bool,
    pub allow_jump: bool,
    pub allow_crouch: bool,
    pub allow_dive: bool,
    pub allow_slide: bool,
    pub allow_mantle: bool,

    /// Speed limit while walking (meters/second).
    pub walk_speed: f32,
    pub crouch_speed: f32,
    /// Speed limit while sprinting, airborne and during slide/dive.
    pub sprint_speed: f32,

    /// Forward impulse applied when a dive starts.
    pub dive_force: f32,
    /// Forward impulse applied when a slide starts.
    pub slide_force: f32,
    /// Upward impulse applied on jump.
    pub jump_force: f32,
    pub ground_drag: f32,
    pub air_drag: f32,
    /// Scale applied to the movement force while airborne (0.0 = no air control).
    pub air_multiplier: f32,

    /// Unscaled collider height; ground probes extend half of it below the origin.
    pub body_height: f32,
    /// Height of the orientation point above the body origin. Mantle probes start here.
    pub eye_height: f32,
    /// Vertical scale factors relative to the spawn scale.
    pub crouch_y_scale: f32,
    pub slide_y_scale: f32,
    pub dive_y_scale: f32,

    /// Seconds before a jump re-arms.
    pub jump_cooldown: f32,
    pub max_slide_time: f32,
    pub max_dive_time: f32,

    pub sens_x: f32,
    pub sens_y: f32,
    /// Pitch limit either side of the horizon (degrees).
    pub look_limit: f32,

    /// Steepest walkable slope (degrees from horizontal).
    pub max_slope_angle: f32,

    /// Highest obstacle, measured from the body origin, that can be mantled.
    pub mantle_max_height: f32,
    pub mantle_reach_distance: f32,
    /// Traversal speed while mantling (meters/second).
    pub mantle_speed: f32,

    pub ground_layers: LayerMask,
    pub mantle_layers: LayerMask,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            allow_move: true,
            allow_sprint: true,
            allow_jump: true,
            allow_crouch: true,
            allow_dive: true,
            allow_slide: true,
            allow_mantle: true,

            walk_speed: 7.5,
            crouch_speed: 5.0,
            sprint_speed: 10.0,

            dive_force: 8.0,
            slide_force: 8.0,
            jump_force: 8.0,
            ground_drag: 1.0,
            air_drag: 0.0,
            air_multiplier: 0.4,

            body_height: 2.0,
            eye_height: 0.6,
            crouch_y_scale: 0.5,
            slide_y_scale: 0.5,
            dive_y_scale: 0.35,

            jump_cooldown: 0.5,
            max_slide_time: 0.75,
            max_dive_time: 0.6,

            sens_x: 1.0,
            sens_y: 1.0,
            look_limit: 90.0,

            max_slope_angle: 45.0,

            mantle_max_height: 1.5,
            mantle_reach_distance: 1.0,
            mantle_speed: 3.0,

            ground_layers: LayerMask::ground(),
            mantle_layers: LayerMask::mantleable(),
        }
    }
}

impl LocomotionConfig {
    /// Parse and validate a TOML document. Missing keys take their default value.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every field against its accepted range.
    ///
    /// The controller itself tolerates out-of-range values (a non-positive duration
    /// completes immediately); this is the gate for data coming from disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("walk_speed", self.walk_speed),
            ("crouch_speed", self.crouch_speed),
            ("sprint_speed", self.sprint_speed),
            ("dive_force", self.dive_force),
            ("slide_force", self.slide_force),
            ("jump_force", self.jump_force),
            ("ground_drag", self.ground_drag),
            ("air_drag", self.air_drag),
            ("air_multiplier", self.air_multiplier),
            ("eye_height", self.eye_height),
            ("jump_cooldown", self.jump_cooldown),
            ("sens_x", self.sens_x),
            ("sens_y", self.sens_y),
            ("look_limit", self.look_limit),
            ("mantle_max_height", self.mantle_max_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("expected a finite value >= 0, got {value}"),
                ));
            }
        }

        let positive = [
            ("body_height", self.body_height),
            ("max_slide_time", self.max_slide_time),
            ("max_dive_time", self.max_dive_time),
            ("mantle_reach_distance", self.mantle_reach_distance),
            ("mantle_speed", self.mantle_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("expected a finite value > 0, got {value}"),
                ));
            }
        }

        let scales = [
            ("crouch_y_scale", self.crouch_y_scale),
            ("slide_y_scale", self.slide_y_scale),
            ("dive_y_scale", self.dive_y_scale),
        ];
        for (field, value) in scales {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("expected a scale in (0, 1], got {value}"),
                ));
            }
        }

        if !(self.max_slope_angle > 0.0 && self.max_slope_angle <= 90.0) {
            return Err(ConfigError::invalid(
                "max_slope_angle",
                format!("expected degrees in (0, 90], got {}", self.max_slope_angle),
            ));
        }

        if self.ground_layers.is_empty() {
            return Err(ConfigError::invalid(
                "ground_layers",
                "mask selects no layers",
            ));
        }

        Ok(())
    }
}
