//! Per-tick input samples.
//!
//! Device polling lives outside this crate; callers translate whatever they
//! read into an [`InputFrame`] once per frame tick.

use crate::math::Vec2;

/// Discrete actions the controller reacts to. Mantling has no button; it is attempted on jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    Jump,
    Crouch,
    Sprint,
    Slide,
    Dive,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Jump,
        Action::Crouch,
        Action::Sprint,
        Action::Slide,
        Action::Dive,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Level and edge state for every [`Action`] in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionButtons {
    held: u8,
    pressed: u8,
    released: u8,
}

impl ActionButtons {
    /// Derive edges from the previous and current level samples.
    pub fn from_levels(previous: &[Action], current: &[Action]) -> Self {
        let prev = previous.iter().fold(0u8, |acc, a| acc | a.bit());
        let now = current.iter().fold(0u8, |acc, a| acc | a.bit());
        Self {
            held: now,
            pressed: now & !prev,
            released: prev & !now,
        }
    }

    /// Buttons held this frame, with edges derived from `self` as the previous frame.
    pub fn next(&self, current: &[Action]) -> Self {
        let now = current.iter().fold(0u8, |acc, a| acc | a.bit());
        Self {
            held: now,
            pressed: now & !self.held,
            released: self.held & !now,
        }
    }

    #[inline]
    pub fn held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    /// Went down this frame.
    #[inline]
    pub fn pressed(&self, action: Action) -> bool {
        self.pressed & action.bit() != 0
    }

    /// Went up this frame.
    #[inline]
    pub fn released(&self, action: Action) -> bool {
        self.released & action.bit() != 0
    }

    pub fn held_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.held(*a))
    }
}

/// Raw input for one frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Movement axes: `x` = horizontal (strafe), `y` = vertical (forward). Each in [-1, 1].
    pub move_axes: Vec2,
    /// Look axes (raw mouse/stick delta): `x` = yaw, `y` = pitch.
    pub look_axes: Vec2,
    pub buttons: ActionButtons,
}

impl InputFrame {
    pub fn new(move_axes: Vec2, buttons: ActionButtons) -> Self {
        Self {
            move_axes,
            look_axes: Vec2::zeros(),
            buttons,
        }
    }

    /// A frame with no movement and nothing held.
    pub fn idle() -> Self {
        Self::default()
    }
}
