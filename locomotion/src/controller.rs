//! The locomotion controller: state machine, classifier, resolver and maneuver
//! scheduler wired to one body.
//!
//! Two entry points, called by the host loop:
//! - [`LocomotionController::frame_tick`] once per rendered frame: look, input,
//!   state transitions, per-state speed and drag.
//! - [`LocomotionController::physics_tick`] once per fixed physics step: fresh
//!   ground facts, maneuver progress, movement forces and speed control.
//!
//! Within a frame, input is sampled and transitions are evaluated before the
//! next physics tick applies forces; ground facts are always taken from the
//! body's current position.

use crate::{
    body::{ForceMode, RigidBodyHandle, set_y_scale},
    config::LocomotionConfig,
    constants::{CROUCH_DOWN_IMPULSE, STILL_SPEED_EPS},
    ground,
    input::{Action, InputFrame},
    look::OrientationProvider,
    maneuver::{ManeuverEnd, ManeuverKind, ManeuverScheduler, ManeuverTask, StartOutcome},
    math::{Vec3, planar},
    query::GeometryQuery,
    resolver::{ForceReport, MotionFrame, apply_movement_forces, move_direction, speed_control},
    state::MovementState,
};

/// Notifications for audio, animation and UI collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocomotionEvent {
    StateChanged {
        from: MovementState,
        to: MovementState,
    },
    Jumped,
    ManeuverStarted(ManeuverKind),
    ManeuverFinished(ManeuverKind),
    ManeuverCancelled(ManeuverKind),
}

/// Gates repeated jumps. Armed on jump, fires once after the cooldown elapses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JumpCooldown {
    remaining: Option<f32>,
}

impl JumpCooldown {
    pub fn arm(&mut self, seconds: f32) {
        self.remaining = Some(seconds);
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Returns true on the tick the cooldown elapses.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return false;
        }
        self.remaining = None;
        true
    }
}

pub struct LocomotionController<B, Q, O>
where
    B: RigidBodyHandle,
    Q: GeometryQuery,
    O: OrientationProvider,
{
    config: LocomotionConfig,
    body: B,
    query: Q,
    orientation: O,

    state: MovementState,
    /// Body scale at construction; crouch factors apply to it and release restores it.
    start_scale: Vec3,
    crouched: bool,
    grounded: bool,
    /// Current speed limit from the state table.
    speed: f32,

    input: InputFrame,
    frame: MotionFrame,
    last_force: Option<ForceReport>,

    can_jump: bool,
    exiting_slope: bool,
    jump_cooldown: JumpCooldown,

    maneuvers: ManeuverScheduler,
    alive: bool,
    events: Vec<LocomotionEvent>,
}

impl<B, Q, O> LocomotionController<B, Q, O>
where
    B: RigidBodyHandle,
    Q: GeometryQuery,
    O: OrientationProvider,
{
    pub fn new(config: LocomotionConfig, body: B, query: Q, orientation: O) -> Self {
        let start_scale = body.scale();
        let state = MovementState::default();
        let speed = state.params(&config).speed;
        Self {
            config,
            body,
            query,
            orientation,
            state,
            start_scale,
            crouched: false,
            grounded: false,
            speed,
            input: InputFrame::idle(),
            frame: MotionFrame::default(),
            last_force: None,
            can_jump: true,
            exiting_slope: false,
            jump_cooldown: JumpCooldown::default(),
            maneuvers: ManeuverScheduler::new(),
            alive: true,
            events: Vec::new(),
        }
    }

    pub fn current_state(&self) -> MovementState {
        self.state
    }

    /// Facts computed by the most recent physics tick.
    pub fn motion_frame(&self) -> &MotionFrame {
        &self.frame
    }

    /// What the most recent physics tick applied, if it ran the force policy.
    pub fn last_force(&self) -> Option<&ForceReport> {
        self.last_force.as_ref()
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn active_maneuver(&self) -> Option<&ManeuverTask> {
        self.maneuvers.active()
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn orientation(&self) -> &O {
        &self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut O {
        &mut self.orientation
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<LocomotionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Per-frame update. Never fails; a missing query result just means "no hit".
    pub fn frame_tick(&mut self, input: &InputFrame, dt: f32) {
        if self.alive {
            self.orientation.apply_look(input.look_axes, dt);
            self.input = *input;
        }

        if self.jump_cooldown.advance(dt) {
            self.can_jump = true;
            self.exiting_slope = false;
            log::debug!("Jump re-armed");
        }

        self.grounded = ground::is_grounded(&self.query, self.body.position(), &self.config);
        let moving = planar(&self.body.velocity()).norm() > STILL_SPEED_EPS;
        self.transition(self.state.grounding_transition(self.grounded, moving));

        if self.alive && !self.maneuvers.is_active() {
            self.handle_input();
        }

        self.apply_state_params();
    }

    /// Fixed-rate update: maneuver progress, then forces and speed control.
    pub fn physics_tick(&mut self, dt: f32) {
        let position = self.body.position();
        let facts = ground::classify(&self.query, position, &self.config);
        let direction = move_direction(&self.orientation, self.input.move_axes);
        self.frame = MotionFrame::new(self.input.move_axes, direction, facts, self.exiting_slope);
        self.last_force = None;

        if self.maneuvers.is_active() {
            let mut state = self.state;
            let end = self.maneuvers.advance(&mut self.body, dt, &mut state);
            self.transition(state);
            if let Some(end) = end {
                self.record_end(end);
                self.apply_state_params();
            }
        }

        match self.state {
            MovementState::Mantling => {}
            // The maneuver already applied its impulse; only gravity and the clamp remain.
            MovementState::Sliding | MovementState::Diving => {
                self.body
                    .set_gravity_enabled(!self.frame.on_walkable_slope());
                speed_control(&mut self.body, &self.frame, self.speed);
            }
            _ => {
                if self.config.allow_move {
                    self.last_force = Some(apply_movement_forces(
                        &mut self.body,
                        &self.frame,
                        self.speed,
                        self.config.air_multiplier,
                    ));
                } else {
                    self.body
                        .set_gravity_enabled(!self.frame.on_walkable_slope());
                }
                speed_control(&mut self.body, &self.frame, self.speed);
            }
        }
    }

    /// Force-terminate the active maneuver, if any.
    pub fn cancel_maneuver(&mut self) -> Option<ManeuverKind> {
        let mut state = self.state;
        let end = self.maneuvers.cancel(&mut self.body, &mut state)?;
        self.transition(state);
        self.record_end(end);
        self.apply_state_params();
        match end {
            ManeuverEnd::Cancelled(kind) | ManeuverEnd::Completed(kind) => Some(kind),
        }
    }

    /// The owning character died: stop any maneuver and ignore further input.
    pub fn on_death(&mut self) {
        if !self.alive {
            return;
        }
        self.cancel_maneuver();
        self.alive = false;
        self.input = InputFrame::idle();
        log::info!("Locomotion disabled (death) in state {}", self.state);
    }

    fn handle_input(&mut self) {
        let buttons = self.input.buttons;
        let grounded = self.grounded;

        if self.config.allow_jump
            && buttons.held(Action::Jump)
            && grounded
            && self.can_jump
            && self.state != MovementState::Crouching
            && !self.try_mantle()
        {
            // Mantle gets the first claim on the press; otherwise it is a plain jump.
            self.jump();
        }
        if self.maneuvers.is_active() {
            return;
        }

        if self.config.allow_sprint
            && buttons.held(Action::Sprint)
            && grounded
            && self.state != MovementState::Crouching
        {
            self.transition(MovementState::Sprinting);
        } else if buttons.released(Action::Sprint) && self.state == MovementState::Sprinting {
            self.transition(MovementState::Walking);
        }

        if self.config.allow_crouch && buttons.pressed(Action::Crouch) && grounded {
            set_y_scale(&mut self.body, self.start_scale.y * self.config.crouch_y_scale);
            self.body
                .add_force(-Vec3::y() * CROUCH_DOWN_IMPULSE, ForceMode::Impulse);
            self.crouched = true;
            self.transition(MovementState::Crouching);
        } else if buttons.released(Action::Crouch) && self.crouched {
            set_y_scale(&mut self.body, self.start_scale.y);
            self.crouched = false;
            if self.state == MovementState::Crouching {
                self.transition(MovementState::Walking);
            }
        }

        if self.config.allow_slide
            && buttons.pressed(Action::Slide)
            && grounded
            && self.state == MovementState::Sprinting
        {
            self.start_maneuver(ManeuverKind::Slide);
        } else if self.config.allow_dive
            && buttons.pressed(Action::Dive)
            && matches!(
                self.state,
                MovementState::Sprinting | MovementState::Airborne
            )
        {
            self.start_maneuver(ManeuverKind::Dive);
        }
    }

    /// Returns true if the jump press was consumed by a mantle.
    fn try_mantle(&mut self) -> bool {
        if !self.config.allow_mantle {
            return false;
        }
        let view = self.orientation.view_direction();
        let mut state = self.state;
        let outcome = self.maneuvers.try_mantle(
            &mut self.body,
            &self.query,
            view,
            self.grounded,
            &self.config,
            &mut state,
        );
        self.record_start(ManeuverKind::Mantle, outcome, state)
    }

    fn jump(&mut self) {
        self.body
            .add_force(Vec3::y() * self.config.jump_force, ForceMode::Impulse);
        self.can_jump = false;
        self.exiting_slope = true;
        self.jump_cooldown.arm(self.config.jump_cooldown);
        self.events.push(LocomotionEvent::Jumped);
        log::debug!("Jump (force {})", self.config.jump_force);
    }

    fn start_maneuver(&mut self, kind: ManeuverKind) {
        let forward = self.orientation.forward();
        let mut state = self.state;
        let outcome = match kind {
            ManeuverKind::Slide => {
                self.maneuvers
                    .start_slide(&mut self.body, forward, &self.config, &mut state)
            }
            ManeuverKind::Dive => {
                self.maneuvers
                    .start_dive(&mut self.body, forward, &self.config, &mut state)
            }
            ManeuverKind::Mantle => return,
        };
        self.record_start(kind, outcome, state);
    }

    fn record_start(
        &mut self,
        kind: ManeuverKind,
        outcome: StartOutcome,
        state: MovementState,
    ) -> bool {
        if !outcome.started() {
            return false;
        }
        self.events.push(LocomotionEvent::ManeuverStarted(kind));
        if outcome == StartOutcome::Completed {
            // Went straight through the maneuver state back to Walking.
            self.transition(kind.state());
            self.events.push(LocomotionEvent::ManeuverFinished(kind));
        }
        self.transition(state);
        true
    }

    fn record_end(&mut self, end: ManeuverEnd) {
        self.events.push(match end {
            ManeuverEnd::Completed(kind) => LocomotionEvent::ManeuverFinished(kind),
            ManeuverEnd::Cancelled(kind) => LocomotionEvent::ManeuverCancelled(kind),
        });
    }

    fn transition(&mut self, to: MovementState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.events.push(LocomotionEvent::StateChanged { from, to });
        log::debug!("Movement state {from} -> {to}");
    }

    fn apply_state_params(&mut self) {
        let params = self.state.params(&self.config);
        self.speed = params.speed;
        if let Some(drag) = params.drag {
            self.body.set_drag(drag);
        }
    }
}

impl<B, Q, O> Drop for LocomotionController<B, Q, O>
where
    B: RigidBodyHandle,
    Q: GeometryQuery,
    O: OrientationProvider,
{
    fn drop(&mut self) {
        self.cancel_maneuver();
    }
}
