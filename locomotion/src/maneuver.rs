//! Timed maneuvers: slide, dive and mantle.
//!
//! A maneuver is a task object that stores its own progress and is advanced
//! exactly once per physics tick by the [`ManeuverScheduler`]. While a task is
//! active it owns the movement state and the body; when it completes (or is
//! cancelled) it restores what it changed and hands control back.
//!
//! At most one task exists at a time. Requests made while one is running are
//! rejected and the caller falls through to its default behavior.

use crate::{
    body::{ForceMode, RigidBodyHandle, set_y_scale},
    config::LocomotionConfig,
    constants::MANTLE_TARGET_LIFT,
    math::{Vec3, lerp, normalize_or_zero},
    query::{GeometryQuery, checked_raycast},
    state::MovementState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ManeuverKind {
    Slide,
    Dive,
    Mantle,
}

impl ManeuverKind {
    /// State held while this maneuver runs.
    pub fn state(self) -> MovementState {
        match self {
            ManeuverKind::Slide => MovementState::Sliding,
            ManeuverKind::Dive => MovementState::Diving,
            ManeuverKind::Mantle => MovementState::Mantling,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Progress {
    /// Slide/dive: seconds left before the body is restored.
    Countdown { remaining: f32 },
    /// Mantle: kinematic traversal from `start` to `target`.
    Traverse {
        start: Vec3,
        target: Vec3,
        elapsed: f32,
        duration: f32,
    },
}

/// An in-flight maneuver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManeuverTask {
    kind: ManeuverKind,
    /// Scheduler time (seconds) when the task started.
    started_at: f64,
    progress: Progress,
    /// Body scale before the maneuver touched it.
    restore_scale: Vec3,
}

impl ManeuverTask {
    pub fn kind(&self) -> ManeuverKind {
        self.kind
    }

    /// Seconds until the task completes on its own.
    pub fn remaining(&self) -> f32 {
        match self.progress {
            Progress::Countdown { remaining } => remaining.max(0.0),
            Progress::Traverse {
                elapsed, duration, ..
            } => (duration - elapsed).max(0.0),
        }
    }

    /// Mantle endpoint, if this is a mantle.
    pub fn target(&self) -> Option<Vec3> {
        match self.progress {
            Progress::Traverse { target, .. } => Some(target),
            Progress::Countdown { .. } => None,
        }
    }

    fn is_due(&self) -> bool {
        match self.progress {
            Progress::Countdown { remaining } => !(remaining > 0.0),
            Progress::Traverse {
                elapsed, duration, ..
            } => !(elapsed < duration),
        }
    }

    /// One scheduler step. Returns true once the task has reached its end.
    fn step<B: RigidBodyHandle + ?Sized>(&mut self, body: &mut B, dt: f32) -> bool {
        let dt = dt.max(0.0);
        match &mut self.progress {
            Progress::Countdown { remaining } => {
                *remaining -= dt;
            }
            Progress::Traverse {
                start,
                target,
                elapsed,
                duration,
            } => {
                *elapsed += dt;
                if *elapsed < *duration {
                    body.set_position(lerp(start, target, *elapsed / *duration));
                }
            }
        }
        self.is_due()
    }

    /// Undo everything the task changed and leave the body under normal physics.
    fn restore<B: RigidBodyHandle + ?Sized>(&self, body: &mut B, completed: bool) {
        match (self.kind, self.progress) {
            (ManeuverKind::Mantle, Progress::Traverse { target, .. }) => {
                if completed {
                    body.set_position(target);
                }
                body.set_kinematic(false);
            }
            _ => body.set_scale(self.restore_scale),
        }
    }
}

/// Result of asking the scheduler to start a maneuver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// The task is running and will be advanced every physics tick.
    Running,
    /// The task had a non-positive duration and already completed.
    Completed,
    /// Another maneuver is active or a precondition failed.
    Rejected,
    /// The mantle probe found nothing climbable.
    NoTarget,
}

impl StartOutcome {
    /// The maneuver took effect (running or already done).
    #[inline]
    pub fn started(self) -> bool {
        matches!(self, StartOutcome::Running | StartOutcome::Completed)
    }
}

/// How the previously active task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManeuverEnd {
    Completed(ManeuverKind),
    Cancelled(ManeuverKind),
}

/// Owns the single active [`ManeuverTask`], if any.
#[derive(Debug, Default)]
pub struct ManeuverScheduler {
    active: Option<ManeuverTask>,
    /// Seconds advanced since the scheduler was created.
    clock: f64,
}

impl ManeuverScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ManeuverTask> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a slide: shrink to `slide_y_scale`, push forward with `slide_force`,
    /// count down `max_slide_time`.
    pub fn start_slide<B: RigidBodyHandle + ?Sized>(
        &mut self,
        body: &mut B,
        forward: Vec3,
        config: &LocomotionConfig,
        state: &mut MovementState,
    ) -> StartOutcome {
        self.start_countdown(
            ManeuverKind::Slide,
            body,
            forward,
            config.slide_y_scale,
            config.slide_force,
            config.max_slide_time,
            state,
        )
    }

    /// Start a dive: shrink to `dive_y_scale`, push forward with `dive_force`,
    /// count down `max_dive_time`.
    pub fn start_dive<B: RigidBodyHandle + ?Sized>(
        &mut self,
        body: &mut B,
        forward: Vec3,
        config: &LocomotionConfig,
        state: &mut MovementState,
    ) -> StartOutcome {
        self.start_countdown(
            ManeuverKind::Dive,
            body,
            forward,
            config.dive_y_scale,
            config.dive_force,
            config.max_dive_time,
            state,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn start_countdown<B: RigidBodyHandle + ?Sized>(
        &mut self,
        kind: ManeuverKind,
        body: &mut B,
        forward: Vec3,
        y_scale: f32,
        force: f32,
        duration: f32,
        state: &mut MovementState,
    ) -> StartOutcome {
        if self.active.is_some() {
            return StartOutcome::Rejected;
        }

        let restore_scale = body.scale();
        *state = kind.state();
        set_y_scale(body, restore_scale.y * y_scale);
        body.add_force(normalize_or_zero(&forward) * force, ForceMode::Impulse);

        log::info!("{:?} started ({duration:.2}s)", kind);

        self.begin(
            ManeuverTask {
                kind,
                started_at: self.clock,
                progress: Progress::Countdown {
                    remaining: duration,
                },
                restore_scale,
            },
            body,
            state,
        )
    }

    /// Probe for a ledge and start a mantle onto it.
    ///
    /// The probe runs from the orientation point (body origin raised by `eye_height`)
    /// along `view_direction` up to `mantle_reach_distance`. The obstacle height is
    /// measured from the body origin and must satisfy `0 < height <= mantle_max_height`.
    pub fn try_mantle<B, Q>(
        &mut self,
        body: &mut B,
        query: &Q,
        view_direction: Vec3,
        grounded: bool,
        config: &LocomotionConfig,
        state: &mut MovementState,
    ) -> StartOutcome
    where
        B: RigidBodyHandle + ?Sized,
        Q: GeometryQuery + ?Sized,
    {
        if self.active.is_some() || !grounded {
            return StartOutcome::Rejected;
        }

        let dir = normalize_or_zero(&view_direction);
        if dir == Vec3::zeros() {
            return StartOutcome::NoTarget;
        }

        let position = body.position();
        let origin = position + Vec3::y() * config.eye_height;
        let Some(hit) = checked_raycast(
            query,
            origin,
            dir,
            config.mantle_reach_distance,
            config.mantle_layers,
        ) else {
            return StartOutcome::NoTarget;
        };

        let obstacle_height = hit.point.y - position.y;
        if !(obstacle_height > 0.0 && obstacle_height <= config.mantle_max_height) {
            log::debug!(
                "Mantle rejected: obstacle height {obstacle_height:.3} outside (0, {}]",
                config.mantle_max_height
            );
            return StartOutcome::NoTarget;
        }

        let target = hit.point + Vec3::y() * MANTLE_TARGET_LIFT;
        let duration = (target - position).norm() / config.mantle_speed;
        let duration = if duration.is_finite() { duration } else { 0.0 };

        *state = MovementState::Mantling;
        body.set_velocity(Vec3::zeros());
        body.set_kinematic(true);

        log::info!(
            "Mantle started: height {obstacle_height:.2}, {duration:.2}s to {:?}",
            target
        );

        self.begin(
            ManeuverTask {
                kind: ManeuverKind::Mantle,
                started_at: self.clock,
                progress: Progress::Traverse {
                    start: position,
                    target,
                    elapsed: 0.0,
                    duration,
                },
                restore_scale: body.scale(),
            },
            body,
            state,
        )
    }

    fn begin<B: RigidBodyHandle + ?Sized>(
        &mut self,
        task: ManeuverTask,
        body: &mut B,
        state: &mut MovementState,
    ) -> StartOutcome {
        if task.is_due() {
            task.restore(body, true);
            *state = MovementState::Walking;
            log::info!("{:?} completed immediately", task.kind);
            return StartOutcome::Completed;
        }
        self.active = Some(task);
        StartOutcome::Running
    }

    /// Advance the active task by one physics tick.
    ///
    /// Returns how the task ended if it finished during this step.
    pub fn advance<B: RigidBodyHandle + ?Sized>(
        &mut self,
        body: &mut B,
        dt: f32,
        state: &mut MovementState,
    ) -> Option<ManeuverEnd> {
        self.clock += f64::from(dt.max(0.0));

        let task = self.active.as_mut()?;
        if !task.step(body, dt) {
            return None;
        }

        let task = self.active.take()?;
        task.restore(body, true);
        *state = MovementState::Walking;
        log::info!("{:?} completed", task.kind);
        Some(ManeuverEnd::Completed(task.kind))
    }

    /// Force-terminate the active task, restoring scale, physics mode and state.
    pub fn cancel<B: RigidBodyHandle + ?Sized>(
        &mut self,
        body: &mut B,
        state: &mut MovementState,
    ) -> Option<ManeuverEnd> {
        let task = self.active.take()?;
        task.restore(body, false);
        *state = MovementState::Walking;
        log::info!("{:?} cancelled after {:.2}s", task.kind, self.clock - task.started_at);
        Some(ManeuverEnd::Cancelled(task.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::RayHit,
        test_support::{MockBody, MockQuery},
    };

    const DT: f32 = 0.02;

    fn ledge_at(height: f32) -> MockQuery {
        MockQuery::floor(0.0, Vec3::y()).with_wall(RayHit {
            point: Vec3::new(0.0, 1.0 + height, 0.6),
            normal: -Vec3::z(),
            distance: 0.6,
        })
    }

    fn run_to_end(
        scheduler: &mut ManeuverScheduler,
        body: &mut MockBody,
        state: &mut MovementState,
        max_ticks: usize,
    ) -> (usize, Option<ManeuverEnd>) {
        for tick in 1..=max_ticks {
            if let Some(end) = scheduler.advance(body, DT, state) {
                return (tick, Some(end));
            }
        }
        (max_ticks, None)
    }

    #[test]
    fn slide_round_trip_restores_scale_and_walking() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        body.scale = Vec3::new(1.0, 1.2, 1.0);
        let mut state = MovementState::Sprinting;
        let mut scheduler = ManeuverScheduler::new();

        let outcome = scheduler.start_slide(&mut body, Vec3::z(), &config, &mut state);
        assert_eq!(outcome, StartOutcome::Running);
        assert_eq!(state, MovementState::Sliding);
        assert!((body.scale.y - 1.2 * config.slide_y_scale).abs() < 1.0e-6);
        assert_eq!(
            body.forces_of(ForceMode::Impulse),
            vec![Vec3::new(0.0, 0.0, config.slide_force)]
        );

        let (ticks, end) = run_to_end(&mut scheduler, &mut body, &mut state, 1000);
        assert_eq!(end, Some(ManeuverEnd::Completed(ManeuverKind::Slide)));
        // 0.75s at 50Hz
        assert!((37..=39).contains(&ticks), "took {ticks} ticks");
        assert_eq!(body.scale, Vec3::new(1.0, 1.2, 1.0));
        assert_eq!(state, MovementState::Walking);
        assert!(!scheduler.is_active());
    }

    #[test]
    fn dive_mirrors_slide() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Airborne;
        let mut scheduler = ManeuverScheduler::new();

        assert!(
            scheduler
                .start_dive(&mut body, Vec3::x(), &config, &mut state)
                .started()
        );
        assert_eq!(state, MovementState::Diving);
        assert!((body.scale.y - config.dive_y_scale).abs() < 1.0e-6);

        let (_, end) = run_to_end(&mut scheduler, &mut body, &mut state, 1000);
        assert_eq!(end, Some(ManeuverEnd::Completed(ManeuverKind::Dive)));
        assert_eq!(body.scale.y, 1.0);
        assert_eq!(state, MovementState::Walking);
    }

    #[test]
    fn second_maneuver_is_rejected_while_one_runs() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Sprinting;
        let mut scheduler = ManeuverScheduler::new();

        scheduler.start_slide(&mut body, Vec3::z(), &config, &mut state);
        let outcome = scheduler.start_dive(&mut body, Vec3::z(), &config, &mut state);
        assert_eq!(outcome, StartOutcome::Rejected);
        assert_eq!(state, MovementState::Sliding);
        assert_eq!(scheduler.active().map(|t| t.kind()), Some(ManeuverKind::Slide));
    }

    #[test]
    fn non_positive_duration_completes_immediately() {
        let config = LocomotionConfig {
            max_slide_time: 0.0,
            ..Default::default()
        };
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Sprinting;
        let mut scheduler = ManeuverScheduler::new();

        let outcome = scheduler.start_slide(&mut body, Vec3::z(), &config, &mut state);
        assert_eq!(outcome, StartOutcome::Completed);
        assert!(!scheduler.is_active());
        assert_eq!(state, MovementState::Walking);
        assert_eq!(body.scale.y, 1.0);
    }

    #[test]
    fn cancel_restores_everything() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Sprinting;
        let mut scheduler = ManeuverScheduler::new();

        scheduler.start_slide(&mut body, Vec3::z(), &config, &mut state);
        scheduler.advance(&mut body, DT, &mut state);
        let end = scheduler.cancel(&mut body, &mut state);
        assert_eq!(end, Some(ManeuverEnd::Cancelled(ManeuverKind::Slide)));
        assert_eq!(body.scale.y, 1.0);
        assert_eq!(state, MovementState::Walking);
        assert!(scheduler.cancel(&mut body, &mut state).is_none());
    }

    #[test]
    fn mantle_triggers_below_max_height_and_is_kinematic_until_done() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Walking;
        let mut scheduler = ManeuverScheduler::new();
        let query = ledge_at(config.mantle_max_height - 0.01);

        let outcome =
            scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
        assert_eq!(outcome, StartOutcome::Running);
        assert_eq!(state, MovementState::Mantling);
        assert!(body.kinematic);

        let target = scheduler.active().and_then(|t| t.target()).unwrap();
        let mut ticks = 0;
        while scheduler.is_active() {
            assert!(body.kinematic);
            assert_eq!(state, MovementState::Mantling);
            scheduler.advance(&mut body, DT, &mut state);
            ticks += 1;
            assert!(ticks < 1000);
        }

        assert!(!body.kinematic);
        assert_eq!(body.position, target);
        assert_eq!(state, MovementState::Walking);
    }

    #[test]
    fn mantle_accepts_exact_max_height() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Walking;
        let mut scheduler = ManeuverScheduler::new();
        let query = ledge_at(config.mantle_max_height);

        let outcome =
            scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
        assert!(outcome.started());
    }

    #[test]
    fn mantle_boundaries_reject_zero_and_over_height() {
        let config = LocomotionConfig::default();
        for height in [0.0, -0.3, config.mantle_max_height + 0.01] {
            let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
            let mut state = MovementState::Walking;
            let mut scheduler = ManeuverScheduler::new();
            let query = ledge_at(height);

            let outcome =
                scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
            assert_eq!(outcome, StartOutcome::NoTarget, "height {height}");
            assert_eq!(state, MovementState::Walking);
            assert!(!body.kinematic);
        }
    }

    #[test]
    fn horizontal_probe_measures_eye_height_on_any_vertical_wall() {
        use rapier3d::na::UnitQuaternion;

        use crate::{
            layers::LayerMask,
            rapier::WorldStaticDef,
            rapier_world::{PhysicsWorld, RapierQuery},
        };

        // A 10 m wall whose face is 0.5 m in front of the body.
        let world = PhysicsWorld::build(vec![WorldStaticDef::cuboid(
            0,
            Vec3::new(0.0, 5.0, 1.0),
            Vec3::new(2.0, 5.0, 0.5),
            UnitQuaternion::identity(),
            LayerMask::mantleable(),
        )])
        .into_shared();
        let query = RapierQuery::new(world);
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Walking;
        let mut scheduler = ManeuverScheduler::new();

        let outcome =
            scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
        assert_eq!(outcome, StartOutcome::Running);

        // The hit sits at eye level, so the wall's real height never enters the check.
        let target = scheduler.active().and_then(|t| t.target()).unwrap();
        let lift = target.y - MANTLE_TARGET_LIFT - body.position.y;
        assert!((lift - config.eye_height).abs() < 1.0e-3, "{lift}");
    }

    #[test]
    fn mantle_needs_ground_and_a_hit() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Airborne;
        let mut scheduler = ManeuverScheduler::new();

        let query = ledge_at(0.5);
        assert_eq!(
            scheduler.try_mantle(&mut body, &query, Vec3::z(), false, &config, &mut state),
            StartOutcome::Rejected
        );

        let open = MockQuery::floor(0.0, Vec3::y());
        let mut state = MovementState::Walking;
        assert_eq!(
            scheduler.try_mantle(&mut body, &open, Vec3::z(), true, &config, &mut state),
            StartOutcome::NoTarget
        );
    }

    #[test]
    fn refused_kinematic_toggle_still_finishes_on_time() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        body.refuse_kinematic = true;
        let mut state = MovementState::Walking;
        let mut scheduler = ManeuverScheduler::new();
        let query = ledge_at(0.8);

        scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
        let budget = scheduler.active().map(|t| t.remaining()).unwrap();
        let max_ticks = (budget / DT).ceil() as usize + 1;

        let (_, end) = run_to_end(&mut scheduler, &mut body, &mut state, max_ticks);
        assert_eq!(end, Some(ManeuverEnd::Completed(ManeuverKind::Mantle)));
        assert_eq!(state, MovementState::Walking);
    }

    #[test]
    fn cancelled_mantle_leaves_body_dynamic_in_place() {
        let config = LocomotionConfig::default();
        let mut body = MockBody::at(Vec3::new(0.0, 1.0, 0.0));
        let mut state = MovementState::Walking;
        let mut scheduler = ManeuverScheduler::new();
        let query = ledge_at(0.8);

        scheduler.try_mantle(&mut body, &query, Vec3::z(), true, &config, &mut state);
        scheduler.advance(&mut body, DT, &mut state);
        let mid = body.position;
        scheduler.cancel(&mut body, &mut state);

        assert!(!body.kinematic);
        assert_eq!(body.position, mid);
        assert_eq!(state, MovementState::Walking);
    }
}
