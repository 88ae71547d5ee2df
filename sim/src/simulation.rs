//! Headless run: one character on the course, driven by a timeline.

use std::collections::BTreeMap;

use locomotion::{
    CharacterShape, LocomotionConfig, LocomotionController, LocomotionEvent, LookRig,
    MovementState, PhysicsWorld, RapierBody, RapierQuery, RigidBodyHandle, SharedWorld, Vec3,
};

use crate::{
    clock::{FixedStepClock, FrameTimer},
    course,
    script::{Segment, Timeline},
};

pub struct RunSettings {
    pub seconds: f32,
    pub physics_hz: u32,
    pub frame_hz: u32,
}

/// What happened during a run.
#[derive(Debug)]
pub struct Summary {
    pub frames: u64,
    pub physics_steps: u64,
    pub simulated_seconds: f32,
    /// Physics steps spent in each state.
    pub steps_in_state: BTreeMap<String, u64>,
    pub jumps: u32,
    pub maneuvers_started: u32,
    pub maneuvers_finished: u32,
    pub maneuvers_cancelled: u32,
    pub final_state: MovementState,
    pub final_position: Vec3,
    pub max_height: f32,
}

type CourseController = LocomotionController<RapierBody, RapierQuery, LookRig>;

fn spawn(config: LocomotionConfig, world: &SharedWorld) -> CourseController {
    let shape = CharacterShape {
        height: config.body_height,
        ..Default::default()
    };
    let handles = world.borrow_mut().spawn_character(course::SPAWN, shape);

    let body = RapierBody::new(world.clone(), handles, shape);
    let query = RapierQuery::new(world.clone()).excluding(handles.body);
    let look = LookRig::from_config(&config);
    LocomotionController::new(config, body, query, look)
}

pub fn run(config: LocomotionConfig, script: &'static [Segment], settings: &RunSettings) -> Summary {
    let world = PhysicsWorld::build(course::statics()).into_shared();
    let mut controller = spawn(config, &world);
    let mut timeline = Timeline::new(script);
    let mut clock = FixedStepClock::new(settings.physics_hz);
    let mut frames = FrameTimer::new(settings.frame_hz);

    let mut summary = Summary {
        frames: 0,
        physics_steps: 0,
        simulated_seconds: 0.0,
        steps_in_state: BTreeMap::new(),
        jumps: 0,
        maneuvers_started: 0,
        maneuvers_finished: 0,
        maneuvers_cancelled: 0,
        final_state: MovementState::default(),
        final_position: course::SPAWN,
        max_height: course::SPAWN.y,
    };
    let mut t = 0.0f32;

    while t < settings.seconds {
        let input = timeline.sample(t);
        let (dt, steps) = clock.advance(frames.next_dt());
        controller.frame_tick(&input, dt);

        for _ in 0..steps {
            controller.physics_tick(clock.step());
            world.borrow_mut().step(clock.step());

            *summary
                .steps_in_state
                .entry(controller.current_state().to_string())
                .or_default() += 1;
            summary.physics_steps += 1;
        }

        for event in controller.drain_events() {
            record(&mut summary, t, event);
        }

        let position = controller.body().position();
        summary.max_height = summary.max_height.max(position.y);
        summary.frames += 1;
        t += dt;
    }

    log::info!("[{t:6.2}s] end of script: character dies");
    controller.on_death();
    for event in controller.drain_events() {
        record(&mut summary, t, event);
    }

    summary.simulated_seconds = t;
    summary.final_state = controller.current_state();
    summary.final_position = controller.body().position();
    summary
}

fn record(summary: &mut Summary, t: f32, event: LocomotionEvent) {
    match event {
        LocomotionEvent::StateChanged { from, to } => {
            log::info!("[{t:6.2}s] {from} -> {to}");
        }
        LocomotionEvent::Jumped => {
            summary.jumps += 1;
            log::info!("[{t:6.2}s] jump");
        }
        LocomotionEvent::ManeuverStarted(kind) => {
            summary.maneuvers_started += 1;
            log::info!("[{t:6.2}s] {kind:?} start");
        }
        LocomotionEvent::ManeuverFinished(kind) => {
            summary.maneuvers_finished += 1;
            log::info!("[{t:6.2}s] {kind:?} done");
        }
        LocomotionEvent::ManeuverCancelled(kind) => {
            summary.maneuvers_cancelled += 1;
            log::warn!("[{t:6.2}s] {kind:?} cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use locomotion::Action;

    use super::*;
    use crate::script::DEFAULT_SCRIPT;

    fn settings(seconds: f32) -> RunSettings {
        RunSettings {
            seconds,
            physics_hz: 50,
            frame_hz: 60,
        }
    }

    static IDLE: &[Segment] = &[Segment {
        start: 0.0,
        end: 2.0,
        label: "idle",
        move_axes: locomotion::Vec2::new(0.0, 0.0),
        held: &[],
    }];

    static WALK: &[Segment] = &[Segment {
        start: 0.0,
        end: 3.0,
        label: "walk",
        move_axes: locomotion::Vec2::new(0.0, 1.0),
        held: &[],
    }];

    static HOP: &[Segment] = &[
        Segment {
            start: 0.0,
            end: 1.0,
            label: "settle",
            move_axes: locomotion::Vec2::new(0.0, 0.0),
            held: &[],
        },
        Segment {
            start: 1.0,
            end: 1.1,
            label: "jump",
            move_axes: locomotion::Vec2::new(0.0, 0.0),
            held: &[Action::Jump],
        },
    ];

    #[test]
    fn idle_character_stays_on_the_ground() {
        let summary = run(LocomotionConfig::default(), IDLE, &settings(2.0));
        assert_eq!(summary.final_state, MovementState::Walking);
        assert!((summary.final_position.y - course::SPAWN.y).abs() < 0.1);
        assert!(summary.final_position.z.abs() < 0.05);
    }

    #[test]
    fn walking_moves_forward_under_walk_speed() {
        let summary = run(LocomotionConfig::default(), WALK, &settings(3.0));
        let z = summary.final_position.z;
        assert!(z > 2.0, "{z}");
        assert!(z < 7.5 * 3.0, "{z}");
    }

    #[test]
    fn jump_leaves_the_ground_and_lands() {
        let summary = run(LocomotionConfig::default(), HOP, &settings(3.0));
        assert_eq!(summary.jumps, 1);
        assert!(summary.max_height > course::SPAWN.y + 0.5);
        assert!(summary.steps_in_state.get("airborne").copied().unwrap_or(0) > 0);
        assert_eq!(summary.final_state, MovementState::Walking);
    }

    #[test]
    fn full_script_visits_every_move() {
        let summary = run(LocomotionConfig::default(), DEFAULT_SCRIPT, &settings(20.0));
        assert!(summary.physics_steps > 900);

        for state in ["sprinting", "sliding", "crouching", "airborne", "diving", "mantling"] {
            let steps = summary.steps_in_state.get(state).copied().unwrap_or(0);
            assert!(steps > 0, "never entered {state}: {:?}", summary.steps_in_state);
        }

        // The jump before the dive, plus hops on the way to the wall.
        assert!(summary.jumps >= 1);
        // Slide, dive and mantle.
        assert!(summary.maneuvers_finished >= 3, "{summary:?}");
        assert_eq!(summary.maneuvers_cancelled, 0);
        assert!(summary.final_position.iter().all(|c| c.is_finite()));
    }
}
