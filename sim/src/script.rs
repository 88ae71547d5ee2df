//! Scripted input timeline.
//!
//! Forward is +Z (the spawn facing), so every segment pushes toward the ramp
//! and then the wall.

use locomotion::{Action, ActionButtons, InputFrame, Vec2};

/// One stretch of constant input, active while `start <= t < end`.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub label: &'static str,
    pub move_axes: Vec2,
    pub held: &'static [Action],
}

const fn segment(
    start: f32,
    end: f32,
    label: &'static str,
    forward: f32,
    held: &'static [Action],
) -> Segment {
    Segment {
        start,
        end,
        label,
        move_axes: Vec2::new(0.0, forward),
        held,
    }
}

pub const DEFAULT_SCRIPT: &[Segment] = &[
    segment(0.0, 1.0, "settle", 0.0, &[]),
    segment(1.0, 3.0, "walk", 1.0, &[]),
    segment(3.0, 5.0, "sprint over the ramp", 1.0, &[Action::Sprint]),
    segment(5.0, 5.1, "slide", 1.0, &[Action::Sprint, Action::Slide]),
    segment(5.1, 6.0, "slide out", 1.0, &[]),
    // Long enough to come down off the ramp before crouching.
    segment(6.0, 7.5, "land", 0.0, &[]),
    segment(7.5, 8.5, "crouch walk", 1.0, &[Action::Crouch]),
    segment(8.5, 8.7, "jump", 1.0, &[Action::Jump]),
    segment(8.7, 8.8, "dive", 1.0, &[Action::Dive]),
    segment(8.8, 10.5, "recover", 0.0, &[]),
    segment(10.5, 18.5, "run at the wall", 1.0, &[Action::Jump]),
];

/// Plays a list of segments and derives button edges frame to frame.
pub struct Timeline {
    segments: &'static [Segment],
    buttons: ActionButtons,
    current: Option<&'static str>,
}

impl Timeline {
    pub fn new(segments: &'static [Segment]) -> Self {
        Self {
            segments,
            buttons: ActionButtons::default(),
            current: None,
        }
    }

    pub fn segment_at(&self, t: f32) -> Option<&'static Segment> {
        self.segments.iter().find(|s| s.start <= t && t < s.end)
    }

    /// Input for the frame starting at `t`. Idle outside every segment.
    pub fn sample(&mut self, t: f32) -> InputFrame {
        let segment = self.segment_at(t);
        let label = segment.map(|s| s.label);
        if label != self.current {
            if let Some(label) = label {
                log::info!("[{t:6.2}s] {label}");
            }
            self.current = label;
        }

        let (move_axes, held) = segment.map_or((Vec2::zeros(), &[][..]), |s| (s.move_axes, s.held));
        self.buttons = self.buttons.next(held);
        InputFrame::new(move_axes, self.buttons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_is_contiguous() {
        for pair in DEFAULT_SCRIPT.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "{} -> {}", pair[0].label, pair[1].label);
            assert!(pair[0].start < pair[0].end);
        }
    }

    #[test]
    fn edges_fire_once_per_segment_boundary() {
        let mut timeline = Timeline::new(DEFAULT_SCRIPT);
        let first = timeline.sample(5.0);
        assert!(first.buttons.pressed(Action::Slide));
        assert!(first.buttons.held(Action::Sprint));

        let second = timeline.sample(5.05);
        assert!(!second.buttons.pressed(Action::Slide));

        let after = timeline.sample(5.2);
        assert!(after.buttons.released(Action::Slide));
        assert!(after.buttons.released(Action::Sprint));
    }

    #[test]
    fn idle_past_the_end() {
        let mut timeline = Timeline::new(DEFAULT_SCRIPT);
        let frame = timeline.sample(100.0);
        assert_eq!(frame.move_axes, Vec2::zeros());
        assert_eq!(frame.buttons.held_actions().count(), 0);
    }
}
