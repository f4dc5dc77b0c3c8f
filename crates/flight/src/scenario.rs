//! Scripted keyboard timelines for headless runs.
//!
//! A scenario is a list of segments, each holding a set of keys for a while.
//! Keys go down at the start of a segment and up at its end, so buttons
//! produce exactly one edge per segment.

use input::{ControlInput, ElementState, InputState, KeyCode};

#[derive(Debug, Clone)]
pub struct Segment {
    pub label: &'static str,
    pub duration: f32,
    pub keys: Vec<KeyCode>,
}

impl Segment {
    pub fn new(label: &'static str, duration: f32, keys: &[KeyCode]) -> Self {
        Self {
            label,
            duration,
            keys: keys.to_vec(),
        }
    }
}

/// Cruise in, tidy up with a reset, look around, then hand over to the
/// autopilot and wait for it.
pub fn demo() -> Vec<Segment> {
    vec![
        Segment::new("cruise", 3.0, &[KeyCode::KeyW, KeyCode::ShiftLeft]),
        Segment::new("bank", 1.0, &[KeyCode::KeyD, KeyCode::ArrowRight]),
        Segment::new("reset", 2.5, &[KeyCode::KeyR]),
        Segment::new("chase view", 0.5, &[KeyCode::KeyV]),
        Segment::new("autopilot", 30.0, &[KeyCode::KeyL]),
    ]
}

pub struct ScenarioPlayer {
    segments: Vec<Segment>,
    index: usize,
    segment_time: f32,
    started: bool,
    input: InputState,
}

impl ScenarioPlayer {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            index: 0,
            segment_time: 0.0,
            started: false,
            input: InputState::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.segments.len()
    }

    pub fn current_label(&self) -> Option<&'static str> {
        self.segments.get(self.index).map(|s| s.label)
    }

    /// Input for the next tick of `dt` seconds. Neutral once finished.
    pub fn next_input(&mut self, dt: f32) -> ControlInput {
        self.input.begin_frame();

        let Some(segment) = self.segments.get(self.index) else {
            return self.input.snapshot();
        };

        if !self.started {
            log::info!("Scenario: {} ({:.1}s)", segment.label, segment.duration);
            for key in &segment.keys {
                self.input.process_keyboard(*key, ElementState::Pressed);
            }
            self.started = true;
        }

        let snapshot = self.input.snapshot();

        self.segment_time += dt;
        if self.segment_time >= segment.duration {
            for key in &segment.keys {
                self.input.process_keyboard(*key, ElementState::Released);
            }
            self.index += 1;
            self.segment_time = 0.0;
            self.started = false;
        }
        snapshot
    }
}
