//! Control input for the craft: two-handed controller snapshots and a keyboard
//! stand-in that produces them.

use glam::Vec2;
use std::collections::HashSet;

/// Controller buttons, named after their VR controller positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Right-hand primary (A): smooth reset.
    RightPrimary,
    /// Right-hand secondary (B): navigate and land.
    RightSecondary,
    /// Left-hand primary (X): manual landing override.
    LeftPrimary,
    /// Left-hand secondary (Y): toggle view mode.
    LeftSecondary,
}

impl Button {
    fn bit(self) -> u8 {
        match self {
            Button::RightPrimary => 1 << 0,
            Button::RightSecondary => 1 << 1,
            Button::LeftPrimary => 1 << 2,
            Button::LeftSecondary => 1 << 3,
        }
    }
}

/// Set of buttons that went down this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges(u8);

impl ButtonEdges {
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn contains(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }
}

/// One tick of controller input.
///
/// Each analog feature is optional: `None` means the device did not report it
/// this tick, which callers treat as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Right stick: y = thrust, x = yaw.
    pub right_stick: Option<Vec2>,
    /// Left stick: y = pitch, x = roll.
    pub left_stick: Option<Vec2>,
    /// Right trigger: large forward acceleration.
    pub right_trigger: Option<f32>,
    /// Left trigger: large deceleration.
    pub left_trigger: Option<f32>,
    /// Buttons pressed this tick.
    pub pressed: ButtonEdges,
}

impl ControlInput {
    /// Input with every analog feature reported at rest.
    pub fn neutral() -> Self {
        Self {
            right_stick: Some(Vec2::ZERO),
            left_stick: Some(Vec2::ZERO),
            right_trigger: Some(0.0),
            left_trigger: Some(0.0),
            pressed: ButtonEdges::default(),
        }
    }

    pub fn with_right_stick(mut self, stick: Vec2) -> Self {
        self.right_stick = Some(clamp_stick(stick));
        self
    }

    pub fn with_left_stick(mut self, stick: Vec2) -> Self {
        self.left_stick = Some(clamp_stick(stick));
        self
    }

    pub fn with_right_trigger(mut self, value: f32) -> Self {
        self.right_trigger = Some(value.clamp(0.0, 1.0));
        self
    }

    pub fn with_left_trigger(mut self, value: f32) -> Self {
        self.left_trigger = Some(value.clamp(0.0, 1.0));
        self
    }

    pub fn with_pressed(mut self, button: Button) -> Self {
        self.pressed.insert(button);
        self
    }

    /// Check if a button went down this tick.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(button)
    }
}

fn clamp_stick(stick: Vec2) -> Vec2 {
    stick.clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Keyboard layout used when no VR controllers are attached.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub thrust_forward: KeyCode,
    pub thrust_back: KeyCode,
    pub yaw_left: KeyCode,
    pub yaw_right: KeyCode,
    pub pitch_up: KeyCode,
    pub pitch_down: KeyCode,
    pub roll_left: KeyCode,
    pub roll_right: KeyCode,
    pub boost: KeyCode,
    pub brake: KeyCode,
    pub reset: KeyCode,
    pub navigate: KeyCode,
    pub manual_land: KeyCode,
    pub toggle_view: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            thrust_forward: KeyCode::KeyW,
            thrust_back: KeyCode::KeyS,
            yaw_left: KeyCode::KeyA,
            yaw_right: KeyCode::KeyD,
            pitch_up: KeyCode::ArrowUp,
            pitch_down: KeyCode::ArrowDown,
            roll_left: KeyCode::ArrowLeft,
            roll_right: KeyCode::ArrowRight,
            boost: KeyCode::ShiftLeft,
            brake: KeyCode::ControlLeft,
            reset: KeyCode::KeyR,
            navigate: KeyCode::KeyL,
            manual_land: KeyCode::KeyM,
            toggle_view: KeyCode::KeyV,
        }
    }
}

impl KeyBindings {
    fn button_for(&self, key: KeyCode) -> Option<Button> {
        if key == self.reset {
            Some(Button::RightPrimary)
        } else if key == self.navigate {
            Some(Button::RightSecondary)
        } else if key == self.manual_land {
            Some(Button::LeftPrimary)
        } else if key == self.toggle_view {
            Some(Button::LeftSecondary)
        } else {
            None
        }
    }
}

/// Manages keyboard state for the current tick and turns it into a
/// [`ControlInput`] snapshot.
#[derive(Debug, Default)]
pub struct InputState {
    bindings: KeyBindings,
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this tick.
    keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-tick state. Call at the start of each tick.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_key_held(positive) {
            value += 1.0;
        }
        if self.is_key_held(negative) {
            value -= 1.0;
        }
        value
    }

    fn trigger(&self, key: KeyCode) -> f32 {
        if self.is_key_held(key) {
            1.0
        } else {
            0.0
        }
    }

    /// Build this tick's controller snapshot. The keyboard always reports
    /// every feature, so no field is `None`.
    pub fn snapshot(&self) -> ControlInput {
        let b = &self.bindings;
        let mut input = ControlInput::neutral()
            .with_right_stick(Vec2::new(
                self.axis(b.yaw_left, b.yaw_right),
                self.axis(b.thrust_back, b.thrust_forward),
            ))
            .with_left_stick(Vec2::new(
                self.axis(b.roll_left, b.roll_right),
                self.axis(b.pitch_down, b.pitch_up),
            ))
            .with_right_trigger(self.trigger(b.boost))
            .with_left_trigger(self.trigger(b.brake));

        for key in &self.keys_pressed {
            if let Some(button) = b.button_for(*key) {
                log::trace!("{:?} -> {:?}", key, button);
                input.pressed.insert(button);
            }
        }
        input
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_maps_held_keys_to_axes() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed);
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        let snap = input.snapshot();
        assert_eq!(snap.right_stick, Some(Vec2::new(0.0, 1.0)));
        assert_eq!(snap.left_stick, Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(snap.right_trigger, Some(1.0));
        assert_eq!(snap.left_trigger, Some(0.0));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(input.snapshot().right_stick, Some(Vec2::ZERO));
    }

    #[test]
    fn button_edge_only_on_first_tick() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        assert!(input.snapshot().is_pressed(Button::RightSecondary));

        input.begin_frame();
        // Key repeat while held is not a new edge.
        input.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
        assert!(!input.snapshot().is_pressed(Button::RightSecondary));
        assert!(input.is_key_held(KeyCode::KeyL));
    }

    #[test]
    fn release_returns_axis_to_rest() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_key_held(KeyCode::KeyW));
        assert_eq!(input.snapshot().right_stick, Some(Vec2::ZERO));
    }

    #[test]
    fn builder_clamps_ranges() {
        let snap = ControlInput::default()
            .with_right_stick(Vec2::new(3.0, -2.0))
            .with_left_trigger(1.5);
        assert_eq!(snap.right_stick, Some(Vec2::new(1.0, -1.0)));
        assert_eq!(snap.left_trigger, Some(1.0));
        assert_eq!(snap.left_stick, None);
    }

    #[test]
    fn edges_hold_several_buttons() {
        let mut edges = ButtonEdges::default();
        edges.insert(Button::LeftSecondary);
        edges.insert(Button::RightPrimary);
        assert!(edges.contains(Button::RightPrimary));
        assert!(edges.contains(Button::LeftSecondary));
        assert!(!edges.contains(Button::RightSecondary));
    }
}
