//! Notifications for the presentation layer.

use std::fmt;

use crate::scene::Region;

/// Which controller sequence is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Manual,
    Resetting,
    Navigating,
    Landing,
}

/// Cockpit or chase camera. Only the toggle lives here; switching cameras
/// and canvases is up to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    FirstPerson,
    ThirdPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEvent {
    ModeChanged { from: ModeKind, to: ModeKind },
    ViewModeChanged(ViewMode),
    SceneChanged { from: Region, to: Region },
    /// Exterior atmosphere intensity in [0, 1].
    AtmosphereFade(f32),
}

impl fmt::Display for FlightEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightEvent::ModeChanged { from, to } => write!(f, "mode {:?} -> {:?}", from, to),
            FlightEvent::ViewModeChanged(mode) => write!(f, "view {:?}", mode),
            FlightEvent::SceneChanged { from, to } => write!(f, "scene {:?} -> {:?}", from, to),
            FlightEvent::AtmosphereFade(amount) => write!(f, "atmosphere fade {:.2}", amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_toggles_back() {
        let mode = ViewMode::default();
        assert_eq!(mode.toggled(), ViewMode::ThirdPerson);
        assert_eq!(mode.toggled().toggled(), mode);
    }

    #[test]
    fn display_is_readable() {
        let e = FlightEvent::ModeChanged {
            from: ModeKind::Navigating,
            to: ModeKind::Landing,
        };
        assert_eq!(e.to_string(), "mode Navigating -> Landing");
        assert_eq!(FlightEvent::AtmosphereFade(0.25).to_string(), "atmosphere fade 0.25");
    }
}
