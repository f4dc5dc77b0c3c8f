//! The flight controller: one `tick` per simulation step.
//!
//! Exactly one sequence owns the craft each tick, selected by
//! [`ControllerMode`]. Manual input drives the craft only in `Manual`.

use engine_core::TargetBody;
use input::{Button, ControlInput};

use crate::autopilot::{Approach, AutopilotSettings, LandStep, NavigateStep};
use crate::body::CraftBody;
use crate::config::FlightConfig;
use crate::error::FlightError;
use crate::events::{FlightEvent, ModeKind, ViewMode};
use crate::mapper::ManualMapper;
use crate::reset::{ResetTween, TweenStep};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ControllerMode {
    #[default]
    Manual,
    Resetting(ResetTween),
    Navigating(Approach),
    Landing(Approach),
}

impl ControllerMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            ControllerMode::Manual => ModeKind::Manual,
            ControllerMode::Resetting(_) => ModeKind::Resetting,
            ControllerMode::Navigating(_) => ModeKind::Navigating,
            ControllerMode::Landing(_) => ModeKind::Landing,
        }
    }

    fn autopilot_engaged(&self) -> bool {
        matches!(self, ControllerMode::Navigating(_) | ControllerMode::Landing(_))
    }
}

pub struct FlightController {
    mode: ControllerMode,
    /// Latched by the manual-land button; checked once per approach tick.
    manual_land: bool,
    view_mode: ViewMode,
    mapper: ManualMapper,
    autopilot: AutopilotSettings,
    reset_duration: f32,
}

impl FlightController {
    pub fn new(config: &FlightConfig) -> Result<Self, FlightError> {
        config.validate()?;
        Ok(Self {
            mode: ControllerMode::Manual,
            manual_land: false,
            view_mode: ViewMode::default(),
            mapper: ManualMapper::from_config(config),
            autopilot: AutopilotSettings::from_config(config),
            reset_duration: config.reset_duration,
        })
    }

    pub fn mode(&self) -> &ControllerMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn manual_land_requested(&self) -> bool {
        self.manual_land
    }

    /// Ask a running approach to hand control back.
    pub fn request_manual_land(&mut self) {
        self.manual_land = true;
    }

    fn switch(&mut self, to: ControllerMode, events: &mut Vec<FlightEvent>) {
        let from = self.mode.kind();
        let to_kind = to.kind();
        self.mode = to;
        if from != to_kind {
            log::info!("Flight mode {:?} -> {:?}", from, to_kind);
            events.push(FlightEvent::ModeChanged { from, to: to_kind });
        }
    }

    /// Start the reset tween. Only possible from `Manual`.
    pub fn begin_reset(&mut self, body: &impl CraftBody, events: &mut Vec<FlightEvent>) -> bool {
        if !matches!(self.mode, ControllerMode::Manual) {
            log::debug!("reset ignored in {:?}", self.mode.kind());
            return false;
        }
        let tween = ResetTween::begin(body, self.reset_duration);
        self.switch(ControllerMode::Resetting(tween), events);
        true
    }

    /// Start navigate-and-land. A running reset is abandoned; a running
    /// approach or descent makes this a no-op.
    pub fn begin_approach(
        &mut self,
        body: &impl CraftBody,
        target: Option<&TargetBody>,
        events: &mut Vec<FlightEvent>,
    ) -> Result<bool, FlightError> {
        if self.mode.autopilot_engaged() {
            log::debug!("approach already running");
            return Ok(false);
        }
        let target = target.ok_or(FlightError::MissingTarget)?;
        self.manual_land = false;
        let approach = Approach::begin(body, target, &self.autopilot);
        self.switch(ControllerMode::Navigating(approach), events);
        Ok(true)
    }

    /// Advance the controller by one tick of `dt` seconds.
    ///
    /// Button edges are handled first (reset, approach, manual land, view
    /// toggle), then the active sequence runs one step. A sequence started
    /// this tick takes its first step immediately. An approach requested
    /// without a target is not entered and the tick carries on.
    pub fn tick(
        &mut self,
        input: &ControlInput,
        dt: f32,
        body: &mut impl CraftBody,
        target: Option<&TargetBody>,
    ) -> Result<Vec<FlightEvent>, FlightError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FlightError::InvalidTick(dt));
        }

        let mut events = Vec::new();
        if input.is_pressed(Button::RightPrimary) {
            self.begin_reset(body, &mut events);
        }
        if input.is_pressed(Button::RightSecondary) {
            // Only the approach is skipped; the rest of the tick still runs.
            if let Err(e) = self.begin_approach(body, target, &mut events) {
                log::warn!("Approach not started: {}", e);
            }
        }
        if input.is_pressed(Button::LeftPrimary) {
            log::debug!("manual landing requested");
            self.manual_land = true;
        }
        if input.is_pressed(Button::LeftSecondary) {
            self.view_mode = self.view_mode.toggled();
            events.push(FlightEvent::ViewModeChanged(self.view_mode));
        }

        self.advance(input, dt, body, &mut events);
        Ok(events)
    }

    fn advance(
        &mut self,
        input: &ControlInput,
        dt: f32,
        body: &mut impl CraftBody,
        events: &mut Vec<FlightEvent>,
    ) {
        match self.mode {
            ControllerMode::Manual => {
                self.mapper.apply(input, body, dt);
            }
            ControllerMode::Resetting(mut tween) => {
                let next = match tween.step(body, dt) {
                    TweenStep::Running => ControllerMode::Resetting(tween),
                    TweenStep::Finished => ControllerMode::Manual,
                };
                self.switch(next, events);
            }
            ControllerMode::Navigating(mut approach) => {
                match approach.navigate_step(body, &self.autopilot, dt, self.manual_land) {
                    NavigateStep::Continue => self.switch(ControllerMode::Navigating(approach), events),
                    NavigateStep::Cancelled => {
                        log::info!("Approach cancelled for manual landing");
                        self.switch(ControllerMode::Manual, events);
                    }
                    NavigateStep::ReachedThreshold => {
                        self.switch(ControllerMode::Landing(approach), events);
                        self.descend(approach, body, dt, events);
                    }
                }
            }
            ControllerMode::Landing(approach) => self.descend(approach, body, dt, events),
        }
    }

    fn descend(
        &mut self,
        mut approach: Approach,
        body: &mut impl CraftBody,
        dt: f32,
        events: &mut Vec<FlightEvent>,
    ) {
        match approach.land_step(body, &self.autopilot, dt) {
            LandStep::Continue => self.switch(ControllerMode::Landing(approach), events),
            LandStep::Touchdown => {
                log::info!("Touchdown at {:?}", body.position());
                self.switch(ControllerMode::Manual, events);
            }
        }
    }
}
