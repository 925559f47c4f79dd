#![forbid(unsafe_code)]

//! Tour controller: binds the reducer to a host page.
//!
//! # Lifecycle
//!
//! ```text
//!  start ──validate──► START_TOUR ──► enter step 0 ──► (next/back/keys/ticks) ──► end
//!           │ invalid                    │ target missing: retry every 250ms
//!           ▼                            ▼
//!       SET_ERROR                 bare overlay, no tooltip
//! ```
//!
//! Entering a step releases the previous step's listeners and timers,
//! resolves the target, scrolls it into view, attaches the position tracker,
//! resolves placement, and then notifies `on_step_change`. On the last step a
//! completion timer is armed; moving away cancels it.
//!
//! Every end path (complete, skip, close, deactivate) releases listeners and
//! cancels timers before the state resets, so no callback of an ended tour
//! can fire afterwards.
//!
//! Time is host-driven: call [`TourController::tick`] at or after
//! [`TourController::next_deadline`].

use core::time::Duration;

use serde_json::Value;
use waypoint_backend::{DomSignal, Host, HostClock};
use waypoint_core::config::{ConfigOverride, ScrollBehavior, TourConfig};
use waypoint_core::error::{Result, TourError};
use waypoint_core::geometry::{ElementGeometry, Size};
use waypoint_core::keys::{FocusTarget, KeyCommand, NavKey, command_for_key};
use waypoint_core::placement::{PlacementOptions, ResolvedPlacement, resolve_placement};
use waypoint_core::step::{Step, StepUpdate};
use waypoint_core::validate::{validate_steps, validate_steps_json};
use waypoint_widgets::{Anchor, ControlAction, FrameInput, StepPhase, TourFrame};

use crate::callbacks::TourCallbacks;
use crate::reducer::{TourAction, TourRunState};
use crate::scroll::{self, ScrollOutcome};
use crate::timer::{Timer, earliest};
use crate::tracker::PositionTracker;

/// Interval between lookups of a step target that was not found.
pub const MISSING_TARGET_RETRY: Duration = Duration::from_millis(250);

/// Tooltip height assumed until the host reports a measured size.
pub const DEFAULT_TOOLTIP_HEIGHT: f64 = 150.0;

/// Why a tour ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Completed,
    Skipped,
    Closed,
    /// The host flipped its active flag off.
    Deactivated,
}

impl EndReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Closed => "closed",
            Self::Deactivated => "deactivated",
        }
    }
}

pub struct TourController<H: Host> {
    host: H,
    state: TourRunState,
    defaults: TourConfig,
    callbacks: TourCallbacks,
    tracker: PositionTracker<H>,
    completion: Timer,
    retry: Timer,
    phase: StepPhase,
    /// Index whose entry has been announced through `on_step_change`.
    displayed: Option<usize>,
    anchor: Option<Anchor>,
    tooltip_size: Option<Size>,
    /// Destination of a scroll that may still be animating.
    scroll_destination: Option<f64>,
    loaded: Option<(Vec<Step>, ConfigOverride)>,
    tour_seq: u64,
}

impl<H: Host> TourController<H> {
    pub fn new(host: H) -> Self {
        Self::with_defaults(host, TourConfig::default())
    }

    /// Controller whose tours merge their overrides over `defaults`.
    pub fn with_defaults(host: H, defaults: TourConfig) -> Self {
        Self {
            host,
            state: TourRunState::default(),
            defaults,
            callbacks: TourCallbacks::default(),
            tracker: PositionTracker::default(),
            completion: Timer::new(),
            retry: Timer::new(),
            phase: StepPhase::default(),
            displayed: None,
            anchor: None,
            tooltip_size: None,
            scroll_destination: None,
            loaded: None,
            tour_seq: 0,
        }
    }

    #[must_use]
    pub fn callbacks(mut self, callbacks: TourCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: TourCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &TourRunState {
        &self.state
    }

    pub fn defaults(&self) -> &TourConfig {
        &self.defaults
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.state.current()
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Geometry of the current target, `None` while it is missing.
    pub fn target_geometry(&self) -> Option<ElementGeometry> {
        self.anchor.map(|a| a.geometry)
    }

    pub fn placement(&self) -> Option<ResolvedPlacement> {
        self.anchor.map(|a| a.placement)
    }

    /// Listener registrations currently held for the displayed step.
    pub fn listener_count(&self) -> usize {
        self.tracker.listener_count()
    }

    // ── Activation ───────────────────────────────────────────────────────

    /// Validate `steps` and start a tour. On failure the error is recorded
    /// in the run state and nothing starts.
    pub fn start(&mut self, steps: Vec<Step>, overrides: &ConfigOverride) -> Result<()> {
        self.state.apply(TourAction::SetLoading(true));
        let report = validate_steps(&steps);
        if !report.is_valid() {
            return Err(self.reject(report.errors));
        }
        let config = self.defaults.merged(overrides);
        warn_config_problems(&config.problems());
        self.begin(steps, config);
        Ok(())
    }

    /// Start from untyped host payloads.
    ///
    /// Configuration problems, including a configuration that is not an
    /// object at all, are logged and the offending values ignored. Only the
    /// step payload can refuse a start.
    pub fn start_json(&mut self, steps: &Value, config: Option<&Value>) -> Result<()> {
        self.state.apply(TourAction::SetLoading(true));
        let report = validate_steps_json(steps);
        if !report.is_valid() {
            return Err(self.reject(report.errors));
        }

        let steps: Vec<Step> = match serde_json::from_value(steps.clone()) {
            Ok(steps) => steps,
            Err(err) => {
                let err = TourError::from(err);
                self.state.apply(TourAction::SetError(Some(err.to_string())));
                return Err(err);
            }
        };
        let overrides = match config.filter(|v| !v.is_null()) {
            Some(value) => {
                let (overrides, problems) = ConfigOverride::from_json_advisory(value);
                warn_config_problems(&problems);
                overrides
            }
            None => ConfigOverride::default(),
        };
        let config = self.defaults.merged(&overrides);
        self.begin(steps, config);
        Ok(())
    }

    /// Remember a tour definition for [`TourController::set_active`].
    pub fn load(&mut self, steps: Vec<Step>, overrides: ConfigOverride) {
        self.loaded = Some((steps, overrides));
    }

    /// Mirror an external active flag. `false` ends a running tour without
    /// callbacks; `true` starts the loaded definition unless already running.
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        if !active {
            self.finish(EndReason::Deactivated);
            return Ok(());
        }
        if self.state.is_active {
            return Ok(());
        }
        let (steps, overrides) = self.loaded.clone().ok_or(TourError::NotLoaded)?;
        self.start(steps, &overrides)
    }

    fn reject(&mut self, errors: Vec<String>) -> TourError {
        tracing::warn!(errors = errors.len(), "Rejected tour steps");
        self.state.apply(TourAction::SetError(Some(errors.join("\n"))));
        TourError::invalid_steps(errors)
    }

    fn begin(&mut self, steps: Vec<Step>, config: TourConfig) {
        self.release_step();
        self.displayed = None;
        self.tooltip_size = None;

        self.tour_seq += 1;
        let tour_id = format!("tour-{}-{}", self.now().as_millis(), self.tour_seq);
        tracing::info!(tour_id = %tour_id, steps = steps.len(), "Tour started");
        self.state.apply(TourAction::StartTour {
            steps,
            config,
            tour_id,
        });

        if let Some(first) = self.state.steps.first() {
            self.callbacks.tour_start(first);
        }
        self.enter_step();
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Advance; on the last step this completes the tour immediately.
    pub fn next_step(&mut self) {
        if !self.state.is_active {
            return;
        }
        if self.state.is_last_step() {
            self.finish(EndReason::Completed);
        } else {
            self.dispatch(TourAction::NextStep);
        }
    }

    pub fn previous_step(&mut self) {
        if self.state.is_active {
            self.dispatch(TourAction::PreviousStep);
        }
    }

    /// Jump to `index`, clamped into the step list.
    pub fn go_to_step(&mut self, index: usize) {
        if self.state.is_active {
            self.dispatch(TourAction::GoToStep(index));
        }
    }

    /// End the tour, reporting the current step to `on_tour_skip`.
    pub fn skip(&mut self) {
        self.finish(EndReason::Skipped);
    }

    /// End the tour without skip or complete callbacks.
    pub fn close(&mut self) {
        self.finish(EndReason::Closed);
    }

    pub fn end_tour(&mut self) {
        self.finish(EndReason::Closed);
    }

    /// The user clicked the beacon: notify and open the tooltip.
    pub fn beacon_click(&mut self) {
        if !self.state.is_active || self.phase != StepPhase::Beacon {
            return;
        }
        if let Some(step) = self.state.current() {
            self.callbacks.beacon_click(step);
        }
        self.phase = StepPhase::Tooltip;
        tracing::debug!(step = self.state.current_step, "Beacon opened tooltip");
        self.sync_completion();
    }

    /// A click on the overlay outside the spotlight.
    pub fn overlay_click(&mut self) {
        if self.state.is_active && self.state.config.close_on_overlay_click {
            self.close();
        }
    }

    /// Route a click on a rendered control.
    pub fn activate(&mut self, action: ControlAction) {
        match action {
            ControlAction::Back => self.previous_step(),
            ControlAction::Next => self.next_step(),
            ControlAction::Skip => self.skip(),
            ControlAction::Close => self.close(),
        }
    }

    /// Handle a DOM `key` value. Returns `true` when the key was consumed
    /// and the host should prevent its default action.
    pub fn handle_key(&mut self, key: &str, focus: FocusTarget) -> bool {
        if !self.state.is_active || !self.state.config.keyboard_navigation {
            return false;
        }
        let Some(command) = NavKey::from_dom_key(key).and_then(|k| command_for_key(k, focus))
        else {
            return false;
        };
        match command {
            KeyCommand::Next => self.next_step(),
            KeyCommand::Previous => self.previous_step(),
            KeyCommand::Close => self.close(),
        }
        true
    }

    fn dispatch(&mut self, action: TourAction) {
        self.state.apply(action);
        if self.displayed != Some(self.state.current_step) {
            self.enter_step();
        }
    }

    // ── Dynamic edits ────────────────────────────────────────────────────

    /// Insert `step` at `index` (appending when `None` or past the end).
    pub fn add_step(&mut self, step: Step, index: Option<usize>) -> Result<()> {
        self.ensure_running()?;
        let mut steps = self.state.steps.clone();
        let at = index.unwrap_or(steps.len()).min(steps.len());
        steps.insert(at, step);
        self.restart_with(steps)
    }

    pub fn remove_step(&mut self, id: &str) -> Result<()> {
        self.ensure_running()?;
        let mut steps = self.state.steps.clone();
        let at = position_of(&steps, id)?;
        steps.remove(at);
        self.restart_with(steps)
    }

    pub fn update_step(&mut self, id: &str, update: StepUpdate) -> Result<()> {
        self.ensure_running()?;
        let mut steps = self.state.steps.clone();
        let at = position_of(&steps, id)?;
        steps[at].apply(update);
        self.restart_with(steps)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_active {
            Ok(())
        } else {
            Err(TourError::NotRunning)
        }
    }

    /// Replace the step list of the running tour; the tour restarts at
    /// step 0 with the same configuration and id.
    fn restart_with(&mut self, steps: Vec<Step>) -> Result<()> {
        validate_steps(&steps).into_result()?;
        let config = self.state.config.clone();
        let tour_id = self.state.tour_id.clone().unwrap_or_default();

        self.release_step();
        self.displayed = None;
        tracing::debug!(steps = steps.len(), "Tour steps edited; restarting");
        self.state.apply(TourAction::StartTour {
            steps,
            config,
            tour_id,
        });
        self.enter_step();
        Ok(())
    }

    // ── Host signals ─────────────────────────────────────────────────────

    /// Resize or scroll observed by one of the tracker's listeners.
    pub fn handle_signal(&mut self, signal: DomSignal) {
        if self.state.is_active {
            let now = self.now();
            self.tracker.notify(signal, now);
        }
    }

    /// The host measured the rendered tooltip.
    pub fn set_tooltip_size(&mut self, size: Size) {
        let size = size.sanitized();
        if self.tooltip_size == Some(size) {
            return;
        }
        self.tooltip_size = Some(size);
        if self.state.is_active {
            self.refresh_anchor();
        }
    }

    /// Run every timer that is due. Returns `true` when the frame changed.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_active {
            return false;
        }
        let now = self.now();
        let mut changed = false;

        if self.tracker.poll(&self.host, now) {
            // Scroll activity has settled; trust the live offset again.
            self.scroll_destination = None;
            self.refresh_anchor();
            changed = true;
        }

        if self.retry.poll(now)
            && let Some(step) = self.state.current().cloned()
        {
            if self.resolve_target(&step) {
                tracing::debug!(step_id = %step.id, "Tour target resolved on retry");
                changed = true;
            } else {
                self.retry.schedule(now, MISSING_TARGET_RETRY);
            }
        }

        if self.completion.poll(now) {
            self.finish(EndReason::Completed);
            changed = true;
        }

        changed
    }

    /// When the host should call [`TourController::tick`] next.
    pub fn next_deadline(&self) -> Option<Duration> {
        earliest([
            self.tracker.deadline(),
            self.retry.deadline(),
            self.completion.deadline(),
        ])
    }

    /// Describe what to paint, or `None` while no tour is running.
    pub fn frame(&self) -> Option<TourFrame> {
        if !self.state.is_active {
            return None;
        }
        let step = self.state.current()?;
        let metrics = self.state.config.metrics_for(self.host.viewport_size().width);
        Some(TourFrame::build(&FrameInput {
            step,
            index: self.state.current_step,
            total: self.state.total(),
            config: &self.state.config,
            anchor: self.anchor,
            phase: self.phase,
            max_width: metrics.max_width,
        }))
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn now(&self) -> Duration {
        self.host.clock().now_mono()
    }

    fn enter_step(&mut self) {
        let index = self.state.current_step;
        let Some(step) = self.state.current().cloned() else {
            return;
        };

        self.release_step();
        self.phase = StepPhase::initial(&step);
        self.displayed = Some(index);
        tracing::debug!(step_id = %step.id, index, "Entering step");

        if !self.resolve_target(&step) {
            tracing::warn!(
                step_id = %step.id,
                target = %step.target,
                "Tour target not found"
            );
            let now = self.now();
            self.retry.schedule(now, MISSING_TARGET_RETRY);
        }

        self.callbacks.step_change(&step, index);
        self.sync_completion();
    }

    /// Look up, scroll to, and start tracking the step target.
    fn resolve_target(&mut self, step: &Step) -> bool {
        let element = match self.host.query(&step.target) {
            Ok(element) => element,
            Err(err) => {
                tracing::debug!(target = %step.target, error = %err, "Target selector rejected");
                None
            }
        };
        let Some(element) = element else {
            return false;
        };

        let behavior = self.state.config.scroll_behavior;
        let offset = self.state.config.scroll_offset;
        match scroll::bring_into_view(&mut self.host, &element, behavior, offset) {
            // Instant scrolls have landed already; smooth ones are still animating.
            Ok(ScrollOutcome::Scrolled {
                top,
                behavior: ScrollBehavior::Smooth,
            }) => self.scroll_destination = Some(top),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "Failed to scroll target into view"),
        }

        self.tracker.attach(&mut self.host, Some(element));
        self.refresh_anchor();
        true
    }

    fn refresh_anchor(&mut self) {
        let (Some(geometry), Some(step)) = (self.tracker.geometry(), self.state.current()) else {
            self.anchor = None;
            return;
        };
        let mut viewport = self.host.viewport();
        if let Some(top) = self.scroll_destination {
            viewport.scroll_y = top;
        }
        let metrics = self.state.config.metrics_for(viewport.width);
        let tooltip = self
            .tooltip_size
            .unwrap_or(Size::new(metrics.max_width, DEFAULT_TOOLTIP_HEIGHT));
        let placement = resolve_placement(
            &geometry,
            tooltip,
            &viewport,
            step.placement,
            &PlacementOptions {
                spacing: metrics.spacing,
            },
        );
        self.anchor = Some(Anchor {
            geometry,
            placement,
        });
    }

    /// Arm passive completion once the last step's tooltip is on screen.
    fn sync_completion(&mut self) {
        self.completion.cancel();
        if self.state.is_active && self.state.is_last_step() && self.phase == StepPhase::Tooltip {
            let delay = self.state.config.completion_delay();
            let now = self.now();
            self.completion.schedule(now, delay);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Completion scheduled");
        }
    }

    /// Drop everything scoped to the displayed step.
    fn release_step(&mut self) {
        self.tracker.detach();
        self.retry.cancel();
        self.completion.cancel();
        self.scroll_destination = None;
        self.anchor = None;
    }

    fn finish(&mut self, reason: EndReason) {
        if !self.state.is_active {
            return;
        }
        let step = self.state.current().cloned();
        tracing::info!(
            tour_id = self.state.tour_id.as_deref().unwrap_or_default(),
            step = self.state.current_step,
            reason = reason.as_str(),
            "Tour ended"
        );

        self.release_step();
        self.displayed = None;
        self.phase = StepPhase::default();
        self.tooltip_size = None;

        match (reason, step) {
            (EndReason::Completed, _) => self.callbacks.tour_complete(),
            (EndReason::Skipped, Some(step)) => self.callbacks.tour_skip(&step),
            _ => {}
        }
        self.state.apply(TourAction::EndTour);
    }
}

fn warn_config_problems(problems: &[String]) {
    for problem in problems {
        tracing::warn!(problem = %problem, "Ignoring configuration value");
    }
}

fn position_of(steps: &[Step], id: &str) -> Result<usize> {
    steps
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| TourError::step_not_found(id))
}
