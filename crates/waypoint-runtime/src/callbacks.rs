#![forbid(unsafe_code)]

//! Lifecycle callbacks registered by the host application.

use waypoint_core::step::Step;

type StepFn = Box<dyn FnMut(&Step)>;
type StepIndexFn = Box<dyn FnMut(&Step, usize)>;
type UnitFn = Box<dyn FnMut()>;

/// Optional handlers for tour lifecycle events.
///
/// All handlers run synchronously on the thread driving the controller.
#[derive(Default)]
pub struct TourCallbacks {
    on_tour_start: Option<StepFn>,
    on_step_change: Option<StepIndexFn>,
    on_tour_complete: Option<UnitFn>,
    on_tour_skip: Option<StepFn>,
    on_beacon_click: Option<StepFn>,
}

impl core::fmt::Debug for TourCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TourCallbacks")
            .field("on_tour_start", &self.on_tour_start.is_some())
            .field("on_step_change", &self.on_step_change.is_some())
            .field("on_tour_complete", &self.on_tour_complete.is_some())
            .field("on_tour_skip", &self.on_tour_skip.is_some())
            .field("on_beacon_click", &self.on_beacon_click.is_some())
            .finish()
    }
}

impl TourCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the first step when a tour starts.
    #[must_use]
    pub fn on_tour_start(mut self, f: impl FnMut(&Step) + 'static) -> Self {
        self.on_tour_start = Some(Box::new(f));
        self
    }

    /// Called with the step and its index each time the displayed step
    /// changes, including step 0 on start.
    #[must_use]
    pub fn on_step_change(mut self, f: impl FnMut(&Step, usize) + 'static) -> Self {
        self.on_step_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_tour_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_tour_complete = Some(Box::new(f));
        self
    }

    /// Called with the step being shown when the user skipped.
    #[must_use]
    pub fn on_tour_skip(mut self, f: impl FnMut(&Step) + 'static) -> Self {
        self.on_tour_skip = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_beacon_click(mut self, f: impl FnMut(&Step) + 'static) -> Self {
        self.on_beacon_click = Some(Box::new(f));
        self
    }

    pub(crate) fn tour_start(&mut self, step: &Step) {
        if let Some(f) = self.on_tour_start.as_mut() {
            f(step);
        }
    }

    pub(crate) fn step_change(&mut self, step: &Step, index: usize) {
        if let Some(f) = self.on_step_change.as_mut() {
            f(step, index);
        }
    }

    pub(crate) fn tour_complete(&mut self) {
        if let Some(f) = self.on_tour_complete.as_mut() {
            f();
        }
    }

    pub(crate) fn tour_skip(&mut self, step: &Step) {
        if let Some(f) = self.on_tour_skip.as_mut() {
            f(step);
        }
    }

    pub(crate) fn beacon_click(&mut self, step: &Step) {
        if let Some(f) = self.on_beacon_click.as_mut() {
            f(step);
        }
    }
}
