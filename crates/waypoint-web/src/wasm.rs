#![forbid(unsafe_code)]

//! `WaypointTour`: the JS-facing tour object.
//!
//! # Re-entrancy
//!
//! State lives behind `Rc<RefCell<..>>` and every exported method takes
//! `&self`. Runtime callbacks only record events while the state is
//! borrowed; the matching JS handlers run after the borrow is released, so
//! a handler may call straight back into the tour (`onStepChange` calling
//! `next()` is fine).
//!
//! # Time
//!
//! After each operation the next controller deadline is armed with a single
//! `setTimeout`; resize and scroll listeners wake the same driver.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use waypoint_backend::{Host, HostClock};
use waypoint_core::config::ConfigOverride;
use waypoint_core::geometry::Size;
use waypoint_core::keys::FocusTarget;
use waypoint_core::step::{Step, StepUpdate};
use waypoint_runtime::{TourCallbacks, TourController};
use waypoint_widgets::{CONTROL_MARKER, ControlAction, TourFrame};

use crate::browser::BrowserDom;
use crate::portal::{
    BEACON_MARKER, OVERLAY_MARKER, PORTAL_ROOT_ID, overlay_pointer_events, render_html, root_style,
};

#[derive(Debug, Clone)]
enum TourEvent {
    Start(Step),
    StepChange(Step, usize),
    Complete,
    Skip(Step),
    BeaconClick(Step),
}

type EventLog = Rc<RefCell<Vec<TourEvent>>>;

fn recording_callbacks(log: &EventLog) -> TourCallbacks {
    let start = Rc::clone(log);
    let change = Rc::clone(log);
    let complete = Rc::clone(log);
    let skip = Rc::clone(log);
    let beacon = Rc::clone(log);
    TourCallbacks::new()
        .on_tour_start(move |step| start.borrow_mut().push(TourEvent::Start(step.clone())))
        .on_step_change(move |step, index| {
            change
                .borrow_mut()
                .push(TourEvent::StepChange(step.clone(), index));
        })
        .on_tour_complete(move || complete.borrow_mut().push(TourEvent::Complete))
        .on_tour_skip(move |step| skip.borrow_mut().push(TourEvent::Skip(step.clone())))
        .on_beacon_click(move |step| beacon.borrow_mut().push(TourEvent::BeaconClick(step.clone())))
}

#[derive(Default, Clone)]
struct JsHandlers {
    tour_start: Option<Function>,
    step_change: Option<Function>,
    tour_complete: Option<Function>,
    tour_skip: Option<Function>,
    beacon_click: Option<Function>,
}

impl JsHandlers {
    fn dispatch(&self, events: Vec<TourEvent>) {
        for event in events {
            let result = match &event {
                TourEvent::Start(step) => call1(self.tour_start.as_ref(), step),
                TourEvent::StepChange(step, index) => match self.step_change.as_ref() {
                    Some(f) => step_to_js(step)
                        .and_then(|s| f.call2(&JsValue::NULL, &s, &JsValue::from(*index as u32))),
                    None => Ok(JsValue::UNDEFINED),
                },
                TourEvent::Complete => match self.tour_complete.as_ref() {
                    Some(f) => f.call0(&JsValue::NULL),
                    None => Ok(JsValue::UNDEFINED),
                },
                TourEvent::Skip(step) => call1(self.tour_skip.as_ref(), step),
                TourEvent::BeaconClick(step) => call1(self.beacon_click.as_ref(), step),
            };
            if let Err(err) = result {
                tracing::warn!(error = ?err, "Tour callback threw");
            }
        }
    }
}

fn call1(f: Option<&Function>, step: &Step) -> Result<JsValue, JsValue> {
    match f {
        Some(f) => f.call1(&JsValue::NULL, &step_to_js(step)?),
        None => Ok(JsValue::UNDEFINED),
    }
}

fn js_error(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn step_to_js(step: &Step) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(step).map_err(js_error)?;
    js_sys::JSON::parse(&text)
}

/// Round-trip a JS value into `serde_json`. `undefined` and `null` map to
/// `Value::Null`.
fn from_js(value: &JsValue) -> Result<serde_json::Value, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::Value::Null);
    }
    let text: String = js_sys::JSON::stringify(value)?.into();
    serde_json::from_str(&text).map_err(js_error)
}

/// Per-key problems surface when the loaded tour starts.
fn overrides_from_js(value: &JsValue) -> Result<ConfigOverride, JsValue> {
    match from_js(value)? {
        serde_json::Value::Null => Ok(ConfigOverride::default()),
        value => Ok(ConfigOverride::from_json(&value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring configuration value");
            ConfigOverride::default()
        })),
    }
}

struct Inner {
    controller: TourController<BrowserDom>,
    events: EventLog,
    handlers: JsHandlers,
    portal: Option<web_sys::Element>,
    frame: Option<TourFrame>,
    /// Last pointer position in document space.
    pointer: Option<(f64, f64)>,
    timeout: Option<i32>,
    driver: Option<Function>,
}

impl Inner {
    fn take_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn pump_signals(&mut self) {
        for signal in self.controller.host_mut().drain_signals() {
            self.controller.handle_signal(signal);
        }
    }

    /// Paint the current frame and re-arm the timer.
    fn sync(&mut self) {
        self.paint();
        self.reschedule();
    }

    fn paint(&mut self) {
        let Some(frame) = self.controller.frame() else {
            if let Some(portal) = self.portal.take() {
                portal.remove();
            }
            self.frame = None;
            return;
        };
        let Some(portal) = self.ensure_portal() else {
            return;
        };
        if self.frame.as_ref() != Some(&frame) {
            portal.set_inner_html(&render_html(&frame));
            self.frame = Some(frame);

            // Placement depends on the rendered tooltip size.
            if let Some(size) = measure_tooltip(&portal) {
                let before = self.controller.placement();
                self.controller.set_tooltip_size(size);
                if self.controller.placement() != before
                    && let Some(frame) = self.controller.frame()
                {
                    portal.set_inner_html(&render_html(&frame));
                    self.frame = Some(frame);
                }
            }
        }
        // Fresh markup starts with the backdrop catching every click.
        self.apply_pointer_events();
    }

    fn ensure_portal(&mut self) -> Option<web_sys::Element> {
        if let Some(portal) = &self.portal {
            return Some(portal.clone());
        }
        let document = self.controller.host().document();
        let body = document.body()?;
        let portal = match document.create_element("div") {
            Ok(portal) => portal,
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to create tour portal");
                return None;
            }
        };
        portal.set_id(PORTAL_ROOT_ID);
        if let Some(frame) = self.controller.frame() {
            let _ = portal.set_attribute("style", &root_style(&frame));
        }
        if let Err(err) = body.append_child(&portal) {
            tracing::warn!(error = ?err, "Failed to mount tour portal");
            return None;
        }
        self.portal = Some(portal.clone());
        Some(portal)
    }

    fn reschedule(&mut self) {
        let window = self.controller.host().window().clone();
        if let Some(handle) = self.timeout.take() {
            window.clear_timeout_with_handle(handle);
        }
        let (Some(deadline), Some(driver)) = (self.controller.next_deadline(), self.driver.as_ref())
        else {
            return;
        };
        let now = self.controller.host().clock().now_mono();
        let delay = deadline.saturating_sub(now).as_millis().min(i32::MAX as u128) as i32;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(driver, delay) {
            Ok(handle) => self.timeout = Some(handle),
            Err(err) => tracing::warn!(error = ?err, "Failed to arm tour timer"),
        }
    }

    fn track_pointer(&mut self, page_x: f64, page_y: f64) {
        self.pointer = Some((page_x, page_y));
        self.apply_pointer_events();
    }

    /// Let clicks inside an interactive cutout reach the page.
    fn apply_pointer_events(&self) {
        let (Some(frame), Some(portal)) = (&self.frame, &self.portal) else {
            return;
        };
        let Ok(Some(overlay)) = portal.query_selector(&format!("[{OVERLAY_MARKER}]")) else {
            return;
        };
        if let Ok(overlay) = overlay.dyn_into::<web_sys::HtmlElement>() {
            let value = overlay_pointer_events(frame, self.pointer);
            let _ = overlay.style().set_property("pointer-events", value);
        }
    }
}

fn measure_tooltip(portal: &web_sys::Element) -> Option<Size> {
    let tooltip = portal
        .query_selector(&format!(".{}", waypoint_widgets::tooltip::TOOLTIP_CLASS))
        .ok()??;
    let rect = tooltip.get_bounding_client_rect();
    Some(Size::new(rect.width(), rect.height()))
}

/// Run `f` against the state, settle queued signals, repaint, and then
/// dispatch recorded callbacks with the state released. Returns `None` when
/// the state is already borrowed further up the stack.
fn run<R>(inner: &Rc<RefCell<Inner>>, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
    let (result, events, handlers) = {
        let mut guard = inner.try_borrow_mut().ok()?;
        let result = f(&mut guard);
        guard.pump_signals();
        guard.sync();
        let events = guard.take_events();
        (result, events, guard.handlers.clone())
    };
    handlers.dispatch(events);
    Some(result)
}

enum PortalClick {
    Control(ControlAction),
    Beacon,
    Overlay,
}

fn classify_click(target: &web_sys::Element) -> Option<PortalClick> {
    if let Ok(Some(control)) = target.closest(&format!("[{CONTROL_MARKER}]")) {
        return control
            .get_attribute(CONTROL_MARKER)
            .and_then(|name| ControlAction::parse(&name))
            .map(PortalClick::Control);
    }
    if let Ok(Some(_)) = target.closest(&format!("[{BEACON_MARKER}]")) {
        return Some(PortalClick::Beacon);
    }
    if let Ok(Some(_)) = target.closest(&format!("[{OVERLAY_MARKER}]")) {
        return Some(PortalClick::Overlay);
    }
    None
}

fn focus_target(document: &web_sys::Document) -> FocusTarget {
    let on_control = document
        .active_element()
        .and_then(|el| el.closest(&format!("[{CONTROL_MARKER}]")).ok().flatten())
        .is_some();
    if on_control {
        FocusTarget::TourControl
    } else {
        FocusTarget::Elsewhere
    }
}

type DomListener = (web_sys::EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>);

#[wasm_bindgen]
pub struct WaypointTour {
    inner: Rc<RefCell<Inner>>,
    /// Owns the JS function armed by timers and the wake hook.
    _driver: Closure<dyn FnMut()>,
    listeners: Vec<DomListener>,
}

#[wasm_bindgen]
impl WaypointTour {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WaypointTour, JsValue> {
        let host = BrowserDom::new()?;
        let document = host.document().clone();
        let events: EventLog = Rc::new(RefCell::new(Vec::new()));
        let controller = TourController::new(host).callbacks(recording_callbacks(&events));
        let inner = Rc::new(RefCell::new(Inner {
            controller,
            events,
            handlers: JsHandlers::default(),
            portal: None,
            frame: None,
            pointer: None,
            timeout: None,
            driver: None,
        }));

        let weak = Rc::downgrade(&inner);
        let driver = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                run(&inner, |inner| {
                    inner.timeout = None;
                    inner.pump_signals();
                    inner.controller.tick();
                });
            }
        });
        {
            let mut guard = inner.borrow_mut();
            let function: Function = driver.as_ref().unchecked_ref::<Function>().clone();
            guard.controller.host_mut().set_wake(Some(function.clone()));
            guard.driver = Some(function);
        }

        let mut tour = WaypointTour {
            inner,
            _driver: driver,
            listeners: Vec::new(),
        };
        tour.install_listeners(&document)?;
        tracing::debug!("WaypointTour created");
        Ok(tour)
    }

    /// Validate and start a tour. `config` may be omitted.
    pub fn start(&self, steps: JsValue, config: JsValue) -> Result<(), JsValue> {
        let steps = from_js(&steps)?;
        let config = from_js(&config)?;
        self.try_with(|inner| inner.controller.start_json(&steps, Some(&config)))
    }

    /// Remember a tour for `setActive(true)`.
    pub fn load(&self, steps: JsValue, config: JsValue) -> Result<(), JsValue> {
        let steps: Vec<Step> = serde_json::from_value(from_js(&steps)?).map_err(js_error)?;
        let overrides = overrides_from_js(&config)?;
        self.with(|inner| inner.controller.load(steps, overrides));
        Ok(())
    }

    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&self, active: bool) -> Result<(), JsValue> {
        self.try_with(|inner| inner.controller.set_active(active))
    }

    pub fn next(&self) {
        self.with(|inner| inner.controller.next_step());
    }

    pub fn back(&self) {
        self.with(|inner| inner.controller.previous_step());
    }

    #[wasm_bindgen(js_name = goToStep)]
    pub fn go_to_step(&self, index: u32) {
        self.with(|inner| inner.controller.go_to_step(index as usize));
    }

    pub fn skip(&self) {
        self.with(|inner| inner.controller.skip());
    }

    pub fn close(&self) {
        self.with(|inner| inner.controller.close());
    }

    #[wasm_bindgen(js_name = endTour)]
    pub fn end_tour(&self) {
        self.with(|inner| inner.controller.end_tour());
    }

    #[wasm_bindgen(js_name = beaconClick)]
    pub fn beacon_click(&self) {
        self.with(|inner| inner.controller.beacon_click());
    }

    #[wasm_bindgen(js_name = overlayClick)]
    pub fn overlay_click(&self) {
        self.with(|inner| inner.controller.overlay_click());
    }

    /// Trigger a control by name (`back`, `next`, `skip`, `close`).
    pub fn activate(&self, action: &str) -> bool {
        let Some(action) = ControlAction::parse(action) else {
            return false;
        };
        self.with(|inner| inner.controller.activate(action));
        true
    }

    /// Route a key as if pressed on the page. Returns whether it was consumed.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        self.with(|inner| {
            let focus = focus_target(inner.controller.host().document());
            inner.controller.handle_key(key, focus)
        })
    }

    #[wasm_bindgen(js_name = addStep)]
    pub fn add_step(&self, step: JsValue, index: Option<u32>) -> Result<(), JsValue> {
        let step: Step = serde_json::from_value(from_js(&step)?).map_err(js_error)?;
        self.try_with(|inner| inner.controller.add_step(step, index.map(|i| i as usize)))
    }

    #[wasm_bindgen(js_name = removeStep)]
    pub fn remove_step(&self, id: &str) -> Result<(), JsValue> {
        self.try_with(|inner| inner.controller.remove_step(id))
    }

    #[wasm_bindgen(js_name = updateStep)]
    pub fn update_step(&self, id: &str, update: JsValue) -> Result<(), JsValue> {
        let update: StepUpdate = serde_json::from_value(from_js(&update)?).map_err(js_error)?;
        self.try_with(|inner| inner.controller.update_step(id, update))
    }

    /// Run due timers now. Returns milliseconds until the next deadline.
    pub fn tick(&self) -> Option<f64> {
        self.with(|inner| {
            inner.pump_signals();
            inner.controller.tick();
        });
        let inner = self.inner.try_borrow().ok()?;
        let deadline = inner.controller.next_deadline()?;
        let now = inner.controller.host().clock().now_mono();
        Some(deadline.saturating_sub(now).as_secs_f64() * 1000.0)
    }

    /// JSON description of what is painted, or `undefined` when idle.
    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&self) -> Option<String> {
        let inner = self.inner.try_borrow().ok()?;
        let frame = inner.controller.frame()?;
        serde_json::to_string(&frame).ok()
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|inner| inner.controller.is_active())
    }

    #[wasm_bindgen(js_name = currentStep)]
    pub fn current_step(&self) -> Option<u32> {
        let inner = self.inner.try_borrow().ok()?;
        inner
            .controller
            .is_active()
            .then(|| inner.controller.state().current_step as u32)
    }

    #[wasm_bindgen(js_name = onTourStart)]
    pub fn on_tour_start(&self, f: Option<Function>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.handlers.tour_start = f;
        }
    }

    #[wasm_bindgen(js_name = onStepChange)]
    pub fn on_step_change(&self, f: Option<Function>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.handlers.step_change = f;
        }
    }

    #[wasm_bindgen(js_name = onTourComplete)]
    pub fn on_tour_complete(&self, f: Option<Function>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.handlers.tour_complete = f;
        }
    }

    #[wasm_bindgen(js_name = onTourSkip)]
    pub fn on_tour_skip(&self, f: Option<Function>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.handlers.tour_skip = f;
        }
    }

    #[wasm_bindgen(js_name = onBeaconClick)]
    pub fn on_beacon_click(&self, f: Option<Function>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.handlers.beacon_click = f;
        }
    }
}

impl WaypointTour {
    fn install_listeners(&mut self, document: &web_sys::Document) -> Result<(), JsValue> {
        let target: web_sys::EventTarget = document.clone().into();

        let weak = Rc::downgrade(&self.inner);
        let click = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let Some(inner) = weak.upgrade() else { return };
            let Some(kind) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| classify_click(&el))
            else {
                return;
            };
            run(&inner, |inner| match kind {
                PortalClick::Control(action) => inner.controller.activate(action),
                PortalClick::Beacon => inner.controller.beacon_click(),
                PortalClick::Overlay => inner.controller.overlay_click(),
            });
        });
        self.listen(&target, "click", click)?;

        let weak = Rc::downgrade(&self.inner);
        let doc = document.clone();
        let keydown = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let (Some(inner), Some(key_event)) = (
                weak.upgrade(),
                event.dyn_ref::<web_sys::KeyboardEvent>(),
            ) else {
                return;
            };
            let key = key_event.key();
            let focus = focus_target(&doc);
            if run(&inner, |inner| inner.controller.handle_key(&key, focus)) == Some(true) {
                event.prevent_default();
            }
        });
        self.listen(&target, "keydown", keydown)?;

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let mousemove = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let (Some(inner), Some(mouse)) =
                (weak.upgrade(), event.dyn_ref::<web_sys::MouseEvent>())
            else {
                return;
            };
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.track_pointer(f64::from(mouse.page_x()), f64::from(mouse.page_y()));
            }
        });
        self.listen(&target, "mousemove", mousemove)?;
        Ok(())
    }

    fn listen(
        &mut self,
        target: &web_sys::EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target.clone(), event, closure));
        Ok(())
    }

    fn with<R: Default>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        run(&self.inner, f).unwrap_or_default()
    }

    fn try_with(
        &self,
        f: impl FnOnce(&mut Inner) -> waypoint_core::Result<()>,
    ) -> Result<(), JsValue> {
        match run(&self.inner, f) {
            Some(result) => result.map_err(js_error),
            None => Err(JsValue::from_str("tour is busy")),
        }
    }
}

impl Drop for WaypointTour {
    fn drop(&mut self) {
        for (target, event, closure) in self.listeners.drain(..) {
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            let _ = inner.controller.set_active(false);
            inner.controller.host_mut().set_wake(None);
            inner.driver = None;
            inner.sync();
            inner.events.borrow_mut().clear();
        }
    }
}
