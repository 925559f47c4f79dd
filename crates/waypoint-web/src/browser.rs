#![forbid(unsafe_code)]

//! Browser host backed by `web-sys`.
//!
//! Resize and scroll listeners push into a shared queue and poke an optional
//! wake function; the exported driver drains the queue into the controller
//! outside of any DOM callback.

use core::time::Duration;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use waypoint_backend::{DomSignal, Host, HostClock};
use waypoint_core::config::ScrollBehavior;
use waypoint_core::geometry::{Rect, ScrollOffset, Size};

/// Error raised by a DOM call, carrying the JS exception text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserError(String);

impl BrowserError {
    fn from_js(context: &str, value: &JsValue) -> Self {
        let detail = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self(format!("{context}: {detail}"))
    }
}

impl core::fmt::Display for BrowserError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BrowserError {}

impl From<BrowserError> for JsValue {
    fn from(err: BrowserError) -> Self {
        JsValue::from_str(&err.0)
    }
}

/// `performance.now()`-backed monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct BrowserClock {
    origin: web_time::Instant,
}

impl BrowserClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for BrowserClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub(crate) type SignalQueue = Rc<RefCell<VecDeque<DomSignal>>>;
pub(crate) type Wake = Rc<RefCell<Option<Function>>>;

/// A registered window listener; dropping it removes the listener.
pub struct BrowserListener {
    window: web_sys::Window,
    signal: DomSignal,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for BrowserListener {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback_and_bool(
            self.signal.event_type(),
            self.closure.as_ref().unchecked_ref(),
            self.signal.capture(),
        );
    }
}

pub struct BrowserDom {
    window: web_sys::Window,
    document: web_sys::Document,
    clock: BrowserClock,
    signals: SignalQueue,
    wake: Wake,
}

impl BrowserDom {
    /// Host bound to the global `window`.
    pub fn new() -> Result<Self, BrowserError> {
        let window = web_sys::window().ok_or_else(|| BrowserError("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| BrowserError("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            clock: BrowserClock::new(),
            signals: Rc::new(RefCell::new(VecDeque::new())),
            wake: Rc::new(RefCell::new(None)),
        })
    }

    pub fn window(&self) -> &web_sys::Window {
        &self.window
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    /// Function called after a signal is queued.
    pub fn set_wake(&mut self, wake: Option<Function>) {
        *self.wake.borrow_mut() = wake;
    }

    pub fn drain_signals(&mut self) -> Vec<DomSignal> {
        self.signals.borrow_mut().drain(..).collect()
    }
}

impl Host for BrowserDom {
    type Error = BrowserError;
    type Element = web_sys::Element;
    type Listener = BrowserListener;
    type Clock = BrowserClock;

    fn clock(&self) -> &BrowserClock {
        &self.clock
    }

    fn query(&self, selector: &str) -> Result<Option<web_sys::Element>, BrowserError> {
        self.document
            .query_selector(selector)
            .map_err(|err| BrowserError::from_js("querySelector", &err))
    }

    fn client_rect(&self, element: &web_sys::Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset {
            x: self.window.scroll_x().unwrap_or(0.0),
            y: self.window.scroll_y().unwrap_or(0.0),
        }
    }

    fn viewport_size(&self) -> Size {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), BrowserError> {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }

    fn listen(&mut self, signal: DomSignal) -> Result<BrowserListener, BrowserError> {
        let signals = Rc::clone(&self.signals);
        let wake = Rc::clone(&self.wake);
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            signals.borrow_mut().push_back(signal);
            if let Some(wake) = wake.borrow().as_ref() {
                let _ = wake.call0(&JsValue::NULL);
            }
        });
        self.window
            .add_event_listener_with_callback_and_bool(
                signal.event_type(),
                closure.as_ref().unchecked_ref(),
                signal.capture(),
            )
            .map_err(|err| BrowserError::from_js("addEventListener", &err))?;
        tracing::trace!(signal = signal.event_type(), "Registered window listener");
        Ok(BrowserListener {
            window: self.window.clone(),
            signal,
            closure,
        })
    }
}
