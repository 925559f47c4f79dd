#![forbid(unsafe_code)]

//! Deterministic in-memory host.
//!
//! `HeadlessDom` stands in for a browser page: elements are registered by
//! selector with a document-space rect, time only moves when the caller
//! advances the clock, and listener registrations are counted so tests can
//! verify that every acquisition is released.
//!
//! Events the page would fire (resize, scroll) are queued only while a
//! matching listener is registered; the driver drains them into the
//! controller with [`pump`].

use core::time::Duration;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use waypoint_backend::{DomSignal, Host, HostClock};
use waypoint_core::config::ScrollBehavior;
use waypoint_core::geometry::{Rect, ScrollOffset, Size};
use waypoint_runtime::TourController;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessError {
    /// The selector is empty or otherwise unusable.
    InvalidSelector(String),
}

impl core::fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSelector(selector) => write!(f, "invalid selector: {selector:?}"),
        }
    }
}

impl std::error::Error for HeadlessError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Handle to a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Listener bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub attached: u32,
    pub released: u32,
}

impl ListenerStats {
    /// Registrations not yet released.
    pub fn live(&self) -> u32 {
        self.attached - self.released
    }
}

#[derive(Debug, Default)]
struct ListenerRegistry {
    stats: ListenerStats,
    live: BTreeMap<&'static str, u32>,
}

impl ListenerRegistry {
    fn is_listening(&self, signal: DomSignal) -> bool {
        self.live
            .get(signal.event_type())
            .is_some_and(|count| *count > 0)
    }
}

/// Registration guard; dropping it unregisters the listener.
#[derive(Debug)]
pub struct ListenerGuard {
    signal: DomSignal,
    registry: Rc<RefCell<ListenerRegistry>>,
}

impl ListenerGuard {
    pub fn signal(&self) -> DomSignal {
        self.signal
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut registry = self.registry.borrow_mut();
        registry.stats.released += 1;
        if let Some(count) = registry.live.get_mut(self.signal.event_type()) {
            *count = count.saturating_sub(1);
        }
    }
}

/// A programmatic scroll issued by the runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRecord {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug)]
pub struct HeadlessDom {
    clock: DeterministicClock,
    viewport: Size,
    scroll: ScrollOffset,
    reduced_motion: bool,
    selectors: BTreeMap<String, NodeId>,
    nodes: BTreeMap<NodeId, Rect>,
    next_id: u32,
    registry: Rc<RefCell<ListenerRegistry>>,
    scroll_log: Vec<ScrollRecord>,
    /// Smooth scrolls wait for [`HeadlessDom::finish_scroll`] when set.
    animate_smooth: bool,
    scroll_target: Option<f64>,
    pending: VecDeque<DomSignal>,
}

impl HeadlessDom {
    /// Create a page with a `width` x `height` viewport scrolled to the top.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            clock: DeterministicClock::new(),
            viewport: Size::new(width, height),
            scroll: ScrollOffset::default(),
            reduced_motion: false,
            selectors: BTreeMap::new(),
            nodes: BTreeMap::new(),
            next_id: 1,
            registry: Rc::new(RefCell::new(ListenerRegistry::default())),
            scroll_log: Vec::new(),
            animate_smooth: false,
            scroll_target: None,
            pending: VecDeque::new(),
        }
    }

    /// Register an element matched by `selector` at a document-space rect.
    pub fn insert(&mut self, selector: impl Into<String>, rect: Rect) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.selectors.insert(selector.into(), id);
        self.nodes.insert(id, rect);
        id
    }

    /// Builder form of [`HeadlessDom::insert`].
    #[must_use]
    pub fn with_element(mut self, selector: impl Into<String>, rect: Rect) -> Self {
        self.insert(selector, rect);
        self
    }

    /// Move an element. Layout shifts fire no event by themselves.
    pub fn move_element(&mut self, selector: &str, rect: Rect) {
        if let Some(node) = self.selectors.get(selector).and_then(|id| self.nodes.get_mut(id)) {
            *node = rect;
        }
    }

    pub fn remove(&mut self, selector: &str) {
        if let Some(id) = self.selectors.remove(selector) {
            self.nodes.remove(&id);
        }
    }

    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Resize the viewport, firing `resize` if anyone listens.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
        self.fire(DomSignal::Resize);
    }

    /// Scroll as a user would, firing `scroll` if anyone listens.
    pub fn scroll_page(&mut self, y: f64) {
        self.scroll.y = y.max(0.0);
        self.fire(DomSignal::Scroll);
    }

    /// Leave smooth scrolls in flight until [`HeadlessDom::finish_scroll`],
    /// the way a browser animates them.
    pub fn set_animated_scroll(&mut self, animated: bool) {
        self.animate_smooth = animated;
    }

    /// Land an in-flight smooth scroll. Returns `false` if none was pending.
    pub fn finish_scroll(&mut self) -> bool {
        let Some(top) = self.scroll_target.take() else {
            return false;
        };
        self.scroll_page(top);
        true
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Take every queued event in arrival order.
    pub fn drain_signals(&mut self) -> Vec<DomSignal> {
        self.pending.drain(..).collect()
    }

    pub fn listener_stats(&self) -> ListenerStats {
        self.registry.borrow().stats
    }

    pub fn scroll_log(&self) -> &[ScrollRecord] {
        &self.scroll_log
    }

    fn fire(&mut self, signal: DomSignal) {
        if self.registry.borrow().is_listening(signal) {
            self.pending.push_back(signal);
        }
    }
}

impl Host for HeadlessDom {
    type Error = HeadlessError;
    type Element = NodeId;
    type Listener = ListenerGuard;
    type Clock = DeterministicClock;

    fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    fn query(&self, selector: &str) -> Result<Option<NodeId>, HeadlessError> {
        if selector.trim().is_empty() {
            return Err(HeadlessError::InvalidSelector(selector.to_owned()));
        }
        Ok(self.selectors.get(selector).copied())
    }

    fn client_rect(&self, element: &NodeId) -> Rect {
        self.nodes
            .get(element)
            .map(|rect| rect.translate(-self.scroll.x, -self.scroll.y))
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), HeadlessError> {
        let top = top.max(0.0);
        self.scroll_log.push(ScrollRecord { top, behavior });
        if self.animate_smooth && behavior == ScrollBehavior::Smooth {
            self.scroll_target = Some(top);
            return Ok(());
        }
        self.scroll_target = None;
        self.scroll.y = top;
        self.fire(DomSignal::Scroll);
        Ok(())
    }

    fn listen(&mut self, signal: DomSignal) -> Result<ListenerGuard, HeadlessError> {
        {
            let mut registry = self.registry.borrow_mut();
            registry.stats.attached += 1;
            *registry.live.entry(signal.event_type()).or_default() += 1;
        }
        Ok(ListenerGuard {
            signal,
            registry: Rc::clone(&self.registry),
        })
    }
}

/// Feed queued page events into `tour` and run due timers. Returns `true`
/// when the frame changed.
pub fn pump(tour: &mut TourController<HeadlessDom>) -> bool {
    for signal in tour.host_mut().drain_signals() {
        tour.handle_signal(signal);
    }
    tour.tick()
}

/// Advance the page clock by `dt` and [`pump`].
pub fn advance(tour: &mut TourController<HeadlessDom>, dt: Duration) -> bool {
    tour.host_mut().advance(dt);
    pump(tour)
}
