#![forbid(unsafe_code)]

//! Live geometry of the current step's target.
//!
//! The tracker measures on attach and, while change tracking is enabled,
//! again after resize or scroll activity settles for the debounce window.
//! Listener guards are owned here: [`PositionTracker::detach`] drops every
//! guard, and the host unregisters each listener in its guard's `Drop`.

use core::time::Duration;

use waypoint_backend::{DomSignal, Host};
use waypoint_core::geometry::ElementGeometry;

use crate::timer::{DEFAULT_DEBOUNCE, Debouncer};

pub struct PositionTracker<H: Host> {
    element: Option<H::Element>,
    geometry: Option<ElementGeometry>,
    listeners: Vec<H::Listener>,
    debounce: Debouncer,
    track_changes: bool,
}

impl<H: Host> Default for PositionTracker<H> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<H: Host> PositionTracker<H> {
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            element: None,
            geometry: None,
            listeners: Vec::new(),
            debounce: Debouncer::new(debounce_window),
            track_changes: true,
        }
    }

    /// Enable or disable resize/scroll tracking for later attaches.
    #[must_use]
    pub fn track_changes(mut self, enabled: bool) -> Self {
        self.track_changes = enabled;
        self
    }

    /// Start tracking `element`, releasing anything tracked before.
    ///
    /// `None` is valid and yields `None` geometry.
    pub fn attach(&mut self, host: &mut H, element: Option<H::Element>) -> Option<ElementGeometry> {
        self.detach();
        let element = element?;

        if self.track_changes {
            for signal in [DomSignal::Resize, DomSignal::Scroll] {
                match host.listen(signal) {
                    Ok(guard) => self.listeners.push(guard),
                    Err(err) => tracing::warn!(
                        signal = signal.event_type(),
                        error = %err,
                        "Failed to register tracker listener"
                    ),
                }
            }
            tracing::debug!(listeners = self.listeners.len(), "Tracker attached");
        }

        self.element = Some(element);
        self.recompute(host)
    }

    /// Stop tracking and release every listener.
    pub fn detach(&mut self) {
        if !self.listeners.is_empty() {
            tracing::debug!(listeners = self.listeners.len(), "Tracker released listeners");
        }
        self.listeners.clear();
        self.debounce.cancel();
        self.element = None;
        self.geometry = None;
    }

    /// Record resize/scroll activity at `now`.
    pub fn notify(&mut self, signal: DomSignal, now: Duration) {
        if self.element.is_some() && !self.listeners.is_empty() {
            tracing::trace!(signal = signal.event_type(), "Tracker signal");
            self.debounce.trigger(now);
        }
    }

    /// Recompute if the debounce window elapsed. Returns `true` when the
    /// geometry was refreshed.
    pub fn poll(&mut self, host: &H, now: Duration) -> bool {
        if self.debounce.poll(now) {
            let geometry = self.recompute(host);
            tracing::debug!(found = geometry.is_some(), "Tracker recomputed geometry");
            true
        } else {
            false
        }
    }

    /// Measure the tracked element now.
    pub fn recompute(&mut self, host: &H) -> Option<ElementGeometry> {
        self.geometry = self.element.as_ref().map(|element| {
            ElementGeometry::from_client_rect(host.client_rect(element), host.scroll_offset())
        });
        self.geometry
    }

    pub fn geometry(&self) -> Option<ElementGeometry> {
        self.geometry
    }

    pub fn element(&self) -> Option<&H::Element> {
        self.element.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.element.is_some()
    }

    /// Live listener registrations held by this tracker.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.debounce.deadline()
    }
}
