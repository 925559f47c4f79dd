#![forbid(unsafe_code)]
#![doc = "Host traits for Waypoint: platform abstraction for element lookup, measurement, scrolling, listeners, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the tour runtime and the page it runs on"]
#![doc = "(a real browser via `waypoint-web`'s wasm host, or the deterministic `HeadlessDom`)."]

use core::time::Duration;

use waypoint_core::config::ScrollBehavior;
use waypoint_core::geometry::{Rect, ScrollOffset, Size, Viewport};

/// Monotonic clock abstraction.
///
/// Browser hosts use `performance.now()`; headless hosts advance a counter by
/// hand. The runtime never reads wall-clock time directly; all timer
/// deadlines are measured against this trait.
pub trait HostClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Page-level events the runtime subscribes to while a step is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomSignal {
    /// `resize` on the window.
    Resize,
    /// `scroll` on the document or any scrolling ancestor (capture phase).
    Scroll,
}

impl DomSignal {
    /// DOM event type name.
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Scroll => "scroll",
        }
    }

    /// Scroll listeners register in the capture phase so scrolling inside a
    /// nested container is observed too.
    pub const fn capture(self) -> bool {
        matches!(self, Self::Scroll)
    }
}

/// The page a tour runs on.
///
/// Listener registrations are RAII: dropping a [`Host::Listener`] must
/// unregister it. The runtime holds listener guards only while a step is
/// displayed and drops them on step change and tour end.
pub trait Host {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Handle to a page element.
    type Element: Clone;

    /// Guard returned by [`Host::listen`]; dropping it unregisters.
    type Listener;

    /// Clock implementation.
    type Clock: HostClock;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Resolve a selector to the first matching element.
    ///
    /// `Ok(None)` means nothing matched. `Err` is reserved for selectors the
    /// host cannot parse.
    fn query(&self, selector: &str) -> Result<Option<Self::Element>, Self::Error>;

    /// Bounding box of `element` in client (viewport) coordinates.
    fn client_rect(&self, element: &Self::Element) -> Rect;

    /// Current page scroll offset.
    fn scroll_offset(&self) -> ScrollOffset;

    /// Inner size of the visible window.
    fn viewport_size(&self) -> Size;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Scroll the page vertically to `top` (document coordinates).
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) -> Result<(), Self::Error>;

    /// Subscribe to `signal`. The host queues the event for the runtime
    /// until the returned guard is dropped.
    fn listen(&mut self, signal: DomSignal) -> Result<Self::Listener, Self::Error>;

    /// The visible window in document space.
    fn viewport(&self) -> Viewport {
        let size = self.viewport_size();
        Viewport::new(size.width, size.height).with_scroll(self.scroll_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;
    use std::cell::Cell;
    use std::rc::Rc;

    // -----------------------------------------------------------------------
    // DomSignal tests
    // -----------------------------------------------------------------------

    #[test]
    fn signal_event_types() {
        assert_eq!(DomSignal::Resize.event_type(), "resize");
        assert_eq!(DomSignal::Scroll.event_type(), "scroll");
    }

    #[test]
    fn only_scroll_uses_capture() {
        assert!(DomSignal::Scroll.capture());
        assert!(!DomSignal::Resize.capture());
    }

    // -----------------------------------------------------------------------
    // Mock implementation for trait testing
    // -----------------------------------------------------------------------

    struct TestClock {
        elapsed: Duration,
    }

    impl HostClock for TestClock {
        fn now_mono(&self) -> Duration {
            self.elapsed
        }
    }

    #[derive(Debug)]
    struct TestError;

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("test error")
        }
    }

    struct TestGuard(Rc<Cell<u32>>);

    impl Drop for TestGuard {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    struct TestHost {
        clock: TestClock,
        scroll: ScrollOffset,
        live: Rc<Cell<u32>>,
    }

    impl Host for TestHost {
        type Error = TestError;
        type Element = u32;
        type Listener = TestGuard;
        type Clock = TestClock;

        fn clock(&self) -> &TestClock {
            &self.clock
        }

        fn query(&self, selector: &str) -> Result<Option<u32>, TestError> {
            match selector {
                "#one" => Ok(Some(1)),
                "[" => Err(TestError),
                _ => Ok(None),
            }
        }

        fn client_rect(&self, _element: &u32) -> Rect {
            Rect::new(0.0, 0.0, 10.0, 10.0)
        }

        fn scroll_offset(&self) -> ScrollOffset {
            self.scroll
        }

        fn viewport_size(&self) -> Size {
            Size::new(800.0, 600.0)
        }

        fn prefers_reduced_motion(&self) -> bool {
            false
        }

        fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) -> Result<(), TestError> {
            self.scroll.y = top;
            Ok(())
        }

        fn listen(&mut self, _signal: DomSignal) -> Result<TestGuard, TestError> {
            self.live.set(self.live.get() + 1);
            Ok(TestGuard(Rc::clone(&self.live)))
        }
    }

    fn host() -> TestHost {
        TestHost {
            clock: TestClock {
                elapsed: Duration::from_millis(5),
            },
            scroll: ScrollOffset::default(),
            live: Rc::new(Cell::new(0)),
        }
    }

    #[test]
    fn default_viewport_combines_size_and_scroll() {
        let mut h = host();
        h.scroll_to(120.0, ScrollBehavior::Auto).unwrap();
        let vp = h.viewport();
        assert_eq!(vp.width, 800.0);
        assert_eq!(vp.scroll_y, 120.0);
    }

    #[test]
    fn listener_guard_releases_on_drop() {
        let mut h = host();
        let live = Rc::clone(&h.live);
        let a = h.listen(DomSignal::Resize).unwrap();
        let b = h.listen(DomSignal::Scroll).unwrap();
        assert_eq!(live.get(), 2);
        drop(a);
        assert_eq!(live.get(), 1);
        drop(b);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn query_distinguishes_missing_from_invalid() {
        let h = host();
        assert_eq!(h.query("#one").unwrap(), Some(1));
        assert_eq!(h.query("#two").unwrap(), None);
        assert!(h.query("[").is_err());
        assert_eq!(h.clock().now_mono(), Duration::from_millis(5));
    }
}
