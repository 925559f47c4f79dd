//! End-to-end tour lifecycle tests against the deterministic headless host.
//!
//! Every scenario drives a real `TourController<HeadlessDom>`: steps resolve
//! against registered elements, time moves only through `advance`, and
//! listener bookkeeping is checked through the host's counters.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;
use waypoint_backend::{Host, HostClock};
use waypoint_core::config::{ConfigOverride, ScrollBehavior};
use waypoint_core::error::TourError;
use waypoint_core::geometry::Rect;
use waypoint_core::keys::FocusTarget;
use waypoint_core::placement::Transform;
use waypoint_core::step::{Side, Step, StepUpdate};
use waypoint_runtime::{TourCallbacks, TourController, TourRunState};
use waypoint_web::{HeadlessDom, ScrollRecord, advance, pump};
use waypoint_widgets::{ControlAction, StepPhase};

// ============================================================================
// Fixtures
// ============================================================================

type Log = Rc<RefCell<Vec<String>>>;

fn recording(log: &Log) -> TourCallbacks {
    let (a, b, c, d, e) = (
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
    );
    TourCallbacks::new()
        .on_tour_start(move |s| a.borrow_mut().push(format!("start:{}", s.id)))
        .on_step_change(move |s, i| b.borrow_mut().push(format!("change:{}@{i}", s.id)))
        .on_tour_complete(move || c.borrow_mut().push("complete".into()))
        .on_tour_skip(move |s| d.borrow_mut().push(format!("skip:{}", s.id)))
        .on_beacon_click(move |s| e.borrow_mut().push(format!("beacon:{}", s.id)))
}

fn page() -> HeadlessDom {
    HeadlessDom::new(1024.0, 768.0)
        .with_element("#a", Rect::new(100.0, 100.0, 200.0, 40.0))
        .with_element("#b", Rect::new(400.0, 300.0, 120.0, 30.0))
        .with_element("#c", Rect::new(600.0, 500.0, 80.0, 30.0))
}

fn step(id: &str) -> Step {
    Step::new(id, format!("#{id}"), id.to_uppercase(), "body").show_beacon(false)
}

fn steps(ids: &[&str]) -> Vec<Step> {
    ids.iter().map(|id| step(id)).collect()
}

fn tour(dom: HeadlessDom) -> (TourController<HeadlessDom>, Log) {
    let log = Log::default();
    let controller = TourController::new(dom).callbacks(recording(&log));
    (controller, log)
}

fn started(ids: &[&str]) -> (TourController<HeadlessDom>, Log) {
    let (mut t, log) = tour(page());
    t.start(steps(ids), &ConfigOverride::default()).unwrap();
    (t, log)
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn start_announces_tour_then_first_step() {
    let (t, log) = started(&["a", "b"]);
    assert!(t.is_active());
    assert_eq!(t.state().current_step, 0);
    assert_eq!(entries(&log), ["start:a", "change:a@0"]);
    assert!(t.state().tour_id.as_deref().is_some_and(|id| id.starts_with("tour-0-")));
}

#[test]
fn first_step_resolves_and_places_tooltip() {
    let (t, _) = started(&["a", "b"]);
    let placement = t.placement().unwrap();
    assert_eq!(placement.placement, Side::Bottom);
    assert_eq!(placement.top, 152.0);
    assert_eq!(placement.left, 200.0);
    assert_eq!(placement.transform, Transform::CenterX);

    let frame = t.frame().unwrap();
    let tooltip = frame.tooltip.unwrap();
    assert_eq!(tooltip.aria.label, "Step 1 of 2: A");
    assert_eq!(tooltip.controls.primary.label, "Next");
    assert!(tooltip.controls.back.is_none());
}

#[test]
fn invalid_steps_record_error_and_do_not_start() {
    let (mut t, log) = tour(page());
    let err = t
        .start(vec![step("a"), step("a")], &ConfigOverride::default())
        .unwrap_err();
    assert!(matches!(err, TourError::InvalidSteps { .. }));
    assert!(!t.is_active());
    assert!(!t.state().is_loading);
    assert_eq!(
        t.state().error.as_deref(),
        Some("Step 1: duplicate id 'a'")
    );
    assert!(entries(&log).is_empty());
    assert!(t.frame().is_none());
}

#[test]
fn start_json_rejects_non_list_payload() {
    let (mut t, _) = tour(page());
    let err = t.start_json(&json!({"id": "a"}), None).unwrap_err();
    assert!(matches!(err, TourError::InvalidSteps { .. }));
    assert!(t.state().error.is_some());
    assert!(!t.is_active());
}

#[test]
fn start_json_ignores_malformed_config_keys() {
    let (mut t, _) = tour(page());
    let steps = json!([{"id": "a", "target": "#a", "title": "A", "content": "body"}]);
    let config = json!({"spacing": "wide", "theme": 3, "showProgress": false});
    t.start_json(&steps, Some(&config)).unwrap();
    assert!(t.is_active());
    assert_eq!(t.state().config.spacing, 12.0);
    assert!(!t.state().config.show_progress);
}

#[test]
#[tracing_test::traced_test]
fn start_json_starts_with_defaults_when_config_is_not_an_object() {
    let (mut t, log) = tour(page());
    let steps = json!([{"id": "a", "target": "#a", "title": "A", "content": "body"}]);
    t.start_json(&steps, Some(&json!("dark"))).unwrap();

    assert!(t.is_active());
    assert_eq!(t.state().error, None);
    assert_eq!(t.state().config, *t.defaults());
    assert_eq!(entries(&log), ["start:a", "change:a@0"]);
    assert!(logs_contain("Configuration must be an object"));
}

#[test]
#[tracing_test::traced_test]
fn config_problems_are_reported_once() {
    let (mut t, _) = tour(page());
    let steps = json!([{"id": "a", "target": "#a", "title": "A", "content": "body"}]);
    let config = json!({"responsive": {"huge": {"maxWidth": 200}}});
    t.start_json(&steps, Some(&config)).unwrap();

    assert!(t.is_active());
    logs_assert(|lines: &[&str]| {
        match lines.iter().filter(|line| line.contains("responsive.huge")).count() {
            1 => Ok(()),
            n => Err(format!("expected one warning, saw {n}")),
        }
    });
}

#[test]
fn restarting_replaces_running_tour() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    t.start(steps(&["c"]), &ConfigOverride::default()).unwrap();
    assert_eq!(t.state().current_step, 0);
    assert_eq!(t.current_step().map(|s| s.id.as_str()), Some("c"));
    assert_eq!(t.host().listener_stats().live(), 2);
    assert_eq!(entries(&log).last().map(String::as_str), Some("change:c@0"));
}

// ============================================================================
// Navigation and ending
// ============================================================================

#[test]
fn next_and_back_announce_each_step() {
    let (mut t, log) = started(&["a", "b", "c"]);
    t.next_step();
    t.next_step();
    t.previous_step();
    t.previous_step();
    t.previous_step();
    assert_eq!(
        entries(&log),
        ["start:a", "change:a@0", "change:b@1", "change:c@2", "change:b@1", "change:a@0"]
    );
}

#[test]
fn go_to_step_clamps_to_last() {
    let (mut t, log) = started(&["a", "b", "c"]);
    t.go_to_step(40);
    assert_eq!(t.state().current_step, 2);
    assert_eq!(entries(&log).last().map(String::as_str), Some("change:c@2"));
}

#[test]
fn last_step_completes_once_after_delay() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    assert_eq!(t.next_deadline(), Some(ms(1000)));

    assert!(!advance(&mut t, ms(999)));
    assert!(t.is_active());

    assert!(advance(&mut t, ms(1)));
    assert!(!t.is_active());
    assert!(!advance(&mut t, ms(5000)));
    let completions = entries(&log).iter().filter(|e| *e == "complete").count();
    assert_eq!(completions, 1);
}

#[test]
fn leaving_last_step_cancels_completion() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    advance(&mut t, ms(500));
    t.previous_step();
    advance(&mut t, ms(2000));
    assert!(t.is_active());
    assert!(!entries(&log).contains(&"complete".to_owned()));
    assert_eq!(t.next_deadline(), None);
}

#[test]
fn last_step_beacon_holds_completion_until_opened() {
    let (mut t, log) = tour(page());
    let beaconed = vec![
        Step::new("a", "#a", "A", "body"),
        Step::new("b", "#b", "B", "body"),
    ];
    t.start(beaconed, &ConfigOverride::default()).unwrap();
    t.beacon_click();
    t.next_step();

    assert_eq!(t.phase(), StepPhase::Beacon);
    assert_eq!(t.next_deadline(), None);
    assert!(!advance(&mut t, ms(5000)));
    assert!(t.is_active());
    assert!(!entries(&log).contains(&"complete".to_owned()));

    t.beacon_click();
    assert!(t.frame().unwrap().tooltip.is_some());
    let opened = t.host().clock().now_mono();
    assert_eq!(t.next_deadline(), Some(opened + ms(1000)));
    assert!(advance(&mut t, ms(1000)));
    assert!(!t.is_active());
    assert_eq!(entries(&log).last().map(String::as_str), Some("complete"));
}

#[test]
fn next_on_last_step_completes_immediately() {
    let (mut t, log) = started(&["a"]);
    t.next_step();
    assert!(!t.is_active());
    assert_eq!(entries(&log), ["start:a", "change:a@0", "complete"]);
}

#[test]
fn skip_reports_current_step() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    t.skip();
    assert!(!t.is_active());
    assert_eq!(entries(&log).last().map(String::as_str), Some("skip:b"));
}

#[test]
fn close_fires_neither_skip_nor_complete() {
    let (mut t, log) = started(&["a", "b"]);
    t.close();
    assert!(!t.is_active());
    assert_eq!(entries(&log), ["start:a", "change:a@0"]);
}

#[test]
fn end_restores_default_state() {
    let (mut t, _) = started(&["a", "b"]);
    t.next_step();
    t.end_tour();
    assert_eq!(t.state(), &TourRunState::default());
    assert!(t.frame().is_none());
    assert_eq!(t.phase(), StepPhase::Tooltip);
}

#[test]
fn nothing_fires_after_end() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    t.close();
    let before = entries(&log);

    t.host_mut().resize(640.0, 480.0);
    t.host_mut().scroll_page(300.0);
    assert!(!advance(&mut t, ms(5000)));
    t.next_step();
    t.skip();
    assert_eq!(entries(&log), before);
    assert!(t.host_mut().drain_signals().is_empty());
}

#[test]
fn controls_route_to_navigation() {
    let (mut t, log) = started(&["a", "b"]);
    t.activate(ControlAction::Next);
    assert_eq!(t.state().current_step, 1);
    t.activate(ControlAction::Back);
    assert_eq!(t.state().current_step, 0);
    t.activate(ControlAction::Skip);
    assert_eq!(entries(&log).last().map(String::as_str), Some("skip:a"));
}

// ============================================================================
// Listener lifecycle
// ============================================================================

#[test]
fn listeners_are_released_on_every_transition() {
    let (mut t, _) = started(&["a", "b", "c"]);
    assert_eq!(t.listener_count(), 2);
    t.next_step();
    t.next_step();
    t.previous_step();
    assert_eq!(t.host().listener_stats().live(), 2);
    t.close();

    let stats = t.host().listener_stats();
    assert_eq!(stats.attached, 8);
    assert_eq!(stats.attached, stats.released);
    assert_eq!(t.listener_count(), 0);
}

#[test]
fn completion_releases_listeners() {
    let (mut t, _) = started(&["a"]);
    advance(&mut t, ms(1000));
    assert!(!t.is_active());
    assert_eq!(t.host().listener_stats().live(), 0);
}

// ============================================================================
// Keyboard and pointer
// ============================================================================

#[test]
fn arrows_navigate_and_escape_closes() {
    let (mut t, _) = started(&["a", "b"]);
    assert!(t.handle_key("ArrowRight", FocusTarget::Elsewhere));
    assert_eq!(t.state().current_step, 1);
    assert!(t.handle_key("ArrowUp", FocusTarget::Elsewhere));
    assert_eq!(t.state().current_step, 0);
    assert!(!t.handle_key("a", FocusTarget::Elsewhere));
    assert!(t.handle_key("Escape", FocusTarget::Elsewhere));
    assert!(!t.is_active());
}

#[test]
fn enter_on_focused_control_is_left_to_the_button() {
    let (mut t, _) = started(&["a", "b"]);
    assert!(!t.handle_key("Enter", FocusTarget::TourControl));
    assert!(!t.handle_key(" ", FocusTarget::TourControl));
    assert_eq!(t.state().current_step, 0);
    assert!(t.handle_key("Enter", FocusTarget::Elsewhere));
    assert_eq!(t.state().current_step, 1);
}

#[test]
fn keyboard_navigation_can_be_disabled() {
    let (mut t, _) = tour(page());
    let overrides = ConfigOverride {
        keyboard_navigation: Some(false),
        ..ConfigOverride::default()
    };
    t.start(steps(&["a", "b"]), &overrides).unwrap();
    assert!(!t.handle_key("ArrowRight", FocusTarget::Elsewhere));
    assert!(!t.handle_key("Escape", FocusTarget::Elsewhere));
    assert!(t.is_active());
    assert_eq!(t.state().current_step, 0);
}

#[test]
fn overlay_click_closes_only_when_configured() {
    let (mut t, _) = started(&["a"]);
    t.overlay_click();
    assert!(t.is_active());

    let (mut t, log) = tour(page());
    let overrides = ConfigOverride {
        close_on_overlay_click: Some(true),
        ..ConfigOverride::default()
    };
    t.start(steps(&["a"]), &overrides).unwrap();
    assert!(t.frame().unwrap().overlay.closes_on_click);
    t.overlay_click();
    assert!(!t.is_active());
    assert!(!entries(&log).contains(&"complete".to_owned()));
}

#[test]
fn beacon_gates_tooltip_until_clicked() {
    let (mut t, log) = tour(page());
    t.start(vec![Step::new("a", "#a", "A", "body")], &ConfigOverride::default())
        .unwrap();
    assert_eq!(t.phase(), StepPhase::Beacon);
    let frame = t.frame().unwrap();
    assert!(frame.tooltip.is_none());
    assert_eq!(frame.beacon.unwrap().label, "Open tour step: A");

    t.beacon_click();
    assert_eq!(t.phase(), StepPhase::Tooltip);
    assert!(t.frame().unwrap().tooltip.is_some());
    t.beacon_click();
    let beacons = entries(&log).iter().filter(|e| e.starts_with("beacon:")).count();
    assert_eq!(beacons, 1);
}

// ============================================================================
// Missing targets and scrolling
// ============================================================================

#[test]
#[tracing_test::traced_test]
fn missing_target_shows_bare_overlay_and_retries() {
    let (mut t, log) = tour(page());
    let late = Step::new("late", "#late", "Late", "body").show_beacon(false);
    t.start(vec![late], &ConfigOverride::default()).unwrap();

    assert!(logs_contain("Tour target not found"));
    assert_eq!(entries(&log), ["start:late", "change:late@0"]);
    let frame = t.frame().unwrap();
    assert!(!frame.has_target());
    assert!(frame.tooltip.is_none());
    assert_eq!(t.listener_count(), 0);

    t.host_mut().insert("#late", Rect::new(50.0, 50.0, 100.0, 20.0));
    assert!(!advance(&mut t, ms(249)));
    assert!(advance(&mut t, ms(1)));
    assert!(t.frame().unwrap().tooltip.is_some());
    assert_eq!(t.listener_count(), 2);
}

#[test]
fn missing_target_keeps_retrying_until_it_appears() {
    let (mut t, _) = tour(page());
    t.start(vec![step("zz"), step("a")], &ConfigOverride::default())
        .unwrap();
    for _ in 0..4 {
        assert!(!advance(&mut t, ms(250)));
        assert_eq!(t.next_deadline(), Some(t.host().clock().now_mono() + ms(250)));
    }
    t.next_step();
    assert!(t.frame().unwrap().has_target());
}

#[test]
fn clipped_target_is_scrolled_into_view() {
    let dom = page().with_element("#far", Rect::new(100.0, 2000.0, 100.0, 40.0));
    let (mut t, _) = tour(dom);
    t.start(vec![step("far")], &ConfigOverride::default()).unwrap();
    assert_eq!(
        t.host().scroll_log(),
        [ScrollRecord {
            top: 1980.0,
            behavior: ScrollBehavior::Smooth
        }]
    );
    let geometry = t.target_geometry().unwrap();
    assert_eq!(geometry.top, 2000.0);
}

#[test]
fn smooth_scroll_places_against_destination() {
    let mut dom = page().with_element("#far", Rect::new(100.0, 1900.0, 200.0, 40.0));
    dom.set_animated_scroll(true);
    let (mut t, _) = tour(dom);
    t.start(vec![step("far")], &ConfigOverride::default()).unwrap();

    // Still animating: the live offset has not moved yet.
    assert_eq!(t.host().scroll_offset().y, 0.0);
    let placement = t.placement().unwrap();
    assert_eq!(placement.placement, Side::Bottom);
    assert_eq!(placement.top, 1952.0);
    assert_eq!(placement.left, 200.0);
    assert_eq!(placement.transform, Transform::CenterX);

    assert!(t.host_mut().finish_scroll());
    pump(&mut t);
    assert!(advance(&mut t, ms(100)));
    assert_eq!(t.placement(), Some(placement));
    assert_eq!(t.target_geometry().unwrap().top, 1900.0);
}

#[test]
fn visible_target_is_not_scrolled() {
    let (t, _) = started(&["a"]);
    assert!(t.host().scroll_log().is_empty());
}

#[test]
fn reduced_motion_scrolls_instantly() {
    let mut dom = page().with_element("#far", Rect::new(100.0, 2000.0, 100.0, 40.0));
    dom.set_reduced_motion(true);
    let (mut t, _) = tour(dom);
    t.start(vec![step("far")], &ConfigOverride::default()).unwrap();
    assert_eq!(t.host().scroll_log()[0].behavior, ScrollBehavior::Auto);
}

#[test]
fn resize_recomputes_after_debounce() {
    let (mut t, _) = started(&["a", "b"]);
    t.host_mut().move_element("#a", Rect::new(300.0, 200.0, 200.0, 40.0));
    t.host_mut().resize(1000.0, 700.0);

    assert!(!pump(&mut t));
    assert_eq!(t.target_geometry().unwrap().top, 100.0);
    assert!(!advance(&mut t, ms(99)));
    assert!(advance(&mut t, ms(1)));
    assert_eq!(t.target_geometry().unwrap().top, 200.0);
    assert_eq!(t.placement().unwrap().top, 252.0);
}

#[test]
fn scroll_burst_recomputes_once() {
    let (mut t, _) = started(&["a", "b"]);
    for y in [10.0, 20.0, 30.0] {
        t.host_mut().scroll_page(y);
        pump(&mut t);
        advance(&mut t, ms(40));
    }
    assert!(!advance(&mut t, ms(59)));
    assert!(advance(&mut t, ms(1)));
    assert!(!advance(&mut t, ms(500)));
}

#[test]
fn mobile_viewport_uses_responsive_width() {
    let dom = HeadlessDom::new(375.0, 667.0).with_element("#a", Rect::new(20.0, 100.0, 100.0, 40.0));
    let (mut t, _) = tour(dom);
    let overrides = ConfigOverride::from_json(&json!({
        "responsive": {"mobile": {"maxWidth": 240}}
    }))
    .unwrap();
    t.start(steps(&["a"]), &overrides).unwrap();
    assert_eq!(t.frame().unwrap().tooltip.unwrap().max_width, 240.0);
}

// ============================================================================
// Dynamic edits
// ============================================================================

#[test]
fn add_step_restarts_at_first_step() {
    let (mut t, log) = started(&["a", "b"]);
    t.next_step();
    let tour_id = t.state().tour_id.clone();
    t.add_step(step("c"), Some(1)).unwrap();

    let ids: Vec<_> = t.state().steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "c", "b"]);
    assert_eq!(t.state().current_step, 0);
    assert_eq!(t.state().tour_id, tour_id);
    assert_eq!(entries(&log).last().map(String::as_str), Some("change:a@0"));
}

#[test]
fn add_step_without_index_appends() {
    let (mut t, _) = started(&["a"]);
    t.add_step(step("b"), None).unwrap();
    t.add_step(step("c"), Some(99)).unwrap();
    let ids: Vec<_> = t.state().steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn remove_and_update_steps() {
    let (mut t, _) = started(&["a", "b", "c"]);
    t.remove_step("b").unwrap();
    assert_eq!(t.state().total(), 2);

    t.update_step(
        "c",
        StepUpdate {
            title: Some("Renamed".into()),
            ..StepUpdate::default()
        },
    )
    .unwrap();
    assert_eq!(t.state().steps[1].title, "Renamed");
    assert_eq!(t.state().current_step, 0);
}

#[test]
fn edit_errors_leave_tour_untouched() {
    let (mut t, _) = started(&["a", "b"]);
    t.next_step();
    assert_eq!(
        t.remove_step("nope"),
        Err(TourError::step_not_found("nope"))
    );
    assert!(matches!(
        t.add_step(step("a"), None),
        Err(TourError::InvalidSteps { .. })
    ));
    assert_eq!(t.state().current_step, 1);
    assert_eq!(t.state().total(), 2);
}

#[test]
fn removing_every_step_is_rejected() {
    let (mut t, _) = started(&["a"]);
    assert!(matches!(
        t.remove_step("a"),
        Err(TourError::InvalidSteps { .. })
    ));
    assert!(t.is_active());
}

#[test]
fn edits_require_a_running_tour() {
    let (mut t, _) = tour(page());
    assert_eq!(t.add_step(step("a"), None), Err(TourError::NotRunning));
    assert_eq!(t.remove_step("a"), Err(TourError::NotRunning));
    assert_eq!(
        t.update_step("a", StepUpdate::default()),
        Err(TourError::NotRunning)
    );
}

// ============================================================================
// External active flag
// ============================================================================

#[test]
fn set_active_requires_loaded_definition() {
    let (mut t, _) = tour(page());
    assert_eq!(t.set_active(true), Err(TourError::NotLoaded));
    assert_eq!(t.set_active(false), Ok(()));
}

#[test]
fn set_active_starts_and_stops_loaded_tour() {
    let (mut t, log) = tour(page());
    t.load(steps(&["a", "b"]), ConfigOverride::default());
    t.set_active(true).unwrap();
    assert!(t.is_active());
    t.set_active(true).unwrap();
    assert_eq!(entries(&log).iter().filter(|e| e.starts_with("start:")).count(), 1);

    t.set_active(false).unwrap();
    assert!(!t.is_active());
    assert_eq!(entries(&log), ["start:a", "change:a@0"]);
    assert_eq!(t.host().listener_stats().live(), 0);
}

// ============================================================================
// Frame wire shape
// ============================================================================

#[test]
fn frame_serializes_in_camel_case() {
    let (t, _) = started(&["a", "b"]);
    let frame = serde_json::to_value(t.frame().unwrap()).unwrap();
    assert_eq!(frame["zIndex"], json!(10_000));
    assert_eq!(frame["stepId"], json!("a"));
    assert_eq!(frame["phase"], json!("tooltip"));
    assert_eq!(frame["tooltip"]["transform"], json!("translateX(-50%)"));
    assert_eq!(frame["tooltip"]["aria"]["aria-modal"], json!("true"));
    assert_eq!(frame["tooltip"]["progress"], json!({"type": "dots", "total": 2, "current": 0}));
}
