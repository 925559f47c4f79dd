//! Property-based invariant tests for the tour reducer and timers.
//!
//! ## Invariants
//!
//! 1. Index bounds: after any action sequence, `current_step < steps.len()`
//!    whenever steps exist
//! 2. Reset completeness: `EndTour` always yields the default state
//! 3. Start replacement: `StartTour` output depends only on its payload
//! 4. Debounce: a burst of triggers fires exactly once, one window after the
//!    last trigger

use core::time::Duration;

use proptest::prelude::*;
use waypoint_core::config::TourConfig;
use waypoint_core::step::Step;
use waypoint_runtime::{Debouncer, TourAction, TourRunState};

// ── Strategies ────────────────────────────────────────────────────────────

fn steps(n: usize) -> Vec<Step> {
    (0..n)
        .map(|i| Step::new(format!("s{i}"), format!("#s{i}"), "T", "C"))
        .collect()
}

fn arb_action() -> impl Strategy<Value = TourAction> {
    prop_oneof![
        (1usize..6).prop_map(|n| TourAction::StartTour {
            steps: steps(n),
            config: TourConfig::default(),
            tour_id: format!("tour-0-{n}"),
        }),
        Just(TourAction::NextStep),
        Just(TourAction::PreviousStep),
        (0usize..20).prop_map(TourAction::GoToStep),
        Just(TourAction::EndTour),
        any::<bool>().prop_map(TourAction::SetLoading),
        proptest::option::of("[a-z]{1,8}").prop_map(TourAction::SetError),
    ]
}

// ── 1. Index bounds ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn index_stays_in_bounds(actions in prop::collection::vec(arb_action(), 0..40)) {
        let mut state = TourRunState::default();
        for action in actions {
            state.apply(action);
            if state.steps.is_empty() {
                prop_assert_eq!(state.current_step, 0);
            } else {
                prop_assert!(state.current_step < state.steps.len());
            }
        }
    }
}

// ── 2. Reset completeness ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn end_tour_restores_default(actions in prop::collection::vec(arb_action(), 0..30)) {
        let mut state = TourRunState::default();
        for action in actions {
            state.apply(action);
        }
        state.apply(TourAction::EndTour);
        prop_assert_eq!(state, TourRunState::default());
    }
}

// ── 3. Start replacement ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn start_ignores_prior_state(
        prefix in prop::collection::vec(arb_action(), 0..30),
        n in 1usize..6,
    ) {
        let start = TourAction::StartTour {
            steps: steps(n),
            config: TourConfig::default(),
            tour_id: "fixed".into(),
        };
        let mut state = TourRunState::default();
        for action in prefix {
            state.apply(action);
        }
        state.apply(start.clone());
        prop_assert_eq!(state, TourRunState::default().reduce(start));
    }
}

// ── 4. Debounce ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn burst_fires_once_after_last_trigger(gaps in prop::collection::vec(0u64..99, 1..20)) {
        let mut debouncer = Debouncer::default();
        let mut now = Duration::ZERO;
        for gap in gaps {
            now += Duration::from_millis(gap);
            prop_assert!(!debouncer.poll(now));
            debouncer.trigger(now);
        }
        let last = now;
        prop_assert!(!debouncer.poll(last + Duration::from_millis(99)));
        prop_assert!(debouncer.poll(last + Duration::from_millis(100)));
        prop_assert!(!debouncer.poll(last + Duration::from_millis(500)));
    }
}
