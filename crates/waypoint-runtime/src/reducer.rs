#![forbid(unsafe_code)]

//! Tour run state and its reducer.
//!
//! The reducer is a pure synchronous transition function. It knows nothing
//! about the page, timers, or validation; the controller layers those on top.
//!
//! # Invariants
//!
//! 1. `current_step < steps.len()` whenever `steps` is non-empty.
//! 2. `EndTour` restores exactly `TourRunState::default()`.
//! 3. `StartTour` replaces every field; nothing from a prior tour survives.

use waypoint_core::config::TourConfig;
use waypoint_core::step::Step;

/// Everything the engine knows about the running tour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourRunState {
    pub is_active: bool,
    pub current_step: usize,
    pub steps: Vec<Step>,
    pub config: TourConfig,
    pub is_loading: bool,
    pub error: Option<String>,
    pub tour_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TourAction {
    StartTour {
        steps: Vec<Step>,
        config: TourConfig,
        tour_id: String,
    },
    NextStep,
    PreviousStep,
    GoToStep(usize),
    EndTour,
    SetLoading(bool),
    SetError(Option<String>),
}

impl TourRunState {
    /// Apply one action in place.
    pub fn apply(&mut self, action: TourAction) {
        match action {
            TourAction::StartTour {
                steps,
                config,
                tour_id,
            } => {
                *self = Self {
                    is_active: true,
                    current_step: 0,
                    steps,
                    config,
                    is_loading: false,
                    error: None,
                    tour_id: Some(tour_id),
                };
            }
            TourAction::NextStep => {
                if self.current_step + 1 < self.steps.len() {
                    self.current_step += 1;
                }
            }
            TourAction::PreviousStep => {
                self.current_step = self.current_step.saturating_sub(1);
            }
            TourAction::GoToStep(index) => {
                if let Some(last) = self.steps.len().checked_sub(1) {
                    self.current_step = index.min(last);
                }
            }
            TourAction::EndTour => *self = Self::default(),
            TourAction::SetLoading(loading) => self.is_loading = loading,
            TourAction::SetError(error) => {
                self.error = error;
                self.is_loading = false;
            }
        }
    }

    /// Apply one action and return the new state.
    #[must_use]
    pub fn reduce(mut self, action: TourAction) -> Self {
        self.apply(action);
        self
    }

    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.current_step)
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn is_last_step(&self) -> bool {
        !self.steps.is_empty() && self.current_step + 1 == self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn steps(n: usize) -> Vec<Step> {
        (0..n)
            .map(|i| Step::new(format!("s{i}"), format!("#s{i}"), "T", "C"))
            .collect()
    }

    fn started(n: usize) -> TourRunState {
        TourRunState::default().reduce(TourAction::StartTour {
            steps: steps(n),
            config: TourConfig::default(),
            tour_id: "tour-1-1".into(),
        })
    }

    #[test]
    fn start_activates_at_step_zero() {
        let mut prior = TourRunState::default();
        prior.apply(TourAction::SetError(Some("boom".into())));
        prior.apply(TourAction::SetLoading(true));
        let state = prior.reduce(TourAction::StartTour {
            steps: steps(3),
            config: TourConfig::default(),
            tour_id: "t".into(),
        });
        assert!(state.is_active);
        assert_eq!(state.current_step, 0);
        assert_eq!(state.error, None);
        assert!(!state.is_loading);
        assert_eq!(state.tour_id.as_deref(), Some("t"));
    }

    #[test]
    fn next_and_previous_clamp_at_ends() {
        let mut state = started(2);
        state.apply(TourAction::PreviousStep);
        assert_eq!(state.current_step, 0);
        state.apply(TourAction::NextStep);
        state.apply(TourAction::NextStep);
        assert_eq!(state.current_step, 1);
        assert!(state.is_last_step());
    }

    #[test]
    fn go_to_step_clamps() {
        let mut state = started(3);
        state.apply(TourAction::GoToStep(99));
        assert_eq!(state.current_step, 2);
        state.apply(TourAction::GoToStep(1));
        assert_eq!(state.current_step, 1);
    }

    #[test]
    fn go_to_step_on_empty_state_is_noop() {
        let state = TourRunState::default().reduce(TourAction::GoToStep(4));
        assert_eq!(state, TourRunState::default());
    }

    #[test]
    fn end_resets_everything() {
        let mut state = started(3);
        state.apply(TourAction::NextStep);
        state.apply(TourAction::SetLoading(true));
        state.apply(TourAction::EndTour);
        assert_eq!(state, TourRunState::default());
    }

    #[test]
    fn set_error_clears_loading_only() {
        let mut state = started(2);
        state.apply(TourAction::NextStep);
        state.apply(TourAction::SetLoading(true));
        state.apply(TourAction::SetError(Some("bad".into())));
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("bad"));
        assert_eq!(state.current_step, 1);
        assert!(state.is_active);
    }
}
