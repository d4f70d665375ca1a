//! Visibility/focus coordination
//!
//! Folds two independent signals -- app foreground state and the controls
//! overlay -- into pause/resume decisions for the session timer. The decision
//! is a pure function so it can be tested without any UI plumbing, and it is
//! idempotent: re-applying the same signals never double-pauses or
//! double-resumes.

use crate::bus::AppState;

/// What the timer should do after a signal change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Pause,
    Resume,
    None,
}

/// Decide the timer action for the current combination of signals.
///
/// The timer pauses whenever the app is not active, or the overlay is shown
/// while the timer runs. It resumes only when the app is active, the overlay
/// is hidden, and the timer is not already running.
pub fn decide(app_state: AppState, overlay_visible: bool, is_running: bool) -> TimerAction {
    if !app_state.is_active() || overlay_visible {
        if is_running {
            TimerAction::Pause
        } else {
            TimerAction::None
        }
    } else if !is_running {
        TimerAction::Resume
    } else {
        TimerAction::None
    }
}

/// Tracks the latest observed signals and re-derives the timer action on
/// every change. Owned by the session loop.
#[derive(Debug)]
pub struct FocusCoordinator {
    app_state: AppState,
    overlay_visible: bool,
}

impl FocusCoordinator {
    /// Sessions start foregrounded with the overlay hidden
    pub fn new() -> Self {
        Self {
            app_state: AppState::Active,
            overlay_visible: false,
        }
    }

    pub fn set_app_state(&mut self, state: AppState) {
        self.app_state = state;
    }

    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    /// Re-evaluate against the timer's current running state
    pub fn reevaluate(&self, is_running: bool) -> TimerAction {
        decide(self.app_state, self.overlay_visible, is_running)
    }
}

impl Default for FocusCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backgrounding_pauses_running_timer() {
        assert_eq!(
            decide(AppState::Background, false, true),
            TimerAction::Pause
        );
        assert_eq!(decide(AppState::Inactive, false, true), TimerAction::Pause);
    }

    #[test]
    fn test_overlay_pauses_running_timer() {
        assert_eq!(decide(AppState::Active, true, true), TimerAction::Pause);
    }

    #[test]
    fn test_resume_requires_active_and_hidden_overlay() {
        assert_eq!(decide(AppState::Active, false, false), TimerAction::Resume);
        assert_eq!(
            decide(AppState::Background, false, false),
            TimerAction::None
        );
        assert_eq!(decide(AppState::Active, true, false), TimerAction::None);
    }

    #[test]
    fn test_idempotence() {
        // Already paused + pause conditions -> nothing to do
        assert_eq!(decide(AppState::Background, true, false), TimerAction::None);
        // Already running + resume conditions -> nothing to do
        assert_eq!(decide(AppState::Active, false, true), TimerAction::None);
    }

    #[test]
    fn test_coordinator_tracks_signal_changes() {
        let mut focus = FocusCoordinator::new();

        // Fresh session: active, overlay hidden, timer not yet running
        assert_eq!(focus.reevaluate(false), TimerAction::Resume);

        focus.set_overlay_visible(true);
        assert_eq!(focus.reevaluate(true), TimerAction::Pause);
        // Applying the same signal again is a no-op once paused
        assert_eq!(focus.reevaluate(false), TimerAction::None);

        focus.set_overlay_visible(false);
        assert_eq!(focus.reevaluate(false), TimerAction::Resume);

        focus.set_app_state(AppState::Background);
        assert_eq!(focus.reevaluate(true), TimerAction::Pause);

        focus.set_app_state(AppState::Active);
        assert_eq!(focus.reevaluate(false), TimerAction::Resume);
    }

    #[test]
    fn test_running_iff_active_and_hidden() {
        // Exhaustive decision table: after applying the action, the timer
        // runs iff the app is active and the overlay is hidden.
        let states = [AppState::Active, AppState::Background, AppState::Inactive];
        for state in states {
            for overlay in [false, true] {
                for running in [false, true] {
                    let next_running = match decide(state, overlay, running) {
                        TimerAction::Pause => false,
                        TimerAction::Resume => true,
                        TimerAction::None => running,
                    };
                    assert_eq!(
                        next_running,
                        state.is_active() && !overlay,
                        "state={:?} overlay={} running={}",
                        state,
                        overlay,
                        running
                    );
                }
            }
        }
    }
}
