//! Session event definitions
//!
//! Discrete signals that drive a reading session: app lifecycle transitions,
//! controls-overlay toggles, and reader position changes. Readers and
//! platform shims publish these; the session loop consumes them.

use serde::{Deserialize, Serialize};

/// Application foreground/background state, as observed from the platform.
///
/// The engine never owns this state; it only reacts to transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    /// App is foregrounded and receiving input
    Active,
    /// App is fully backgrounded
    Background,
    /// App is transitioning or partially obscured (e.g. system sheet)
    Inactive,
}

impl AppState {
    pub fn is_active(&self) -> bool {
        matches!(self, AppState::Active)
    }
}

/// Events published on the session bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SessionEvent {
    /// App moved between foreground/background/inactive
    AppStateChanged { state: AppState },

    /// The reader's controls overlay was shown or hidden
    ControlsVisibilityChanged { visible: bool },

    /// Image-based reader landed on a new page (1-indexed)
    PageTurned { page: i32 },

    /// EPUB reader settled on a new position
    PositionChanged { epubcfi: String, percentage: f64 },

    /// The reader screen is being dismissed; ends the session loop
    Ended,
}

impl SessionEvent {
    /// Short name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::AppStateChanged { .. } => "AppStateChanged",
            SessionEvent::ControlsVisibilityChanged { .. } => "ControlsVisibilityChanged",
            SessionEvent::PageTurned { .. } => "PageTurned",
            SessionEvent::PositionChanged { .. } => "PositionChanged",
            SessionEvent::Ended => "Ended",
        }
    }
}
