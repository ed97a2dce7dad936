//! Playback state representation

use crate::types::script::Line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the playback state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackPhase {
    /// No episode loaded
    #[default]
    Idle,
    /// An episode is indexed but playback has not begun
    Loaded,
    /// A line is current; the typewriter may be revealing it
    Presenting,
    /// The last line was advanced past
    Finished,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::Presenting => "presenting",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Runtime state of one playback session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaybackState {
    /// Line currently presented; `None` before start and after the episode ends
    pub current: Option<Line>,
    /// Whether the typewriter is still revealing the current line
    pub typing: bool,
    /// Whether the reveal of the current line was skipped
    pub skip_requested: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node id of the current line
    pub fn current_node(&self) -> Option<&str> {
        self.current.as_ref().map(|line| line.node_id.as_str())
    }

    /// Forget the current line and any reveal flags
    pub fn clear(&mut self) {
        self.current = None;
        self.typing = false;
        self.skip_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_no_current_line() {
        let state = PlaybackState::new();
        assert!(state.current.is_none());
        assert_eq!(state.current_node(), None);
        assert!(!state.typing);
    }

    #[test]
    fn clear_resets_flags() {
        let mut state = PlaybackState {
            current: Some(Line::new("a", 0, "Hi")),
            typing: true,
            skip_requested: true,
        };
        state.clear();
        assert_eq!(state, PlaybackState::new());
    }

    #[test]
    fn phase_display_is_lowercase() {
        assert_eq!(PlaybackPhase::Presenting.to_string(), "presenting");
    }
}
