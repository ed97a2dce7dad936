//! Playback errors and non-fatal diagnostics

use crate::types::state::PlaybackPhase;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that abort a load or begin operation
///
/// The controller stays in its prior state whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Malformed script: {message}")]
    ScriptParse { message: String },

    #[error("Episode '{episode_id}' has no usable lines")]
    EmptyScript { episode_id: String },

    #[error("No start line could be resolved")]
    NoStartLine,

    #[error("Cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: PlaybackPhase,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl PlaybackError {
    pub fn script_parse(message: impl Into<String>) -> Self {
        Self::ScriptParse {
            message: message.into(),
        }
    }

    pub fn empty_script(episode_id: impl Into<String>) -> Self {
        Self::EmptyScript {
            episode_id: episode_id.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PlaybackError {
    fn from(error: serde_json::Error) -> Self {
        Self::script_parse(error.to_string())
    }
}

/// Kind of asset a lookup missed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Background,
    Sprite,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::Sprite => "sprite",
        };
        f.write_str(name)
    }
}

/// Non-fatal problems that degrade a single presentation step
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    #[error("No portrait template registered for '{key}'")]
    MissingTemplate { key: String },

    #[error("No anchor registered for position slot {slot}")]
    MissingAnchor { slot: i32 },

    #[error("No {kind} registered for '{key}'")]
    MissingAsset { kind: AssetKind, key: String },

    #[error("Duplicate node id '{node_id}'; the later line wins")]
    DuplicateNode { node_id: String },

    #[error("Line at index {index} has an empty node id and was skipped")]
    EmptyNodeId { index: usize },
}

impl Diagnostic {
    pub fn missing_asset(kind: AssetKind, key: impl Into<String>) -> Self {
        Self::MissingAsset {
            kind,
            key: key.into(),
        }
    }
}

/// Number of undrained diagnostics kept; older entries are dropped first
pub const MAX_DIAGNOSTICS: usize = 256;

/// Collects diagnostics for the host and mirrors them to the log
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it as a warning
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        if self.entries.len() >= MAX_DIAGNOSTICS {
            self.entries.remove(0);
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand all recorded diagnostics to the caller
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_phase() {
        let error = PlaybackError::InvalidState {
            operation: "load",
            phase: PlaybackPhase::Presenting,
        };
        assert_eq!(error.to_string(), "Cannot load while presenting");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let error: PlaybackError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(error, PlaybackError::ScriptParse { .. }));
    }

    #[test]
    fn take_drains_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Diagnostic::MissingAnchor { slot: 4 });
        diagnostics.report(Diagnostic::missing_asset(AssetKind::Background, "sky"));

        let taken = diagnostics.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].to_string(), "No background registered for 'sky'");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn undrained_buffer_keeps_most_recent() {
        let mut diagnostics = Diagnostics::new();
        for slot in 0..(MAX_DIAGNOSTICS as i32 + 10) {
            diagnostics.report(Diagnostic::MissingAnchor { slot });
        }

        let entries = diagnostics.entries();
        assert_eq!(entries.len(), MAX_DIAGNOSTICS);
        assert_eq!(entries[0], Diagnostic::MissingAnchor { slot: 10 });
        assert_eq!(
            entries.last(),
            Some(&Diagnostic::MissingAnchor {
                slot: MAX_DIAGNOSTICS as i32 + 9
            })
        );
    }
}
