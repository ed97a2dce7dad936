//! Lifecycle events raised by playback

use crate::types::script::Line;
use serde::{Deserialize, Serialize};

/// Lifecycle notifications delivered to external collaborators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PlaybackEvent {
    /// A line finished binding to the stage
    LinePresented(Line),
    /// The resolver ran out of lines for the episode
    EpisodeFinished { episode_id: String },
}

impl PlaybackEvent {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::EpisodeFinished { .. })
    }
}
