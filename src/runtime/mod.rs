//! Playback runtime
//!
//! This module indexes episodes, resolves navigation and runs the playback
//! state machine that drives presentation and productions.

use crate::types::event::PlaybackEvent;
use crate::types::script::Line;
use std::cell::RefCell;
use std::rc::Rc;

pub mod controller;
pub mod index;
pub mod navigation;


pub use controller::{AdvanceOutcome, PlaybackController};
pub use index::ScriptIndex;
pub use navigation::resolve_next;

/// Synchronous receiver of playback lifecycle notifications
///
/// Observers are called in registration order, after the production
/// dispatcher has seen the line.
pub trait PlaybackObserver {
    fn on_line_presented(&mut self, _line: &Line) {}

    fn on_episode_finished(&mut self, _episode_id: &str) {}
}

/// Observer that records every event into a shared log
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl PlaybackObserver for EventRecorder {
    fn on_line_presented(&mut self, line: &Line) {
        self.events
            .borrow_mut()
            .push(PlaybackEvent::LinePresented(line.clone()));
    }

    fn on_episode_finished(&mut self, episode_id: &str) {
        self.events.borrow_mut().push(PlaybackEvent::EpisodeFinished {
            episode_id: episode_id.to_string(),
        });
    }
}
