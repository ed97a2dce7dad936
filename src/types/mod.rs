//! Core types shared across the playback engine
//!
//! - Script: episodes and the lines they are made of
//! - State: playback phase and the current line
//! - Event: notifications recorded for observers

pub mod event;
pub mod script;
pub mod state;

pub use event::PlaybackEvent;
pub use script::{Episode, Line};
pub use state::{PlaybackPhase, PlaybackState};
