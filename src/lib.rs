//! # kataribe
//!
//! A dialogue playback engine for visual-novel style scenes. Episodes are
//! authored as JSON, indexed by node id and played line by line onto a host
//! rendering surface: speaker and typewriter text, portraits in position
//! slots, backgrounds, sprite variants and short production effects.
//!
//! The host owns the frame loop and input. It implements [`stage::Stage`]
//! (or uses [`stage::MemoryStage`]), registers assets in an
//! [`stage::AssetRegistry`], then drives a [`PlaybackController`] with
//! `advance` on every tap and `tick` on every frame.
//!
//! ## Quick Start
//!
//! ```rust
//! use kataribe::{AdvanceOutcome, PlaybackConfig, PlaybackController};
//! use kataribe::stage::{Anchor, AssetRegistry, MemoryStage, PortraitTemplate};
//! use glam::Vec3;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = r#"{
//!     "episodeId": "ep1",
//!     "lines": [
//!         {"nodeId": "a", "order": 1, "speaker": "Bob", "portraitKey": "bob", "text": "Hi"},
//!         {"nodeId": "b", "order": 2, "speaker": "Bob", "portraitKey": "bob", "text": "Bye"}
//!     ]
//! }"#;
//!
//! let mut registry = AssetRegistry::new();
//! registry.register_portrait(PortraitTemplate::new("bob", "bob.png"));
//! registry.register_anchor(0, Anchor::new("center", Vec3::ZERO));
//!
//! let mut controller =
//!     PlaybackController::new(MemoryStage::new(), registry, PlaybackConfig::default());
//! controller.load_source(source)?;
//! controller.begin(None)?;
//!
//! loop {
//!     controller.tick(1.0 / 60.0);
//!     match controller.advance() {
//!         AdvanceOutcome::Finished => break,
//!         AdvanceOutcome::Presented | AdvanceOutcome::Skipped => {
//!             println!("{}: {}", controller.stage().speaker(), controller.stage().text());
//!         }
//!         AdvanceOutcome::Ignored => break,
//!     }
//! }
//! assert!(controller.portraits().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod lint;
pub mod logging;
pub mod parser;
pub mod presentation;
pub mod production;
pub mod runtime;
pub mod sequence;
pub mod stage;
pub mod types;

pub use config::PlaybackConfig;
pub use error::{Diagnostic, PlaybackError};
pub use parser::{parse_episode, parse_episode_bytes};
pub use runtime::{AdvanceOutcome, EventRecorder, PlaybackController, PlaybackObserver};
pub use types::{Episode, Line, PlaybackEvent, PlaybackPhase, PlaybackState};
