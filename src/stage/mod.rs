//! Rendering surface abstraction
//!
//! The host engine owns the actual visuals. Playback only talks to it through
//! the [`Stage`] trait using opaque [`VisualHandle`]s, so the core never
//! depends on a particular renderer.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod memory;
pub mod portraits;
pub mod registry;

pub use memory::{MemoryStage, Visual};
pub use portraits::{PortraitInstance, PortraitSlots};
pub use registry::{AssetManifest, AssetRegistry, PortraitTemplate};

/// Opaque reference to a visual owned by the stage
///
/// Handles are never reused, so a handle to a destroyed visual stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

impl fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// A named on-screen reference frame a portrait can be attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    #[serde(default)]
    pub origin: Vec3,
}

impl Anchor {
    pub fn new(name: impl Into<String>, origin: Vec3) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }
}

/// Operations playback needs from the host's rendering surface
///
/// Every operation on a handle that is no longer alive must be ignored.
pub trait Stage {
    /// Create a portrait visual from a template, showing its default sprite
    fn spawn(&mut self, template: &PortraitTemplate) -> VisualHandle;

    /// Release a visual entirely
    fn destroy(&mut self, handle: VisualHandle);

    fn is_alive(&self, handle: VisualHandle) -> bool;

    /// Parent a visual to an anchor at a centered, unrotated, unscaled local transform
    fn attach(&mut self, handle: VisualHandle, anchor: &Anchor);

    /// Position relative to the visual's parent frame
    fn local_position(&self, handle: VisualHandle) -> Option<Vec3>;

    fn set_local_position(&mut self, handle: VisualHandle, position: Vec3);

    fn set_opacity(&mut self, handle: VisualHandle, alpha: f32);

    fn set_sprite(&mut self, handle: VisualHandle, sprite: &str);

    fn set_background(&mut self, background: &str);

    fn set_speaker(&mut self, speaker: &str);

    fn set_text(&mut self, text: &str);
}
