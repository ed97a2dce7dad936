//! In-memory stage used by tests and the terminal player

use crate::stage::{Anchor, PortraitTemplate, Stage, VisualHandle};
use glam::{Quat, Vec3};
use std::collections::BTreeMap;

/// State of one visual on a [`MemoryStage`]
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub name: String,
    pub parent: Option<String>,
    pub local_position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub opacity: f32,
    pub sprite: String,
}

impl Visual {
    fn new(name: impl Into<String>, sprite: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            local_position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            opacity: 1.0,
            sprite: sprite.into(),
        }
    }

    /// Whether the local transform is centered, unrotated and unscaled
    pub fn is_neutral(&self) -> bool {
        self.local_position == Vec3::ZERO
            && self.rotation == Quat::IDENTITY
            && self.scale == Vec3::ONE
    }
}

/// A stage that records everything in plain data structures
#[derive(Debug, Clone, Default)]
pub struct MemoryStage {
    visuals: BTreeMap<VisualHandle, Visual>,
    next_id: u64,
    destroyed: Vec<VisualHandle>,
    background: Option<String>,
    speaker: String,
    text: String,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-portrait visual, such as a camera root used as shake target
    pub fn add_visual(&mut self, name: impl Into<String>, position: Vec3) -> VisualHandle {
        let handle = self.allocate();
        let mut visual = Visual::new(name, "");
        visual.local_position = position;
        self.visuals.insert(handle, visual);
        handle
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    /// Live visuals in creation order
    pub fn visuals(&self) -> impl Iterator<Item = (VisualHandle, &Visual)> {
        self.visuals.iter().map(|(handle, visual)| (*handle, visual))
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    /// Handles destroyed so far, in destruction order
    pub fn destroyed(&self) -> &[VisualHandle] {
        &self.destroyed
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn allocate(&mut self) -> VisualHandle {
        self.next_id += 1;
        VisualHandle(self.next_id)
    }
}

impl Stage for MemoryStage {
    fn spawn(&mut self, template: &PortraitTemplate) -> VisualHandle {
        let handle = self.allocate();
        self.visuals.insert(
            handle,
            Visual::new(template.key.clone(), template.default_sprite.clone()),
        );
        handle
    }

    fn destroy(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.destroyed.push(handle);
        }
    }

    fn is_alive(&self, handle: VisualHandle) -> bool {
        self.visuals.contains_key(&handle)
    }

    fn attach(&mut self, handle: VisualHandle, anchor: &Anchor) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.parent = Some(anchor.name.clone());
            visual.local_position = Vec3::ZERO;
            visual.rotation = Quat::IDENTITY;
            visual.scale = Vec3::ONE;
        }
    }

    fn local_position(&self, handle: VisualHandle) -> Option<Vec3> {
        self.visuals.get(&handle).map(|visual| visual.local_position)
    }

    fn set_local_position(&mut self, handle: VisualHandle, position: Vec3) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.local_position = position;
        }
    }

    fn set_opacity(&mut self, handle: VisualHandle, alpha: f32) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.opacity = alpha;
        }
    }

    fn set_sprite(&mut self, handle: VisualHandle, sprite: &str) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.sprite = sprite.to_string();
        }
    }

    fn set_background(&mut self, background: &str) {
        self.background = Some(background.to_string());
    }

    fn set_speaker(&mut self, speaker: &str) {
        self.speaker = speaker.to_string();
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
