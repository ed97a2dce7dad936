//! View state management for the terminal player
//!
//! Tracks what the terminal has already shown and calculates rendering
//! deltas so only changes are printed.

use crate::stage::{MemoryStage, PortraitSlots};
use crate::types::script::Line;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// What the terminal currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Background asset on screen
    pub background: Option<String>,
    /// Portrait key -> (slot, sprite)
    pub portraits: BTreeMap<String, (Option<i32>, String)>,
    /// Last music code seen (display only)
    pub bgm: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the stage after a line was presented
    pub fn observe(
        &mut self,
        line: &Line,
        stage: &MemoryStage,
        portraits: &PortraitSlots,
    ) -> RenderDelta {
        let mut delta = RenderDelta::new();

        let background = stage.background().map(str::to_string);
        if background != self.background {
            if let Some(name) = &background {
                delta.effects_added.push(format!("Background: {name}"));
            }
            self.background = background;
        }

        let mut current = BTreeMap::new();
        for instance in portraits.instances() {
            let sprite = stage
                .visual(instance.handle())
                .map(|visual| visual.sprite.clone())
                .unwrap_or_default();
            current.insert(instance.key().to_string(), (instance.slot(), sprite));
        }

        for (key, entry) in &current {
            if self.portraits.get(key) != Some(entry) {
                let (slot, sprite) = entry;
                let slot = slot.map_or_else(|| "-".to_string(), |slot| slot.to_string());
                delta
                    .effects_added
                    .push(format!("Portrait: {key} [{sprite}] (slot {slot})"));
            }
        }
        for key in self.portraits.keys() {
            if !current.contains_key(key) {
                delta.effects_added.push(format!("Hide: {key}"));
            }
        }
        self.portraits = current;

        let bgm = line.bgm_code.trim();
        if !bgm.is_empty() && self.bgm.as_deref() != Some(bgm) {
            delta.effects_added.push(format!("BGM: {bgm}"));
            self.bgm = Some(bgm.to_string());
        }

        for token in crate::production::tokenize(&line.production_key) {
            delta.effects_added.push(format!("Production: {}", token.name));
        }

        delta
    }
}

/// Represents what needs to be rendered (the delta from previous state)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderDelta {
    /// Changes that were observed (human-readable strings)
    pub effects_added: Vec<String>,
}

impl RenderDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.effects_added.is_empty()
    }

    /// Render this delta
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writeln!(out, "[Effects]")?;
        for effect in &self.effects_added {
            writeln!(out, "  {effect}")?;
        }
        writeln!(out)
    }
}
