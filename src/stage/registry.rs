//! Configuration-time registries for portraits, backgrounds and anchors
//!
//! Keys are trimmed and compared case-insensitively. When the same key is
//! registered twice the first registration wins.

use crate::stage::{Anchor, VisualHandle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Normalized form of a registry key
pub fn asset_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Visual template for one portrait key
#[derive(Debug, Clone, PartialEq)]
pub struct PortraitTemplate {
    /// Key as registered (trimmed)
    pub key: String,
    /// Sprite shown when no variant applies
    pub default_sprite: String,
    variants: HashMap<String, String>,
}

impl PortraitTemplate {
    pub fn new(key: impl Into<String>, default_sprite: impl Into<String>) -> Self {
        Self {
            key: key.into().trim().to_string(),
            default_sprite: default_sprite.into(),
            variants: HashMap::new(),
        }
    }

    /// Register a sprite variant; an existing variant with the same key is kept
    pub fn with_variant(mut self, sprite_type: &str, sprite: impl Into<String>) -> Self {
        let key = asset_key(sprite_type);
        if key.is_empty() {
            return self;
        }
        if self.variants.contains_key(&key) {
            log::debug!(
                "[Registry] Duplicate sprite variant '{}' for '{}' ignored",
                sprite_type,
                self.key
            );
        } else {
            self.variants.insert(key, sprite.into());
        }
        self
    }

    pub fn variant(&self, sprite_type: &str) -> Option<&str> {
        self.variants.get(&asset_key(sprite_type)).map(String::as_str)
    }

    /// Sprite for a sprite type, falling back to the default sprite
    pub fn sprite_for(&self, sprite_type: &str) -> &str {
        self.variant(sprite_type).unwrap_or(&self.default_sprite)
    }
}

/// All lookups presentation performs against host assets
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    portraits: HashMap<String, PortraitTemplate>,
    backgrounds: HashMap<String, String>,
    anchors: HashMap<i32, Anchor>,
    shake_target: Option<VisualHandle>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a portrait template; returns `false` if the key was taken
    pub fn register_portrait(&mut self, template: PortraitTemplate) -> bool {
        let key = asset_key(&template.key);
        if key.is_empty() {
            return false;
        }
        if self.portraits.contains_key(&key) {
            log::debug!("[Registry] Duplicate portrait '{}' ignored", template.key);
            return false;
        }
        self.portraits.insert(key, template);
        true
    }

    /// Register a background visual; returns `false` if the code was taken
    pub fn register_background(&mut self, code: &str, background: impl Into<String>) -> bool {
        let key = asset_key(code);
        if key.is_empty() {
            return false;
        }
        if self.backgrounds.contains_key(&key) {
            log::debug!("[Registry] Duplicate background '{}' ignored", code);
            return false;
        }
        self.backgrounds.insert(key, background.into());
        true
    }

    /// Register the anchor for a position slot; returns `false` if the slot was taken
    pub fn register_anchor(&mut self, slot: i32, anchor: Anchor) -> bool {
        if self.anchors.contains_key(&slot) {
            log::debug!("[Registry] Duplicate anchor for slot {} ignored", slot);
            return false;
        }
        self.anchors.insert(slot, anchor);
        true
    }

    /// Designate the visual that `shake` productions move
    pub fn set_shake_target(&mut self, handle: VisualHandle) {
        self.shake_target = Some(handle);
    }

    pub fn portrait(&self, key: &str) -> Option<&PortraitTemplate> {
        self.portraits.get(&asset_key(key))
    }

    pub fn background(&self, code: &str) -> Option<&str> {
        self.backgrounds.get(&asset_key(code)).map(String::as_str)
    }

    pub fn anchor(&self, slot: i32) -> Option<&Anchor> {
        self.anchors.get(&slot)
    }

    pub fn shake_target(&self) -> Option<VisualHandle> {
        self.shake_target
    }

    pub fn has_portrait(&self, key: &str) -> bool {
        self.portrait(key).is_some()
    }
}

/// Serializable description of an asset registry
///
/// Entries are applied in order, so within a list the first occurrence of a
/// key wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetManifest {
    pub portraits: Vec<PortraitEntry>,
    pub backgrounds: Vec<BackgroundEntry>,
    pub anchors: BTreeMap<i32, Anchor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitEntry {
    pub key: String,
    pub default_sprite: String,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantEntry {
    pub sprite_type: String,
    pub sprite: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundEntry {
    pub code: String,
    pub image: String,
}

impl AssetManifest {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Build a registry from the manifest
    pub fn into_registry(self) -> AssetRegistry {
        let mut registry = AssetRegistry::new();
        for entry in self.portraits {
            let template = entry.variants.iter().fold(
                PortraitTemplate::new(entry.key, entry.default_sprite),
                |template, variant| template.with_variant(&variant.sprite_type, variant.sprite.clone()),
            );
            registry.register_portrait(template);
        }
        for entry in self.backgrounds {
            registry.register_background(&entry.code, entry.image);
        }
        for (slot, anchor) in self.anchors {
            registry.register_anchor(slot, anchor);
        }
        registry
    }
}
