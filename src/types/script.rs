//! Episode and line representation of a parsed dialogue script

use serde::{Deserialize, Serialize};

/// Characters that separate portrait keys inside a line's `portraitKey` field
pub const PORTRAIT_KEY_SEPARATORS: &[char] = &[',', '|', ';'];

/// One complete ordered dialogue script under a single identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Episode identifier
    #[serde(default)]
    pub episode_id: String,
    /// Dialogue lines in authoring order
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Episode {
    pub fn new(episode_id: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            episode_id: episode_id.into(),
            lines,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A single dialogue beat, addressable by its node identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Line {
    /// Node identifier, unique within an episode
    pub node_id: String,
    /// Authoring line identifier (passed through)
    pub line_id: String,
    /// Default sequencing key
    pub order: i64,
    /// Speaker name
    pub speaker: String,
    /// One or more portrait keys; the first is the primary portrait
    pub portrait_key: String,
    /// Position slot for the primary portrait
    pub position: i32,
    /// Production effect tokens
    pub production_key: String,
    /// Background code
    #[serde(rename = "BGICode")]
    pub bgi_code: String,
    /// Background music code (passed through)
    #[serde(rename = "BGMCode")]
    pub bgm_code: String,
    /// Sprite variant code for the primary portrait
    #[serde(rename = "SpriteType", alias = "spriteType")]
    pub sprite_type: String,
    /// Body text
    pub text: String,
    /// Free-form tags (not interpreted)
    pub tags: Vec<String>,
    /// Explicit branch target
    pub next_node: String,
}

impl Line {
    /// Create a line with just a node id, order and text
    pub fn new(node_id: impl Into<String>, order: i64, text: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            order,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }

    pub fn with_portrait(mut self, portrait_key: impl Into<String>) -> Self {
        self.portrait_key = portrait_key.into();
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn with_production(mut self, production_key: impl Into<String>) -> Self {
        self.production_key = production_key.into();
        self
    }

    pub fn with_background(mut self, bgi_code: impl Into<String>) -> Self {
        self.bgi_code = bgi_code.into();
        self
    }

    pub fn with_sprite(mut self, sprite_type: impl Into<String>) -> Self {
        self.sprite_type = sprite_type.into();
        self
    }

    pub fn with_next(mut self, next_node: impl Into<String>) -> Self {
        self.next_node = next_node.into();
        self
    }

    /// All non-empty, trimmed portrait keys in authoring order
    pub fn portrait_keys(&self) -> Vec<&str> {
        self.portrait_key
            .split(PORTRAIT_KEY_SEPARATORS)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// The first portrait key, if any
    pub fn primary_portrait(&self) -> Option<&str> {
        self.portrait_keys().into_iter().next()
    }

    /// Trimmed explicit branch target, `None` when empty
    pub fn explicit_next(&self) -> Option<&str> {
        let next = self.next_node.trim();
        (!next.is_empty()).then_some(next)
    }
}
