//! Playback configuration

use serde::{Deserialize, Serialize};

/// Tunables for presentation, productions and session behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlaybackConfig {
    pub typewriter: TypewriterConfig,
    pub portraits: PortraitConfig,
    pub jump: JumpConfig,
    pub shake: ShakeConfig,
    pub session: SessionConfig,
}

impl PlaybackConfig {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Typewriter reveal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Seconds between revealed characters
    pub char_interval: f32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            char_interval: 0.05,
        }
    }
}

/// Portrait highlighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    /// Opacity of portraits referenced by the current line
    pub active_alpha: f32,
    /// Opacity of every other live portrait
    pub dimmed_alpha: f32,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            active_alpha: 1.0,
            dimmed_alpha: 0.5,
        }
    }
}

/// `jump` production configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Cycles run when the token carries no count
    pub default_cycles: u32,
    /// Vertical offset at the top of each cycle
    pub height: f32,
    /// Seconds per leg (up or down)
    pub half_duration: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            default_cycles: 1,
            height: 30.0,
            half_duration: 0.12,
        }
    }
}

/// `shake` production configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Total seconds of shaking
    pub duration: f32,
    /// Maximum offset at the start of the shake
    pub strength: f32,
    pub axes: ShakeAxes,
    /// Fixed RNG seed for reproducible offsets
    pub seed: Option<u64>,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            duration: 0.3,
            strength: 12.0,
            axes: ShakeAxes::default(),
            seed: None,
        }
    }
}

/// Axes a shake moves along
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeAxes {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Default for ShakeAxes {
    fn default() -> Self {
        Self {
            x: true,
            y: true,
            z: false,
        }
    }
}

/// Session-level behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Evict leftover portraits before switching episodes with `set_episode`
    pub cleanup_on_set_episode: bool,
}
