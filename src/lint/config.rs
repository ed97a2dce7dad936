//! Lint configuration

use serde::{Deserialize, Serialize};

/// Lint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Node id checks
    pub syntax: SyntaxConfig,
    /// Branch target and asset checks
    pub references: ReferencesConfig,
    /// Reachability analysis
    pub flow: FlowConfig,
    /// Production token and text checks
    pub quality: QualityConfig,
}

/// Node id checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub enabled: bool,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Reference checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    pub enabled: bool,
    /// Check `nextNode` targets resolve
    pub check_branches: bool,
    /// Check portraits, backgrounds and slots against the registry
    pub check_assets: bool,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_branches: true,
            check_assets: true,
        }
    }
}

/// Flow analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub enabled: bool,
    /// Report lines no path from the first line reaches
    pub check_unreachable: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_unreachable: true,
        }
    }
}

/// Quality checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub enabled: bool,
    /// Effect names the dispatcher is expected to handle
    pub known_effects: Vec<String>,
    /// Maximum text length (characters), 0 disables the check
    pub max_text_length: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            known_effects: vec!["jump".to_string(), "shake".to_string()],
            max_text_length: 200,
        }
    }
}
