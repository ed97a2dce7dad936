//! Static checks over an episode
//!
//! Lints catch authoring problems before playback:
//! - Structural problems (empty or duplicate node ids)
//! - Dangling branch targets and unregistered assets
//! - Lines no playback path can reach
//! - Production tokens no effect handles

use crate::stage::AssetRegistry;
use crate::types::script::{Episode, Line};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod checks;
pub mod config;

pub use config::LintConfig;

/// Lint severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LintLevel {
    /// Error: playback will misbehave
    Error,
    /// Warning: should be reviewed
    Warning,
    /// Info: for your information
    Info,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

/// A lint issue found in the episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    /// Severity level
    pub level: LintLevel,
    /// Issue message
    pub message: String,
    /// Index of the offending line in authoring order
    pub index: Option<usize>,
    /// Node id of the offending line
    pub node_id: Option<String>,
    /// Category of the issue
    pub category: String,
}

impl LintIssue {
    pub fn new(level: LintLevel, category: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            index: None,
            node_id: None,
            category: category.to_string(),
        }
    }

    /// Attach the authoring index and node id of a line
    pub fn at(mut self, index: usize, line: &Line) -> Self {
        self.index = Some(index);
        if !line.node_id.trim().is_empty() {
            self.node_id = Some(line.node_id.clone());
        }
        self
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.level, self.category)?;
        if let Some(index) = self.index {
            write!(f, " line {}", index + 1)?;
        }
        if let Some(node_id) = &self.node_id {
            write!(f, " ({node_id})")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Result of linting an episode
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Issues found
    pub issues: Vec<LintIssue>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of info messages
    pub info_count: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: LintIssue) {
        match issue.level {
            LintLevel::Error => self.error_count += 1,
            LintLevel::Warning => self.warning_count += 1,
            LintLevel::Info => self.info_count += 1,
        }
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a LintIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.category == category)
    }
}

/// What a lint pass sees
pub struct LintContext<'a> {
    pub episode: &'a Episode,
    /// Registry to check asset references against, when available
    pub registry: Option<&'a AssetRegistry>,
    pub config: &'a LintConfig,
}

/// Lint an episode with default configuration and no registry
pub fn lint(episode: &Episode) -> LintResult {
    lint_with_config(episode, None, &LintConfig::default())
}

/// Lint an episode with custom configuration, optionally against a registry
pub fn lint_with_config(
    episode: &Episode,
    registry: Option<&AssetRegistry>,
    config: &LintConfig,
) -> LintResult {
    let mut result = LintResult::new();
    let ctx = LintContext {
        episode,
        registry,
        config,
    };

    if config.syntax.enabled {
        checks::syntax::check(&ctx, &mut result);
    }

    if config.references.enabled {
        checks::references::check(&ctx, &mut result);
    }

    if config.flow.enabled {
        checks::flow::check(&ctx, &mut result);
    }

    if config.quality.enabled {
        checks::quality::check(&ctx, &mut result);
    }

    log::debug!(
        "[Lint] '{}': {} errors, {} warnings, {} info",
        episode.episode_id,
        result.error_count,
        result.warning_count,
        result.info_count
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_simple_valid_episode() {
        let episode = Episode::new(
            "ep",
            vec![
                Line::new("a", 1, "Hello").with_speaker("Alice"),
                Line::new("b", 2, "Goodbye").with_speaker("Alice"),
            ],
        );
        let result = lint(&episode);

        assert!(result.is_clean(), "{:?}", result.issues);
        assert!(!result.has_errors());
    }

    #[test]
    fn counts_follow_levels() {
        let mut result = LintResult::new();
        result.add_issue(LintIssue::new(LintLevel::Error, "syntax", "e"));
        result.add_issue(LintIssue::new(LintLevel::Warning, "flow", "w"));
        result.add_issue(LintIssue::new(LintLevel::Warning, "flow", "w"));

        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 2);
        assert_eq!(result.in_category("flow").count(), 2);
    }

    #[test]
    fn issue_display_names_line_and_node() {
        let line = Line::new("intro", 1, "");
        let issue = LintIssue::new(LintLevel::Error, "references", "broken").at(2, &line);
        assert_eq!(issue.to_string(), "error [references] line 3 (intro): broken");
    }
}
