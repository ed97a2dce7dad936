//! Reference integrity checks

use crate::lint::{LintContext, LintIssue, LintLevel, LintResult};
use crate::runtime::index::node_key;
use crate::stage::AssetRegistry;
use crate::types::script::Line;
use std::collections::HashSet;

/// Check branch targets and, with a registry, asset references
pub fn check(ctx: &LintContext, result: &mut LintResult) {
    if ctx.config.references.check_branches {
        check_branches(ctx, result);
    }

    if ctx.config.references.check_assets
        && let Some(registry) = ctx.registry
    {
        for (index, line) in ctx.episode.lines.iter().enumerate() {
            check_assets(index, line, registry, result);
        }
    }
}

fn check_branches(ctx: &LintContext, result: &mut LintResult) {
    let defined: HashSet<String> = ctx
        .episode
        .lines
        .iter()
        .filter(|line| !line.node_id.trim().is_empty())
        .map(|line| node_key(&line.node_id))
        .collect();

    for (index, line) in ctx.episode.lines.iter().enumerate() {
        if let Some(next) = line.explicit_next()
            && !defined.contains(&node_key(next))
        {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Error,
                    "references",
                    format!("Next node '{next}' does not exist"),
                )
                .at(index, line),
            );
        }
    }
}

fn check_assets(index: usize, line: &Line, registry: &AssetRegistry, result: &mut LintResult) {
    for key in line.portrait_keys() {
        if !registry.has_portrait(key) {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Warning,
                    "references",
                    format!("Portrait '{key}' is not registered"),
                )
                .at(index, line),
            );
        }
    }

    if line.primary_portrait().is_some() && registry.anchor(line.position).is_none() {
        result.add_issue(
            LintIssue::new(
                LintLevel::Warning,
                "references",
                format!("Position slot {} has no anchor", line.position),
            )
            .at(index, line),
        );
    }

    let code = line.bgi_code.trim();
    if !code.is_empty() && registry.background(code).is_none() {
        result.add_issue(
            LintIssue::new(
                LintLevel::Warning,
                "references",
                format!("Background '{code}' is not registered"),
            )
            .at(index, line),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintConfig;
    use crate::stage::{Anchor, PortraitTemplate};
    use crate::types::script::Episode;
    use glam::Vec3;

    fn run(episode: &Episode, registry: Option<&AssetRegistry>) -> LintResult {
        let config = LintConfig::default();
        let ctx = LintContext {
            episode,
            registry,
            config: &config,
        };
        let mut result = LintResult::new();
        check(&ctx, &mut result);
        result
    }

    #[test]
    fn dangling_next_node_is_an_error() {
        let episode = Episode::new(
            "ep",
            vec![
                Line::new("a", 1, "").with_next("B"),
                Line::new("b", 2, "").with_next("nowhere"),
            ],
        );
        let result = run(&episode, None);

        assert_eq!(result.error_count, 1);
        assert_eq!(result.issues[0].node_id.as_deref(), Some("b"));
    }

    #[test]
    fn assets_are_skipped_without_registry() {
        let episode = Episode::new(
            "ep",
            vec![Line::new("a", 1, "").with_portrait("bob").with_background("sky")],
        );
        assert!(run(&episode, None).is_clean());
    }

    #[test]
    fn unregistered_assets_are_warnings() {
        let mut registry = AssetRegistry::new();
        registry.register_portrait(PortraitTemplate::new("bob", "bob.png"));
        registry.register_anchor(0, Anchor::new("left", Vec3::ZERO));

        let episode = Episode::new(
            "ep",
            vec![
                Line::new("a", 1, "").with_portrait("Bob"),
                Line::new("b", 2, "")
                    .with_portrait("bob, eve")
                    .with_position(3)
                    .with_background("sky"),
            ],
        );
        let result = run(&episode, Some(&registry));

        assert_eq!(result.warning_count, 3);
        assert!(result.issues.iter().all(|issue| issue.index == Some(1)));
    }
}
