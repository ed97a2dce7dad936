//! Node id checks

use crate::lint::{LintContext, LintIssue, LintLevel, LintResult};
use crate::runtime::index::node_key;
use std::collections::HashMap;

/// Check for empty and duplicate node ids
pub fn check(ctx: &LintContext, result: &mut LintResult) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, line) in ctx.episode.lines.iter().enumerate() {
        if line.node_id.trim().is_empty() {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Warning,
                    "syntax",
                    "Line has an empty node id and will be skipped",
                )
                .at(index, line),
            );
            continue;
        }

        if let Some(first) = seen.insert(node_key(&line.node_id), index) {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Warning,
                    "syntax",
                    format!(
                        "Duplicate node id '{}' (also on line {})",
                        line.node_id,
                        first + 1
                    ),
                )
                .at(index, line),
            );
        }
    }
}
