//! Reachability analysis

use crate::lint::{LintContext, LintIssue, LintLevel, LintResult};
use crate::runtime::index::node_key;
use crate::types::script::Line;
use std::collections::{HashMap, VecDeque};

/// Check for lines no playback path reaches from the first line
pub fn check(ctx: &LintContext, result: &mut LintResult) {
    if ctx.config.flow.check_unreachable {
        check_unreachable(ctx, result);
    }
}

fn check_unreachable(ctx: &LintContext, result: &mut LintResult) {
    // Same order and lookup rules the playback index uses
    let mut sequence: Vec<(usize, &Line)> = ctx
        .episode
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.node_id.trim().is_empty())
        .collect();
    sequence.sort_by_key(|(_, line)| line.order);

    if sequence.is_empty() {
        return;
    }

    let positions: HashMap<String, usize> = sequence
        .iter()
        .enumerate()
        .map(|(position, (_, line))| (node_key(&line.node_id), position))
        .collect();

    let mut reachable = vec![false; sequence.len()];
    let mut queue = VecDeque::new();
    reachable[0] = true;
    queue.push_back(0);

    while let Some(position) = queue.pop_front() {
        let (_, line) = sequence[position];
        let explicit = line
            .explicit_next()
            .and_then(|next| positions.get(&node_key(next)).copied());
        let next = explicit.or_else(|| (position + 1 < sequence.len()).then_some(position + 1));

        if let Some(next) = next
            && !reachable[next]
        {
            reachable[next] = true;
            queue.push_back(next);
        }
    }

    for (position, (index, line)) in sequence.iter().enumerate() {
        if !reachable[position] {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Warning,
                    "flow",
                    "Line is unreachable from the first line",
                )
                .at(*index, line),
            );
        }
    }
}
