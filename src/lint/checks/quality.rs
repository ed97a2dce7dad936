//! Production token and text checks

use crate::lint::{LintContext, LintIssue, LintLevel, LintResult};
use crate::production::tokenize;

/// Check for unknown production tokens and overlong text
pub fn check(ctx: &LintContext, result: &mut LintResult) {
    let quality = &ctx.config.quality;

    for (index, line) in ctx.episode.lines.iter().enumerate() {
        for token in tokenize(&line.production_key) {
            if !quality.known_effects.iter().any(|name| name == &token.name) {
                result.add_issue(
                    LintIssue::new(
                        LintLevel::Warning,
                        "quality",
                        format!("Unknown production effect '{}'", token.name),
                    )
                    .at(index, line),
                );
            }
        }

        let length = line.text.chars().count();
        if quality.max_text_length > 0 && length > quality.max_text_length {
            result.add_issue(
                LintIssue::new(
                    LintLevel::Info,
                    "quality",
                    format!(
                        "Text is {} characters (threshold: {})",
                        length, quality.max_text_length
                    ),
                )
                .at(index, line),
            );
        }
    }
}
