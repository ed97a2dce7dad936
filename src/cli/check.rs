//! Lint an episode from the command line

use crate::lint::{LintConfig, LintResult, lint_with_config};
use crate::parser::parse_episode;
use crate::stage::AssetManifest;
use std::io::{self, Write};

/// Lint a source document, optionally against an asset manifest
pub fn run_check(source: &str, manifest: Option<AssetManifest>) -> anyhow::Result<LintResult> {
    let episode = parse_episode(source)?;
    let registry = manifest.map(AssetManifest::into_registry);
    Ok(lint_with_config(
        &episode,
        registry.as_ref(),
        &LintConfig::default(),
    ))
}

/// Print every issue followed by a one-line summary
pub fn print_report(result: &LintResult, out: &mut impl Write) -> io::Result<()> {
    for issue in &result.issues {
        writeln!(out, "{issue}")?;
    }
    writeln!(
        out,
        "{} errors, {} warnings, {} info",
        result.error_count, result.warning_count, result.info_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_dangling_branch() {
        let source = r#"{"episodeId": "ep", "lines": [{"nodeId": "a", "nextNode": "zzz"}]}"#;
        let result = run_check(source, None).unwrap();

        let mut out = Vec::new();
        print_report(&result, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(result.has_errors());
        assert!(out.contains("Next node 'zzz' does not exist"));
        assert!(out.ends_with("1 errors, 0 warnings, 0 info\n"));
    }

    #[test]
    fn manifest_enables_asset_checks() {
        let source = r#"{"episodeId": "ep", "lines": [{"nodeId": "a", "portraitKey": "eve"}]}"#;
        let manifest = AssetManifest::from_json(r#"{"portraits": [], "anchors": {}}"#).unwrap();

        let result = run_check(source, Some(manifest)).unwrap();
        assert_eq!(result.warning_count, 2);
    }

    #[test]
    fn malformed_source_is_an_error() {
        assert!(run_check("{", None).is_err());
    }
}
