//! Lookup structures built from a loaded episode

use crate::error::{Diagnostic, Diagnostics, PlaybackError};
use crate::types::script::{Episode, Line};
use std::collections::HashMap;

/// Normalized form of a node id used as a map key
pub fn node_key(node_id: &str) -> String {
    node_id.trim().to_lowercase()
}

/// An episode indexed for playback
///
/// Lines are held in sequence order (stable sort on `order`). Node ids are
/// matched case-insensitively; when two lines share an id the one indexed
/// later in sequence order wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptIndex {
    episode_id: String,
    sequence: Vec<Line>,
    positions: HashMap<String, usize>,
}

impl ScriptIndex {
    /// Index an episode, reporting skipped and duplicate lines
    pub fn build(episode: Episode, diagnostics: &mut Diagnostics) -> Result<Self, PlaybackError> {
        let Episode { episode_id, lines } = episode;

        let mut sequence = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            if line.node_id.trim().is_empty() {
                diagnostics.report(Diagnostic::EmptyNodeId { index });
                continue;
            }
            sequence.push(line);
        }

        if sequence.is_empty() {
            return Err(PlaybackError::empty_script(episode_id));
        }

        // Vec::sort_by_key is stable, so ties keep authoring order
        sequence.sort_by_key(|line| line.order);

        let mut positions = HashMap::with_capacity(sequence.len());
        for (position, line) in sequence.iter().enumerate() {
            if positions.insert(node_key(&line.node_id), position).is_some() {
                diagnostics.report(Diagnostic::DuplicateNode {
                    node_id: line.node_id.clone(),
                });
            }
        }

        log::debug!(
            "[Index] Indexed episode '{}': {} lines, {} distinct nodes",
            episode_id,
            sequence.len(),
            positions.len()
        );

        Ok(Self {
            episode_id,
            sequence,
            positions,
        })
    }

    pub fn episode_id(&self) -> &str {
        &self.episode_id
    }

    /// Lines in sequence order
    pub fn lines(&self) -> &[Line] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Look up a line by node id (case-insensitive)
    pub fn get(&self, node_id: &str) -> Option<&Line> {
        self.position_of(node_id)
            .and_then(|position| self.sequence.get(position))
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.positions.contains_key(&node_key(node_id))
    }

    /// Sequence position recorded for a node id
    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.positions.get(&node_key(node_id)).copied()
    }

    pub fn line_at(&self, position: usize) -> Option<&Line> {
        self.sequence.get(position)
    }

    pub fn first(&self) -> Option<&Line> {
        self.sequence.first()
    }

    /// The explicit start node when it resolves, otherwise the first line
    pub fn start_line(&self, start_node: Option<&str>) -> Option<&Line> {
        let explicit = start_node
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .and_then(|node| {
                let line = self.get(node);
                if line.is_none() {
                    log::warn!("[Index] Start node '{node}' not found, using first line");
                }
                line
            });
        explicit.or_else(|| self.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: Vec<Line>) -> (Result<ScriptIndex, PlaybackError>, Vec<Diagnostic>) {
        let mut diagnostics = Diagnostics::new();
        let result = ScriptIndex::build(Episode::new("ep", lines), &mut diagnostics);
        (result, diagnostics.take())
    }

    #[test]
    fn sequence_is_sorted_by_order_and_stable_on_ties() {
        let (index, _) = build(vec![
            Line::new("c", 5, ""),
            Line::new("a", 1, ""),
            Line::new("b1", 3, ""),
            Line::new("b2", 3, ""),
        ]);
        let index = index.unwrap();
        let nodes: Vec<&str> = index.lines().iter().map(|l| l.node_id.as_str()).collect();
        assert_eq!(nodes, vec!["a", "b1", "b2", "c"]);
        assert_eq!(index.position_of("b2"), Some(2));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (index, _) = build(vec![Line::new("Intro", 0, "hello")]);
        let index = index.unwrap();
        assert_eq!(index.get("INTRO").unwrap().text, "hello");
        assert!(index.contains(" intro "));
    }

    #[test]
    fn empty_node_ids_are_skipped_with_diagnostic() {
        let (index, diagnostics) = build(vec![Line::new("  ", 0, ""), Line::new("a", 1, "")]);
        assert_eq!(index.unwrap().len(), 1);
        assert_eq!(diagnostics, vec![Diagnostic::EmptyNodeId { index: 0 }]);
    }

    #[test]
    fn only_invalid_lines_is_empty_script() {
        let (index, _) = build(vec![Line::new("", 0, "")]);
        assert!(matches!(index, Err(PlaybackError::EmptyScript { .. })));

        let (index, _) = build(vec![]);
        assert!(matches!(index, Err(PlaybackError::EmptyScript { .. })));
    }

    #[test]
    fn duplicate_node_ids_resolve_to_last_indexed() {
        let (index, diagnostics) = build(vec![
            Line::new("dup", 0, "first"),
            Line::new("other", 1, ""),
            Line::new("DUP", 2, "second"),
        ]);
        let index = index.unwrap();
        assert_eq!(index.get("dup").unwrap().text, "second");
        assert_eq!(index.position_of("dup"), Some(2));
        assert_eq!(index.len(), 3);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::DuplicateNode {
                node_id: "DUP".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_resolution_follows_sorted_order_not_authoring_order() {
        let (index, _) = build(vec![
            Line::new("dup", 9, "authored first, sorted last"),
            Line::new("dup", 1, "authored last, sorted first"),
        ]);
        assert_eq!(
            index.unwrap().get("dup").unwrap().text,
            "authored first, sorted last"
        );
    }

    #[test]
    fn start_line_prefers_valid_explicit_node() {
        let (index, _) = build(vec![Line::new("a", 0, ""), Line::new("b", 1, "")]);
        let index = index.unwrap();
        assert_eq!(index.start_line(Some("b")).unwrap().node_id, "b");
        assert_eq!(index.start_line(Some("missing")).unwrap().node_id, "a");
        assert_eq!(index.start_line(Some("")).unwrap().node_id, "a");
        assert_eq!(index.start_line(None).unwrap().node_id, "a");
    }
}
