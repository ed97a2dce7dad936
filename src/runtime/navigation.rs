//! Next-line resolution

use crate::runtime::index::ScriptIndex;
use crate::types::script::Line;

/// Resolve the line that follows `current`
///
/// An explicit `nextNode` that resolves wins over sequence order. Otherwise
/// playback falls through to the next line in sequence. `None` means the
/// episode is over. Backward branches are legal and loop.
pub fn resolve_next<'a>(index: &'a ScriptIndex, current: &Line) -> Option<&'a Line> {
    if let Some(next) = current.explicit_next() {
        if let Some(line) = index.get(next) {
            log::debug!(
                "[Branch] '{}' -> '{}' (explicit)",
                current.node_id,
                line.node_id
            );
            return Some(line);
        }
        log::warn!(
            "[Branch] '{}' names unknown next node '{}', falling through",
            current.node_id,
            next
        );
    }

    let position = index.position_of(&current.node_id)?;
    let line = index.line_at(position + 1)?;
    log::trace!("[Flow] '{}' -> '{}'", current.node_id, line.node_id);
    Some(line)
}
