//! JSON parser for episode documents
//!
//! This module turns the JSON produced by the authoring pipeline into an
//! [`Episode`]. It never leaves partial results behind: either a complete
//! episode is returned or an error is.

use crate::error::PlaybackError;
use crate::types::script::Episode;

#[cfg(test)]
mod tests;

/// Parse an episode document from text
pub fn parse_episode(source: &str) -> Result<Episode, PlaybackError> {
    let episode: Episode = serde_json::from_str(source)?;

    if episode.lines.is_empty() {
        return Err(PlaybackError::empty_script(episode.episode_id));
    }

    log::debug!(
        "[Parser] Parsed episode '{}' with {} lines",
        episode.episode_id,
        episode.lines.len()
    );
    Ok(episode)
}

/// Parse an episode document from raw bytes
pub fn parse_episode_bytes(bytes: &[u8]) -> Result<Episode, PlaybackError> {
    let source = std::str::from_utf8(bytes)
        .map_err(|e| PlaybackError::script_parse(format!("script is not valid UTF-8: {e}")))?;
    parse_episode(source)
}
