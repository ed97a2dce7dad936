//! Episode repositories

use crate::error::PlaybackError;
use crate::parser::parse_episode_bytes;
use crate::types::script::Episode;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// File extension of stored episode documents
pub const EPISODE_EXTENSION: &str = "json";

/// Source of episode documents keyed by episode id
#[async_trait]
pub trait EpisodeRepository: Send + Sync {
    /// Load and parse an episode
    async fn load_episode(&self, episode_id: &str) -> Result<Episode, RepositoryError>;

    /// Check if an episode exists
    async fn episode_exists(&self, episode_id: &str) -> Result<bool, RepositoryError>;

    /// List all available episode ids, sorted
    async fn list_episodes(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Episode not found: {episode_id}")]
    NotFound { episode_id: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Invalid episode format: {source}")]
    InvalidFormat {
        #[from]
        source: PlaybackError,
    },
}

impl RepositoryError {
    pub fn not_found(episode_id: impl Into<String>) -> Self {
        Self::NotFound {
            episode_id: episode_id.into(),
        }
    }
}

impl From<RepositoryError> for PlaybackError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::InvalidFormat { source } => source,
            other => PlaybackError::io(other.to_string()),
        }
    }
}

/// Reads `<base>/<episode_id>.json`
pub struct FileSystemEpisodeRepository {
    base_path: PathBuf,
}

impl FileSystemEpisodeRepository {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn episode_path(&self, episode_id: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", episode_id.trim(), EPISODE_EXTENSION))
    }
}

#[async_trait]
impl EpisodeRepository for FileSystemEpisodeRepository {
    async fn load_episode(&self, episode_id: &str) -> Result<Episode, RepositoryError> {
        let path = self.episode_path(episode_id);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::not_found(episode_id));
            }
            Err(e) => {
                return Err(RepositoryError::Io {
                    message: format!("Failed to read episode file {}: {}", path.display(), e),
                });
            }
        };

        log::debug!("[Repository] Read {} ({} bytes)", path.display(), content.len());
        Ok(parse_episode_bytes(&content)?)
    }

    async fn episode_exists(&self, episode_id: &str) -> Result<bool, RepositoryError> {
        tokio::fs::try_exists(self.episode_path(episode_id))
            .await
            .map_err(|e| RepositoryError::Io {
                message: format!("Failed to check episode {episode_id}: {e}"),
            })
    }

    async fn list_episodes(&self) -> Result<Vec<String>, RepositoryError> {
        let mut episodes = Vec::new();

        let mut entries =
            tokio::fs::read_dir(&self.base_path)
                .await
                .map_err(|e| RepositoryError::Io {
                    message: format!(
                        "Failed to read directory {}: {}",
                        self.base_path.display(),
                        e
                    ),
                })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::Io {
                message: format!("Failed to read directory entry: {e}"),
            })?
        {
            let path = entry.path();
            if let Some(extension) = path.extension().and_then(|ext| ext.to_str())
                && extension.eq_ignore_ascii_case(EPISODE_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                episodes.push(stem.to_string());
            }
        }

        episodes.sort();
        Ok(episodes)
    }
}

/// In-memory implementation for testing
#[derive(Default)]
pub struct InMemoryEpisodeRepository {
    episodes: HashMap<String, Episode>,
}

impl InMemoryEpisodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.insert(episode.episode_id.clone(), episode);
    }
}

#[async_trait]
impl EpisodeRepository for InMemoryEpisodeRepository {
    async fn load_episode(&self, episode_id: &str) -> Result<Episode, RepositoryError> {
        self.episodes
            .get(episode_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(episode_id))
    }

    async fn episode_exists(&self, episode_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.episodes.contains_key(episode_id))
    }

    async fn list_episodes(&self) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self.episodes.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
