//! File-backed episode repository

use kataribe::infrastructure::{EpisodeRepository, FileSystemEpisodeRepository, RepositoryError};
use kataribe::{PlaybackConfig, PlaybackController, PlaybackError, PlaybackPhase};
use kataribe::stage::{AssetRegistry, MemoryStage};
use std::path::PathBuf;

/// Fresh scratch directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kataribe-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const EPISODE: &str = r#"{
    "episodeId": "ep1",
    "lines": [
        {"nodeId": "a", "order": 1, "text": "Hi"},
        {"nodeId": "b", "order": 2, "text": "Bye"}
    ]
}"#;

#[tokio::test]
async fn loads_and_plays_episode_from_disk() {
    let dir = scratch_dir("load");
    std::fs::write(dir.join("ep1.json"), EPISODE).unwrap();

    let repository = FileSystemEpisodeRepository::new(&dir);
    assert!(repository.episode_exists("ep1").await.unwrap());
    let episode = repository.load_episode("ep1").await.unwrap();
    assert_eq!(episode.len(), 2);

    let mut controller = PlaybackController::new(
        MemoryStage::new(),
        AssetRegistry::new(),
        PlaybackConfig::default(),
    );
    controller.load(episode).unwrap();
    controller.begin(None).unwrap();
    assert_eq!(controller.phase(), PlaybackPhase::Presenting);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn lists_only_json_documents() {
    let dir = scratch_dir("list");
    std::fs::write(dir.join("ep2.json"), EPISODE).unwrap();
    std::fs::write(dir.join("ep1.json"), EPISODE).unwrap();
    std::fs::write(dir.join("notes.txt"), "not an episode").unwrap();

    let repository = FileSystemEpisodeRepository::new(&dir);
    assert_eq!(repository.list_episodes().await.unwrap(), ["ep1", "ep2"]);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn missing_and_malformed_episodes_fail() {
    let dir = scratch_dir("errors");
    std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
    std::fs::write(dir.join("empty.json"), r#"{"episodeId": "empty", "lines": []}"#).unwrap();

    let repository = FileSystemEpisodeRepository::new(&dir);

    assert!(!repository.episode_exists("nope").await.unwrap());
    let error = repository.load_episode("nope").await.unwrap_err();
    assert!(matches!(error, RepositoryError::NotFound { .. }));

    let error = repository.load_episode("broken").await.unwrap_err();
    assert!(matches!(
        PlaybackError::from(error),
        PlaybackError::ScriptParse { .. }
    ));

    let error = repository.load_episode("empty").await.unwrap_err();
    assert_eq!(PlaybackError::from(error), PlaybackError::empty_script("empty"));

    std::fs::remove_dir_all(dir).unwrap();
}
