//! Tests for the parser module

use super::*;

#[test]
fn parse_minimal_episode() {
    let json = r#"{
        "episodeId": "ep1",
        "lines": [
            { "nodeId": "a", "order": 0, "speaker": "Bob", "text": "Hi" },
            { "nodeId": "b", "order": 1, "text": "Bye" }
        ]
    }"#;

    let episode = parse_episode(json).unwrap();
    assert_eq!(episode.episode_id, "ep1");
    assert_eq!(episode.lines.len(), 2);
    assert_eq!(episode.lines[0].speaker, "Bob");
    assert_eq!(episode.lines[1].speaker, "");
    assert_eq!(episode.lines[1].text, "Bye");
}

#[test]
fn parse_empty_line_list_is_empty_script() {
    let json = r#"{ "episodeId": "ep1", "lines": [] }"#;

    match parse_episode(json) {
        Err(PlaybackError::EmptyScript { episode_id }) => assert_eq!(episode_id, "ep1"),
        other => panic!("Expected EmptyScript, got {:?}", other),
    }
}

#[test]
fn parse_missing_lines_is_empty_script() {
    let json = r#"{ "episodeId": "ep1" }"#;
    assert!(matches!(
        parse_episode(json),
        Err(PlaybackError::EmptyScript { .. })
    ));
}

#[test]
fn parse_malformed_json_is_parse_error() {
    let json = r#"{ "episodeId": "ep1", "lines": [ { "nodeId": 5 } ] }"#;
    assert!(matches!(
        parse_episode(json),
        Err(PlaybackError::ScriptParse { .. })
    ));

    assert!(matches!(
        parse_episode("not json"),
        Err(PlaybackError::ScriptParse { .. })
    ));
}

#[test]
fn parse_bytes_rejects_invalid_utf8() {
    let bytes = [0xff, 0xfe, 0x00];
    assert!(matches!(
        parse_episode_bytes(&bytes),
        Err(PlaybackError::ScriptParse { .. })
    ));
}

#[test]
fn parse_bytes_accepts_multibyte_text() {
    let json = r#"{ "episodeId": "ep", "lines": [ { "nodeId": "a", "text": "こんにちは" } ] }"#;
    let episode = parse_episode_bytes(json.as_bytes()).unwrap();
    assert_eq!(episode.lines[0].text, "こんにちは");
}
