use std::collections::HashSet;

use classroom_assistant::application::services::{
    TEMP_INPUT_PREFIX, TempArtifact, materialize_input, output_path, temp_id,
};
use tempfile::TempDir;

#[test]
fn given_generated_ids_when_inspected_then_are_eight_hex_chars_and_distinct() {
    let ids: HashSet<String> = (0..64).map(|_| temp_id()).collect();

    assert_eq!(ids.len(), 64);
    assert!(
        ids.iter()
            .all(|id| id.len() == 8 && id.chars().all(|c| c.is_ascii_hexdigit()))
    );
}

#[test]
fn given_existing_file_when_guard_dropped_then_file_is_removed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("temp_output_deadbeef.wav");
    std::fs::write(&path, b"data").unwrap();

    drop(TempArtifact::new(path.clone()));

    assert!(!path.exists());
}

#[test]
fn given_missing_file_when_guard_dropped_then_nothing_happens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never_written.wav");

    drop(TempArtifact::new(path.clone()));

    assert!(!path.exists());
}

#[test]
fn given_id_when_building_output_path_then_uses_wav_extension() {
    let dir = TempDir::new().unwrap();

    let path = output_path(dir.path(), "0badf00d");

    assert_eq!(path, dir.path().join("temp_output_0badf00d.wav"));
}

#[tokio::test]
async fn given_bytes_when_materializing_then_writes_prefixed_file_until_guard_dropped() {
    let dir = TempDir::new().unwrap();
    let scratch = dir.path().join("nested");

    let (id, artifact) = materialize_input(&scratch, "mp3", b"abc").await.unwrap();
    let path = artifact.path().to_path_buf();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("{TEMP_INPUT_PREFIX}{id}.mp3")
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");

    drop(artifact);
    assert!(!path.exists());
}
