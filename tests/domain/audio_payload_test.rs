use classroom_assistant::domain::{AudioPayload, DEFAULT_AUDIO_EXTENSION};

fn named(filename: &str) -> AudioPayload {
    AudioPayload::new(vec![1, 2, 3], Some(filename.to_string()))
}

#[test]
fn given_filename_with_extension_when_deriving_then_lowercases_it() {
    assert_eq!(named("Lecture.M4A").extension(), "m4a");
}

#[test]
fn given_filename_with_several_dots_when_deriving_then_uses_last_segment() {
    assert_eq!(named("week.3.recording.ogg").extension(), "ogg");
}

#[test]
fn given_filename_without_extension_when_deriving_then_defaults_to_webm() {
    assert_eq!(named("blob").extension(), DEFAULT_AUDIO_EXTENSION);
    assert_eq!(AudioPayload::new(vec![1], None).extension(), "webm");
}

#[test]
fn given_extension_with_path_characters_when_deriving_then_defaults_to_webm() {
    assert_eq!(named("clip.w/a v").extension(), "webm");
}

#[test]
fn given_no_bytes_when_checking_then_is_empty() {
    assert!(AudioPayload::new(Vec::new(), Some("a.wav".to_string())).is_empty());
    assert!(!named("a.wav").is_empty());
}
