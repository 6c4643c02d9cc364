use classroom_assistant::application::ports::{AudioTranscoder, TranscodeError};
use classroom_assistant::domain::CANONICAL_SAMPLE_RATE;
use classroom_assistant::infrastructure::audio::SymphoniaTranscoder;
use classroom_assistant::infrastructure::audio::audio_decoder::decode_file_to_pcm;
use tempfile::TempDir;

use crate::helpers::{tone, write_wav};

#[tokio::test]
async fn given_stereo_cd_quality_wav_when_transcoding_then_writes_16k_mono_pcm16() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lecture.wav");
    let output = dir.path().join("canonical.wav");
    // half a second of interleaved stereo at 44.1 kHz
    write_wav(&input, 44_100, 2, &tone(44_100)).unwrap();

    SymphoniaTranscoder.transcode(&input, &output).await.unwrap();

    let reader = hound::WavReader::open(&output).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, CANONICAL_SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let expected = (0.5 * CANONICAL_SAMPLE_RATE as f64) as u32;
    assert!(reader.duration().abs_diff(expected) <= 16);
}

#[test]
fn given_canonical_wav_when_decoding_then_keeps_sample_count() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("already.wav");
    write_wav(&input, CANONICAL_SAMPLE_RATE, 1, &tone(3200)).unwrap();

    let samples = decode_file_to_pcm(&input).unwrap();

    assert_eq!(samples.len(), 3200);
    assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[tokio::test]
async fn given_garbage_bytes_when_transcoding_then_decoding_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.webm");
    let output = dir.path().join("out.wav");
    std::fs::write(&input, b"this is not a media container").unwrap();

    let err = SymphoniaTranscoder
        .transcode(&input, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, TranscodeError::DecodingFailed(_)));
    assert!(!output.exists());
}

#[tokio::test]
async fn given_missing_input_when_transcoding_then_io_error() {
    let dir = TempDir::new().unwrap();

    let err = SymphoniaTranscoder
        .transcode(&dir.path().join("nope.wav"), &dir.path().join("out.wav"))
        .await
        .unwrap_err();

    assert!(matches!(err, TranscodeError::Io(_)));
}
