use classroom_assistant::domain::{CANONICAL_SAMPLE_RATE, PcmAudio};

#[test]
fn given_one_second_of_samples_when_measuring_then_duration_is_one() {
    let pcm = PcmAudio::new(CANONICAL_SAMPLE_RATE, vec![0; 16_000]);

    assert!((pcm.duration_secs() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn given_samples_when_serializing_then_emits_little_endian_pairs() {
    let pcm = PcmAudio::new(CANONICAL_SAMPLE_RATE, vec![1, -2, 0x1234]);

    assert_eq!(pcm.to_le_bytes(), vec![0x01, 0x00, 0xFE, 0xFF, 0x34, 0x12]);
}
