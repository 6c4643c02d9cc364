use std::io::Cursor;

use classroom_assistant::domain::{CANONICAL_SAMPLE_RATE, PcmAudio};
use classroom_assistant::infrastructure::audio::encode_wav;

#[test]
fn given_pcm_record_when_encoding_upload_then_wav_round_trips_samples() {
    let pcm = PcmAudio::new(CANONICAL_SAMPLE_RATE, vec![0, 100, -100, i16::MAX, i16::MIN]);

    let bytes = encode_wav(&pcm).unwrap();

    assert_eq!(&bytes[..4], b"RIFF");
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, CANONICAL_SAMPLE_RATE);
    assert_eq!(reader.spec().channels, 1);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, pcm.samples);
}
