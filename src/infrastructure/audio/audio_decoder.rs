use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioTranscoder, TranscodeError};
use crate::domain::CANONICAL_SAMPLE_RATE;

/// Pure Rust transcoder: symphonia demux/decode, rubato resampling, hound
/// WAV output. Covers wav, mp3, flac, ogg/vorbis, aac/m4a and mkv/webm with
/// codecs symphonia ships; Opus needs [`super::FfmpegTranscoder`].
pub struct SymphoniaTranscoder;

#[async_trait]
impl AudioTranscoder for SymphoniaTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let input = input.to_path_buf();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || transcode_file(&input, &output))
            .await
            .map_err(|e| TranscodeError::DecodingFailed(format!("task join error: {e}")))?
    }
}

fn transcode_file(input: &Path, output: &Path) -> Result<(), TranscodeError> {
    let samples = decode_file_to_pcm(input)?;
    write_pcm16_wav(output, &samples)
}

/// Decodes `path` to 16 kHz mono f32 samples. The file extension is passed to
/// the prober as a container hint.
pub fn decode_file_to_pcm(path: &Path) -> Result<Vec<f32>, TranscodeError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscodeError::DecodingFailed(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| TranscodeError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| TranscodeError::DecodingFailed("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| TranscodeError::DecodingFailed(format!("codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(TranscodeError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(TranscodeError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }
        let channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            for frame in samples.chunks(channels) {
                mono.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            mono.extend_from_slice(samples);
        }
    }

    if mono.is_empty() {
        return Err(TranscodeError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    if source_rate != CANONICAL_SAMPLE_RATE {
        mono = resample(&mono, source_rate, CANONICAL_SAMPLE_RATE)?;
    }

    tracing::debug!(
        source_rate,
        samples = mono.len(),
        duration_secs = mono.len() as f32 / CANONICAL_SAMPLE_RATE as f32,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(mono)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, TranscodeError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| TranscodeError::ResamplingFailed(format!("init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| TranscodeError::ResamplingFailed(e.to_string()))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // padding of the last chunk overshoots
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}

pub fn write_pcm16_wav(path: &Path, samples: &[f32]) -> Result<(), TranscodeError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: CANONICAL_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| TranscodeError::EncodingFailed(e.to_string()))?;

    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| TranscodeError::EncodingFailed(e.to_string()))?;
    }

    writer
        .finalize()
        .map_err(|e| TranscodeError::EncodingFailed(e.to_string()))
}
