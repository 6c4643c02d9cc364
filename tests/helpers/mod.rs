use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;

use classroom_assistant::application::ports::{
    AudioTranscoder, ImageCaptioner, ImageCaptionerError, RecognitionError, SpeechRecognizer,
    TextGenerator, TextGeneratorError, TranscodeError,
};
use classroom_assistant::application::services::{
    AnswerService, CaptionService, TranscriptionService,
};
use classroom_assistant::domain::{CANONICAL_SAMPLE_RATE, PcmAudio, PixelGrid};
use classroom_assistant::presentation::AppState;

pub const GENERATED_ANSWER: &str = "Paris";
pub const BOUNDARY: &str = "classroom-test-boundary";

/// Echoes the prompt followed by [`GENERATED_ANSWER`], the way a causal LM
/// returns prompt + continuation.
#[derive(Default)]
pub struct RecordingTextGenerator {
    fail: bool,
    calls: Mutex<Vec<(String, usize)>>,
}

impl RecordingTextGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn token_budgets(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }
}

#[async_trait::async_trait]
impl TextGenerator for RecordingTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, TextGeneratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_new_tokens));
        if self.fail {
            return Err(TextGeneratorError::GenerationFailed(
                "model crashed".to_string(),
            ));
        }
        Ok(format!("{prompt} {GENERATED_ANSWER}"))
    }
}

pub struct FixedCaptioner {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_size: Mutex<Option<(u32, u32)>>,
}

impl FixedCaptioner {
    pub fn returning(caption: &str) -> Self {
        Self {
            outcome: Ok(caption.to_string()),
            calls: AtomicUsize::new(0),
            last_size: Mutex::new(None),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            outcome: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
            last_size: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_size(&self) -> Option<(u32, u32)> {
        *self.last_size.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ImageCaptioner for FixedCaptioner {
    async fn caption(
        &self,
        image: &PixelGrid,
        _max_new_tokens: usize,
    ) -> Result<String, ImageCaptionerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_size.lock().unwrap() = Some((image.width(), image.height()));
        self.outcome
            .clone()
            .map_err(ImageCaptionerError::InferenceFailed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscoderMode {
    /// A 16 kHz mono sine burst.
    Tone,
    /// 16 kHz mono, all zeros.
    Silence,
    /// A 44.1 kHz stereo file the service must refuse.
    WrongFormat,
    Fail,
}

/// A transcoder that takes its time, for callers that give up mid-conversion.
pub struct SlowTranscoder {
    delay: Duration,
    input_present: AtomicBool,
    finished: AtomicBool,
}

impl SlowTranscoder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            input_present: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    /// Whether the staged input still existed once the delay had passed.
    pub fn input_present(&self) -> bool {
        self.input_present.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AudioTranscoder for SlowTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::time::sleep(self.delay).await;
        self.input_present.store(input.exists(), Ordering::SeqCst);
        let written = write_wav(output, CANONICAL_SAMPLE_RATE, 1, &tone(1600))
            .map_err(|e| TranscodeError::EncodingFailed(e.to_string()));
        self.finished.store(true, Ordering::SeqCst);
        written
    }
}

/// Stands in for ffmpeg: records what it was handed and writes a WAV.
pub struct FakeTranscoder {
    mode: TranscoderMode,
    seen: Mutex<Vec<SeenInput>>,
}

#[derive(Debug, Clone)]
pub struct SeenInput {
    pub input: PathBuf,
    pub output: PathBuf,
    pub contents: Vec<u8>,
}

impl FakeTranscoder {
    pub fn new(mode: TranscoderMode) -> Self {
        Self {
            mode,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<SeenInput> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AudioTranscoder for FakeTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let contents = std::fs::read(input)?;
        self.seen.lock().unwrap().push(SeenInput {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            contents,
        });

        let written = match self.mode {
            TranscoderMode::Tone => write_wav(output, CANONICAL_SAMPLE_RATE, 1, &tone(1600)),
            TranscoderMode::Silence => write_wav(output, CANONICAL_SAMPLE_RATE, 1, &[0; 1600]),
            TranscoderMode::WrongFormat => write_wav(output, 44_100, 2, &tone(4410)),
            TranscoderMode::Fail => {
                // leave a partial output behind to prove it gets cleaned up
                std::fs::write(output, b"partial")?;
                return Err(TranscodeError::DecodingFailed(
                    "invalid data found when processing input".to_string(),
                ));
            }
        };
        written.map_err(|e| TranscodeError::EncodingFailed(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub enum RecognizerOutcome {
    Text(String),
    NotUnderstood,
    RequestFailed(String),
}

pub struct FakeRecognizer {
    outcome: RecognizerOutcome,
    received: Mutex<Vec<PcmAudio>>,
}

impl FakeRecognizer {
    pub fn new(outcome: RecognizerOutcome) -> Self {
        Self {
            outcome,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn hearing(text: &str) -> Self {
        Self::new(RecognizerOutcome::Text(text.to_string()))
    }

    pub fn received(&self) -> Vec<PcmAudio> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, audio: &PcmAudio) -> Result<String, RecognitionError> {
        self.received.lock().unwrap().push(audio.clone());
        match &self.outcome {
            RecognizerOutcome::Text(text) => Ok(text.clone()),
            RecognizerOutcome::NotUnderstood => Err(RecognitionError::NotUnderstood),
            RecognizerOutcome::RequestFailed(detail) => {
                Err(RecognitionError::RequestFailed(detail.clone()))
            }
        }
    }
}

pub fn tone(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| ((i as f32 * 0.2).sin() * 8000.0) as i16)
        .collect()
}

pub fn write_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    samples: &[i16],
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}

/// Files left behind in a scratch directory.
pub fn leftover_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
    Field {
        name: &'a str,
        value: &'a str,
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Field { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub struct TestDeps {
    pub generator: Arc<RecordingTextGenerator>,
    pub captioner: Arc<FixedCaptioner>,
    pub transcoder: Arc<FakeTranscoder>,
    pub recognizer: Arc<FakeRecognizer>,
    pub max_upload_bytes: usize,
}

impl Default for TestDeps {
    fn default() -> Self {
        Self {
            generator: Arc::new(RecordingTextGenerator::default()),
            captioner: Arc::new(FixedCaptioner::returning("a red square")),
            transcoder: Arc::new(FakeTranscoder::new(TranscoderMode::Tone)),
            recognizer: Arc::new(FakeRecognizer::hearing("hello class")),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl TestDeps {
    pub fn state(&self, scratch_dir: &Path, frontend_dir: &Path) -> AppState {
        AppState {
            answer_service: Arc::new(AnswerService::new(self.generator.clone())),
            caption_service: Arc::new(CaptionService::new(self.captioner.clone())),
            transcription_service: Arc::new(TranscriptionService::new(
                self.transcoder.clone(),
                self.recognizer.clone(),
                scratch_dir.to_path_buf(),
            )),
            frontend_dir: frontend_dir.to_path_buf(),
            max_upload_bytes: 8 * 1024 * 1024,
        }
    }
}
