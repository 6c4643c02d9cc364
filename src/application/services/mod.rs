mod answer_service;
mod caption_service;
mod temp_artifact;
mod transcription_service;

pub use answer_service::{
    ANSWER_MAX_NEW_TOKENS, AnswerError, AnswerService, build_prompt, extract_answer,
};
pub use caption_service::{CAPTION_MAX_NEW_TOKENS, CaptionError, CaptionService, decode_image};
pub use temp_artifact::{
    TEMP_INPUT_PREFIX, TEMP_OUTPUT_PREFIX, TempArtifact, materialize_input, output_path, temp_id,
};
pub use transcription_service::{TranscriptionError, TranscriptionService};
