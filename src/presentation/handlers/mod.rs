mod error_response;
mod health;
mod image_caption;
mod image_qna;
mod multipart_form;
mod qna;
mod speech_to_text;

pub use error_response::{ErrorResponse, error_response};
pub use health::health_handler;
pub use image_caption::{NO_IMAGE_MESSAGE, image_caption_handler};
pub use image_qna::{IMAGE_AND_QUESTION_MESSAGE, image_qna_handler};
pub use multipart_form::{MultipartForm, UploadedFile};
pub use qna::{NO_QUESTION_MESSAGE, qna_handler};
pub use speech_to_text::{NO_AUDIO_MESSAGE, NO_SELECTED_FILE_MESSAGE, speech_to_text_handler};
