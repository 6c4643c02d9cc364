mod candle_phi_generator;
mod mock_text_generator;
mod openai_completion_generator;
mod text_generator_factory;

pub use candle_phi_generator::CandlePhiGenerator;
pub use mock_text_generator::{MOCK_ANSWER, MockTextGenerator};
pub use openai_completion_generator::OpenAiCompletionGenerator;
pub use text_generator_factory::TextGeneratorFactory;
