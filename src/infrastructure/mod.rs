pub mod audio;
pub mod llm;
pub mod model_source;
pub mod observability;
pub mod vision;
