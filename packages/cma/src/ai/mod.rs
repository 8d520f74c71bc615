//! Reference text-generation implementations.

pub mod openai;

pub use openai::OpenAiTextGenerator;
