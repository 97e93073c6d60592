pub mod openai;

pub use openai::{OpenAiChatModel, OpenAiConfig, OpenAiEmbedder, DEFAULT_API_BASE};
