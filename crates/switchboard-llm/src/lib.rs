pub mod types;
pub mod traits;
pub mod openai;
pub mod config;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};
pub use openai::OpenAIClient;
pub use config::{ClientFactory, OpenAIConfig};
pub use types::{Message, Content, ContentPart};
