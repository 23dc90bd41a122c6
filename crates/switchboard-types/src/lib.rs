pub mod binding;
pub mod config;
pub mod history;

pub use binding::{Binding, ChatTurn, MessageRole};
pub use config::LLMConfig;
pub use history::{HistoryMessage, ThreadHistory, UserHistory};
