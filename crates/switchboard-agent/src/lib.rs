//! Routing-and-continuity core for persona-scoped chat threads.
//!
//! A turn flows through three pieces:
//!
//! - [`PersonaExtractor`] infers a persona name from free text
//!   ("act like my mentor" → `mentor`).
//! - [`ThreadRouter`] resolves the message to an existing thread, a new
//!   thread, or the user's most recent one, and yields the [`Binding`] with
//!   the persona prompt fixed at that thread's creation.
//! - [`ConversationAssembler`] rebuilds the conversation from storage, calls
//!   the model and records the user/assistant pair.
//!
//! [`ChatAgent`] wires them together behind the inbound `chat` / `history`
//! operations; [`Session`] carries a binding across turns.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchboard_agent::ChatAgent;
//! use switchboard_llm::{ClientFactory, OpenAIConfig};
//! use switchboard_persist::MemoryPersistenceClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let agent = ChatAgent::builder()
//!     .store(Arc::new(MemoryPersistenceClient::new()))
//!     .chat_client(ClientFactory::create_chat_client(OpenAIConfig::new("sk-..."))?)
//!     .build()?;
//!
//! let turn = agent.chat("alice", "act like my mentor", None).await?;
//! assert_eq!(turn.thread_name, "mentor");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod assembler;
pub mod builder;
pub mod error;
pub mod extractor;
pub mod persona;
pub mod router;
pub mod session;

pub use agent::ChatAgent;
pub use assembler::ConversationAssembler;
pub use builder::ChatAgentBuilder;
pub use error::{ChatError, ErrorCategory, Result};
pub use extractor::{normalize_thread_name, PatternExtractor, PersonaExtractor};
pub use persona::{PersonaCatalog, BASE_PROMPT, DEFAULT_THREAD_NAME};
pub use router::{RouteRequest, RouteTier, ThreadRouter};
pub use session::Session;

pub use switchboard_types::{Binding, ChatTurn, LLMConfig, ThreadHistory, UserHistory};
