//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, an extensible
//! tool system and per-session conversation memory.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └──────┬──────┘  └─────────────┘  └─────────────────────┘  │
//! │         │                                                    │
//! │  ┌──────┴──────┐                                             │
//! │  │ SessionStore│                                             │
//! │  └─────────────┘                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping chat backends without changing
//! agent logic; `EmbeddingProvider` does the same for retrieval tools.

pub mod provider;
pub mod tool;
pub mod reasoning;
pub mod message;
pub mod error;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{EmbeddingProvider, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolResult, ToolRegistry, ToolSchema};
