//! Learnora: ask a learning question, get back a roadmap of articles and
//! videos, and keep the conversation history on disk.

pub mod commands;
pub mod config;
pub mod conversation;
pub mod display;
pub mod error;
pub mod output;
pub mod query;
pub mod render;
pub mod roadmap;
pub mod search;
pub mod storage;

// Re-export commonly used types for easier testing
pub use conversation::{Conversation, ConversationId, ConversationStore, Message, Sender};
pub use error::{FailureCategory, LearnoraError, Result};
pub use query::QueryFlow;
pub use render::{render_segments, Segment};
pub use roadmap::{Resource, ResourceId, RoadmapPayload};
