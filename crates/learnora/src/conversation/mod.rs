use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FailureCategory;
use crate::roadmap::RoadmapPayload;

pub mod store;

pub use store::ConversationStore;

/// Title every conversation carries until its first user message arrives
pub const PLACEHOLDER_TITLE: &str = "New Chat";

const MAX_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
  pub fn generate() -> Self {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Self(format!("conv_{}_{}", millis, &suffix[..9]))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ConversationId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ConversationId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl fmt::Display for ConversationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
  User,
  Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub sender: Sender,
  pub text: String,
  pub timestamp: DateTime<Utc>,
  #[serde(default, alias = "fishboneData", skip_serializing_if = "Option::is_none")]
  pub result_payload: Option<RoadmapPayload>,
  /// Set on bot replies that describe a failed search
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub failure: Option<FailureCategory>,
}

impl Message {
  pub fn user(text: impl Into<String>) -> Self {
    Self::new(Sender::User, text.into())
  }

  pub fn bot(text: impl Into<String>) -> Self {
    Self::new(Sender::Bot, text.into())
  }

  pub fn roadmap(payload: RoadmapPayload) -> Self {
    let mut message = Self::bot(payload.summary());
    message.result_payload = Some(payload);
    message
  }

  pub fn failure(text: impl Into<String>, category: FailureCategory) -> Self {
    let mut message = Self::bot(text);
    message.failure = Some(category);
    message
  }

  fn new(sender: Sender, text: String) -> Self {
    Self { sender, text, timestamp: Utc::now(), result_payload: None, failure: None }
  }

  pub fn is_user(&self) -> bool {
    self.sender == Sender::User
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
  pub id: ConversationId,
  pub title: String,
  #[serde(default)]
  pub messages: Vec<Message>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Default for Conversation {
  fn default() -> Self {
    Self::new()
  }
}

impl Conversation {
  pub fn new() -> Self {
    let now = Utc::now();
    Self {
      id: ConversationId::generate(),
      title: PLACEHOLDER_TITLE.to_string(),
      messages: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn has_placeholder_title(&self) -> bool {
    self.title == PLACEHOLDER_TITLE
  }

  /// Append a message, naming the conversation after its first user message
  pub fn push(&mut self, message: Message) {
    let first_user_message = message.is_user() && !self.messages.iter().any(Message::is_user);
    if first_user_message && self.has_placeholder_title() {
      self.title = derive_title(&message.text);
    }

    self.messages.push(message);
    self.updated_at = Utc::now();
  }
}

/// Title from message text: at most 50 characters, ellipsis when cut
pub fn derive_title(text: &str) -> String {
  if text.chars().count() > MAX_TITLE_CHARS {
    let head: String = text.chars().take(MAX_TITLE_CHARS).collect();
    format!("{head}...")
  } else {
    text.to_string()
  }
}
