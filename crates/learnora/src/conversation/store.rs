use tracing::{debug, warn};

use super::{Conversation, ConversationId, Message};
use crate::storage::{StateStorage, ACTIVE_CONVERSATION_KEY, CONVERSATIONS_KEY};
use crate::{LearnoraError, Result};

/// Owns the conversation list and the active id, and writes both to storage
/// after every change.
///
/// The list is ordered most-recent-first and is never empty.
pub struct ConversationStore {
  conversations: Vec<Conversation>,
  active_id: ConversationId,
  storage: Box<dyn StateStorage>,
}

impl ConversationStore {
  /// Restore the store from storage.
  ///
  /// Missing, unreadable or degenerate state (no conversations, or a first
  /// conversation without messages) is replaced by a single fresh
  /// conversation.
  pub fn load(storage: Box<dyn StateStorage>) -> Self {
    let restored = match read_conversations(storage.as_ref()) {
      Ok(Some(list)) if is_usable(&list) => Some(list),
      Ok(Some(_)) => {
        debug!("stored conversations are empty, starting fresh");
        None
      }
      Ok(None) => None,
      Err(e) => {
        warn!("resetting conversation history: {e}");
        None
      }
    };

    match restored {
      Some(conversations) => {
        let active_id = read_active_id(storage.as_ref())
          .filter(|id| conversations.iter().any(|c| &c.id == id))
          .unwrap_or_else(|| conversations[0].id.clone());
        Self { conversations, active_id, storage }
      }
      None => {
        let fresh = Conversation::new();
        let mut store =
          Self { active_id: fresh.id.clone(), conversations: vec![fresh], storage };
        store.persist();
        store
      }
    }
  }

  pub fn conversations(&self) -> &[Conversation] {
    &self.conversations
  }

  pub fn len(&self) -> usize {
    self.conversations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.conversations.is_empty()
  }

  pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
    self.conversations.iter().find(|c| &c.id == id)
  }

  pub fn contains(&self, id: &ConversationId) -> bool {
    self.get(id).is_some()
  }

  pub fn active_id(&self) -> &ConversationId {
    &self.active_id
  }

  pub fn active_conversation(&self) -> Option<&Conversation> {
    self.get(&self.active_id)
  }

  /// Title of the active conversation; absent when the active id is stale
  pub fn active_title(&self) -> Option<&str> {
    self.active_conversation().map(|c| c.title.as_str())
  }

  /// Messages of the active conversation; empty when the active id is stale
  pub fn active_messages(&self) -> &[Message] {
    self.active_conversation().map(|c| c.messages.as_slice()).unwrap_or(&[])
  }

  /// Start a new conversation at the top of the list and make it active
  pub fn create_conversation(&mut self) -> Conversation {
    let conversation = Conversation::new();
    self.active_id = conversation.id.clone();
    self.conversations.insert(0, conversation.clone());
    self.persist();
    conversation
  }

  /// Make `id` active. Existence is not checked; reads fall back to an
  /// empty conversation until a valid id is selected.
  pub fn select_conversation(&mut self, id: &ConversationId) {
    self.active_id = id.clone();
    self.persist();
  }

  /// Remove a conversation. Returns false when the id is unknown.
  pub fn delete_conversation(&mut self, id: &ConversationId) -> bool {
    let Some(index) = self.conversations.iter().position(|c| &c.id == id) else {
      return false;
    };

    self.conversations.remove(index);
    if self.conversations.is_empty() {
      let fresh = Conversation::new();
      self.active_id = fresh.id.clone();
      self.conversations.push(fresh);
    }
    self.ensure_active();
    self.persist();
    true
  }

  /// Append to a conversation by id. Messages for unknown ids are dropped
  /// and false is returned.
  pub fn append_message(&mut self, id: &ConversationId, message: Message) -> bool {
    let Some(conversation) = self.conversations.iter_mut().find(|c| &c.id == id) else {
      debug!(conversation = %id, "dropping message for missing conversation");
      return false;
    };

    conversation.push(message);
    self.persist();
    true
  }

  /// Point the active id at the first conversation if it no longer resolves
  fn ensure_active(&mut self) {
    if !self.contains(&self.active_id) {
      if let Some(first) = self.conversations.first() {
        self.active_id = first.id.clone();
      }
    }
  }

  fn persist(&mut self) {
    if let Err(e) = self.try_persist() {
      warn!("failed to save conversations: {e}");
    }
  }

  fn try_persist(&mut self) -> Result<()> {
    let json = serde_json::to_string(&self.conversations)?;
    self.storage.write(CONVERSATIONS_KEY, &json)?;
    self.storage.write(ACTIVE_CONVERSATION_KEY, self.active_id.as_str())?;
    Ok(())
  }
}

fn read_conversations(storage: &dyn StateStorage) -> Result<Option<Vec<Conversation>>> {
  let Some(raw) = storage.read(CONVERSATIONS_KEY)? else {
    return Ok(None);
  };

  serde_json::from_str(&raw)
    .map(Some)
    .map_err(|e| LearnoraError::MalformedStoredState(e.to_string()))
}

fn read_active_id(storage: &dyn StateStorage) -> Option<ConversationId> {
  match storage.read(ACTIVE_CONVERSATION_KEY) {
    Ok(Some(raw)) if !raw.trim().is_empty() => Some(ConversationId::from(raw.trim())),
    Ok(_) => None,
    Err(e) => {
      debug!("could not read active conversation: {e}");
      None
    }
  }
}

fn is_usable(conversations: &[Conversation]) -> bool {
  conversations.first().is_some_and(|first| !first.messages.is_empty())
}
