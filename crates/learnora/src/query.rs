//! Submitting a query and delivering the bot's reply
//!
//! Each non-blank query appends a user message right away and spawns one task
//! that calls the backend, waits out the reply delay and appends exactly one
//! bot message to the conversation the query came from. The store lock is
//! never held across the request or the delay, so other conversations stay
//! usable while a reply is pending.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::conversation::{ConversationId, ConversationStore, Message};
use crate::error::FailureCategory;
use crate::search::SearchBackend;
use crate::LearnoraError;

pub type SharedStore = Arc<Mutex<ConversationStore>>;

pub struct QueryFlow {
  store: SharedStore,
  backend: Arc<dyn SearchBackend>,
  result_count: usize,
  reply_delay: Duration,
  in_flight: Arc<StdMutex<HashMap<ConversationId, usize>>>,
}

impl QueryFlow {
  pub fn new(store: SharedStore, backend: Arc<dyn SearchBackend>) -> Self {
    Self {
      store,
      backend,
      result_count: 25,
      reply_delay: Duration::from_millis(1000),
      in_flight: Arc::new(StdMutex::new(HashMap::new())),
    }
  }

  pub fn with_result_count(mut self, result_count: usize) -> Self {
    self.result_count = result_count;
    self
  }

  pub fn with_reply_delay(mut self, reply_delay: Duration) -> Self {
    self.reply_delay = reply_delay;
    self
  }

  pub fn store(&self) -> &SharedStore {
    &self.store
  }

  /// Whether a reply is still pending for the conversation
  pub fn is_awaiting_reply(&self, conversation_id: &ConversationId) -> bool {
    lock_counts(&self.in_flight).get(conversation_id).is_some_and(|n| *n > 0)
  }

  /// Send `query_text` on behalf of the user.
  ///
  /// Blank input is ignored and yields `None`. Otherwise the returned handle
  /// resolves to the reply once it has been appended, or to `None` when the
  /// conversation was deleted in the meantime. Callers are free to ignore it.
  pub async fn submit_query(
    &self,
    conversation_id: &ConversationId,
    query_text: &str,
  ) -> Option<JoinHandle<Option<Message>>> {
    let query = query_text.trim();
    if query.is_empty() {
      return None;
    }

    if !self.store.lock().await.append_message(conversation_id, Message::user(query)) {
      debug!(conversation = %conversation_id, "query sent to missing conversation");
    }

    begin(&self.in_flight, conversation_id);

    let store = Arc::clone(&self.store);
    let backend = Arc::clone(&self.backend);
    let in_flight = Arc::clone(&self.in_flight);
    let conversation_id = conversation_id.clone();
    let query = query.to_string();
    let result_count = self.result_count;
    let reply_delay = self.reply_delay;

    Some(tokio::spawn(async move {
      let reply = match backend.fetch_roadmap(&query, result_count).await {
        Ok(payload) => Message::roadmap(payload),
        Err(e) => {
          warn!(%query, "search failed: {e}");
          failure_message(&e, backend.base_url())
        }
      };

      if !reply_delay.is_zero() {
        tokio::time::sleep(reply_delay).await;
      }

      let delivered = store.lock().await.append_message(&conversation_id, reply.clone());
      finish(&in_flight, &conversation_id);

      if delivered {
        Some(reply)
      } else {
        debug!(conversation = %conversation_id, "reply dropped, conversation was deleted");
        None
      }
    }))
  }
}

/// Bot message describing a failed search, tagged with its category
pub fn failure_message(error: &LearnoraError, base_url: &str) -> Message {
  let category = error.category();
  Message::failure(diagnostic_text(category, error, base_url), category)
}

pub fn diagnostic_text(category: FailureCategory, error: &LearnoraError, base_url: &str) -> String {
  match category {
    FailureCategory::NotFound => format!(
      "The backend server endpoint was not found. Please make sure the backend server is running on {base_url} and the /api/fishbone endpoint is available. Error details: {error}"
    ),
    FailureCategory::Unreachable => format!(
      "Unable to connect to the backend server. Please make sure the backend server is running on {base_url}."
    ),
    FailureCategory::ServerError => {
      format!("{error}. Please check if the backend server is running correctly.")
    }
    FailureCategory::Unknown => "I'm having trouble connecting to the search service right now. Please try again in a moment.".to_string(),
  }
}

fn lock_counts(
  counts: &StdMutex<HashMap<ConversationId, usize>>,
) -> std::sync::MutexGuard<'_, HashMap<ConversationId, usize>> {
  counts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn begin(counts: &StdMutex<HashMap<ConversationId, usize>>, id: &ConversationId) {
  *lock_counts(counts).entry(id.clone()).or_insert(0) += 1;
}

fn finish(counts: &StdMutex<HashMap<ConversationId, usize>>, id: &ConversationId) {
  let mut counts = lock_counts(counts);
  if let Some(n) = counts.get_mut(id) {
    *n = n.saturating_sub(1);
    if *n == 0 {
      counts.remove(id);
    }
  }
}
