use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{self, Settings};
use crate::conversation::{ConversationId, ConversationStore};
use crate::query::{QueryFlow, SharedStore};
use crate::search::{ClientConfig, HttpSearchClient, SearchBackend};
use crate::storage::FileStorage;

pub mod ask;
pub mod chat;
pub mod delete;
pub mod health;
pub mod list;
pub mod profile;
pub mod show;
pub mod switch;

/// Overrides collected from command-line flags
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
  pub api_url: Option<String>,
  pub data_dir: Option<PathBuf>,
  pub reply_delay_ms: Option<u64>,
}

/// Everything a command needs: settings, the loaded store and the query flow
pub struct Workspace {
  pub settings: Settings,
  pub data_dir: PathBuf,
  pub backend: Arc<dyn SearchBackend>,
  pub flow: QueryFlow,
}

impl Workspace {
  pub fn open(options: &GlobalOptions) -> Result<Self> {
    let data_dir = options.data_dir.clone().unwrap_or_else(config::data_dir);
    let mut settings = Settings::load(&data_dir)
      .with_context(|| format!("Failed to read settings from {}", data_dir.display()))?;

    if let Some(api_url) = &options.api_url {
      settings.api_url = api_url.clone();
    }
    if let Some(delay) = options.reply_delay_ms {
      settings.reply_delay_ms = delay;
    }

    let backend: Arc<dyn SearchBackend> = Arc::new(HttpSearchClient::with_config(ClientConfig {
      base_url: settings.api_url.clone(),
      timeout: settings.request_timeout(),
    })?);

    let store = ConversationStore::load(Box::new(FileStorage::new(&data_dir)));
    let flow = QueryFlow::new(Arc::new(Mutex::new(store)), Arc::clone(&backend))
      .with_result_count(settings.result_count)
      .with_reply_delay(settings.reply_delay());

    Ok(Self { settings, data_dir, backend, flow })
  }

  pub fn store(&self) -> &SharedStore {
    self.flow.store()
  }
}

/// Resolve a conversation from a 1-based list position or an id
pub fn resolve_conversation(store: &ConversationStore, reference: &str) -> Option<ConversationId> {
  let reference = reference.trim();

  if let Ok(position) = reference.parse::<usize>() {
    if let Some(conversation) = position.checked_sub(1).and_then(|i| store.conversations().get(i)) {
      return Some(conversation.id.clone());
    }
  }

  let id = ConversationId::from(reference);
  store.contains(&id).then_some(id)
}

pub fn require_conversation(store: &ConversationStore, reference: &str) -> Result<ConversationId> {
  resolve_conversation(store, reference)
    .ok_or_else(|| anyhow!("No conversation matches '{}'. Use 'learnora list' to see them.", reference))
}
