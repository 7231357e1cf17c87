use anyhow::Result;
use tempfile::TempDir;

use learnora::commands::{require_conversation, resolve_conversation, GlobalOptions, Workspace};
use learnora::search::SearchBackend;
use learnora::storage::MemoryStorage;
use learnora::{ConversationId, ConversationStore, Message};

fn store_with_three() -> (ConversationStore, Vec<ConversationId>) {
  let mut store = ConversationStore::load(Box::new(MemoryStorage::new()));
  let first = store.active_id().clone();
  store.append_message(&first, Message::user("oldest"));
  store.create_conversation();
  store.create_conversation();
  let ids = store.conversations().iter().map(|c| c.id.clone()).collect();
  (store, ids)
}

#[test]
fn test_resolve_by_position() {
  let (store, ids) = store_with_three();
  assert_eq!(resolve_conversation(&store, "1"), Some(ids[0].clone()));
  assert_eq!(resolve_conversation(&store, " 3 "), Some(ids[2].clone()));
  assert_eq!(resolve_conversation(&store, "0"), None);
  assert_eq!(resolve_conversation(&store, "4"), None);
}

#[test]
fn test_resolve_by_id() {
  let (store, ids) = store_with_three();
  assert_eq!(resolve_conversation(&store, ids[1].as_str()), Some(ids[1].clone()));
  assert_eq!(resolve_conversation(&store, "conv_unknown"), None);
}

#[test]
fn test_require_reports_unknown_reference() {
  let (store, _ids) = store_with_three();
  let err = require_conversation(&store, "conv_unknown").unwrap_err();
  assert!(err.to_string().contains("conv_unknown"));
}

#[tokio::test]
async fn test_workspace_applies_overrides() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let options = GlobalOptions {
    api_url: Some("http://127.0.0.1:9".to_string()),
    data_dir: Some(temp_dir.path().to_path_buf()),
    reply_delay_ms: Some(0),
  };

  let workspace = Workspace::open(&options)?;
  assert_eq!(workspace.settings.api_url, "http://127.0.0.1:9");
  assert_eq!(workspace.settings.reply_delay_ms, 0);
  assert_eq!(workspace.backend.base_url(), "http://127.0.0.1:9");
  assert_eq!(workspace.store().lock().await.len(), 1);
  assert!(temp_dir.path().join("chatbot_conversations.json").exists());
  Ok(())
}
