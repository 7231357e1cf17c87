use anyhow::Result;

use super::{require_conversation, Workspace};
use crate::conversation::Conversation;
use crate::display::display_transcript;

pub async fn handle(workspace: &Workspace, reference: Option<String>) -> Result<()> {
  let store = workspace.store().lock().await;

  let id = match reference {
    Some(reference) => require_conversation(&store, &reference)?,
    None => store.active_id().clone(),
  };

  match store.get(&id) {
    Some(conversation) => display_transcript(conversation),
    None => display_transcript(&Conversation::default()),
  }

  Ok(())
}
