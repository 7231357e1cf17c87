use anyhow::Result;

use super::{require_conversation, Workspace};
use crate::display::display_transcript;

pub async fn handle(workspace: &Workspace, reference: String) -> Result<()> {
  let mut store = workspace.store().lock().await;
  let id = require_conversation(&store, &reference)?;
  store.select_conversation(&id);

  if let Some(conversation) = store.active_conversation() {
    crate::output::success(&format!("Switched to: {}", conversation.title));
    display_transcript(conversation);
  }

  Ok(())
}
