use anyhow::{anyhow, Result};

use super::Workspace;
use crate::display::{display_message, display_typing_indicator};

pub async fn handle(workspace: &Workspace, query: String, new: bool) -> Result<()> {
  let conversation_id = {
    let mut store = workspace.store().lock().await;
    if new {
      store.create_conversation().id
    } else {
      store.active_id().clone()
    }
  };

  let handle = workspace
    .flow
    .submit_query(&conversation_id, &query)
    .await
    .ok_or_else(|| anyhow!("Nothing to ask: the query is empty"))?;

  display_typing_indicator();
  if let Some(reply) = handle.await? {
    display_message(&reply);
  }

  Ok(())
}
