use anyhow::Result;

use super::Workspace;
use crate::display::{format_conversation_list, print_lines};

pub async fn handle(workspace: &Workspace) -> Result<()> {
  let store = workspace.store().lock().await;
  let lines = format_conversation_list(store.conversations(), store.active_id(), |id| {
    workspace.flow.is_awaiting_reply(id)
  });

  crate::output::announce("Conversations");
  print_lines(&lines);
  Ok(())
}
