use anyhow::Result;

use super::{require_conversation, Workspace};

pub async fn handle(workspace: &Workspace, reference: String) -> Result<()> {
  let mut store = workspace.store().lock().await;
  let id = require_conversation(&store, &reference)?;
  let title = store.get(&id).map(|c| c.title.clone()).unwrap_or_default();

  if store.delete_conversation(&id) {
    crate::output::success(&format!("Deleted: {title}"));
  }

  if let Some(active) = store.active_title() {
    crate::output::info(&format!("Active conversation: {active}"));
  }

  Ok(())
}
