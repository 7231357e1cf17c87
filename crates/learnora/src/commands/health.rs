use anyhow::Result;

use super::Workspace;
use crate::output;

pub async fn handle(workspace: &Workspace) -> Result<()> {
  output::info(&format!("Checking search backend at {}", workspace.backend.base_url()));

  match workspace.backend.health().await {
    Ok(status) if status.is_ok() => {
      let server = status.server.as_deref().unwrap_or("unknown server");
      output::success(&format!("Backend is up ({server})"));
      Ok(())
    }
    Ok(status) => {
      output::warn(&format!("Backend answered with status '{}'", status.status));
      Ok(())
    }
    Err(e) => {
      output::error(&crate::query::failure_message(&e, workspace.backend.base_url()).text);
      anyhow::bail!("Backend health check failed")
    }
  }
}
