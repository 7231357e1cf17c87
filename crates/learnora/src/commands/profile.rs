use anyhow::Result;

use super::Workspace;
use crate::config::UserProfile;
use crate::display::{format_profile, print_lines};
use crate::output;

pub fn whoami(workspace: &Workspace) -> Result<()> {
  let profile = &workspace.settings.profile;
  if !profile.is_signed_in() {
    output::warn("Not signed in. Use 'learnora login --name <name>' to set your profile.");
  }

  print_lines(&format_profile(profile));
  Ok(())
}

pub fn login(workspace: &mut Workspace, profile: UserProfile) -> Result<()> {
  workspace.settings.profile = profile;
  workspace.settings.save(&workspace.data_dir)?;

  output::success(&format!("Signed in as {}", workspace.settings.profile.display_name()));
  Ok(())
}

pub fn logout(workspace: &mut Workspace) -> Result<()> {
  workspace.settings.profile.clear();
  workspace.settings.save(&workspace.data_dir)?;

  output::success("Logged out");
  Ok(())
}
