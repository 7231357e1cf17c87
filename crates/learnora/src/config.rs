//! Configuration management for Learnora
//!
//! Settings are read from `config.json` inside the data directory and may be
//! overridden from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

pub const DATA_DIR_ENV: &str = "LEARNORA_DIR";
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  /// Base URL of the search backend
  #[serde(default = "default_api_url")]
  pub api_url: String,
  /// Number of results requested per query
  #[serde(default = "default_result_count")]
  pub result_count: usize,
  /// Pause before a bot reply is shown
  #[serde(default = "default_reply_delay_ms")]
  pub reply_delay_ms: u64,
  /// HTTP request timeout
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Signed-in user, as handed over by the identity provider
  #[serde(default)]
  pub profile: UserProfile,
}

fn default_api_url() -> String {
  "http://localhost:5001".to_string()
}
fn default_result_count() -> usize {
  25
}
fn default_reply_delay_ms() -> u64 {
  1000
}
fn default_request_timeout_secs() -> u64 {
  30
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_url: default_api_url(),
      result_count: default_result_count(),
      reply_delay_ms: default_reply_delay_ms(),
      request_timeout_secs: default_request_timeout_secs(),
      profile: UserProfile::default(),
    }
  }
}

impl Settings {
  /// Load settings from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
  }

  /// Load settings from the data directory, falling back to defaults
  pub fn load(data_dir: &Path) -> Result<Self> {
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() {
      return Self::load_from_file(path);
    }
    Ok(Settings::default())
  }

  pub fn save(&self, data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(data_dir.join(CONFIG_FILE), content)?;
    Ok(())
  }

  pub fn reply_delay(&self) -> Duration {
    Duration::from_millis(self.reply_delay_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

/// Resolve the data directory: `LEARNORA_DIR` wins, then `~/.learnora`
pub fn data_dir() -> PathBuf {
  if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
    if !dir.trim().is_empty() {
      return PathBuf::from(dir);
    }
  }

  dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".learnora")
}

/// Display details of the logged-in user. Opaque strings only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub picture: Option<String>,
}

impl UserProfile {
  pub fn display_name(&self) -> &str {
    self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("User")
  }

  pub fn initial(&self) -> char {
    self.name.as_deref().and_then(|n| n.chars().next()).unwrap_or('U')
  }

  pub fn is_signed_in(&self) -> bool {
    self.name.is_some() || self.email.is_some()
  }

  pub fn clear(&mut self) {
    *self = UserProfile::default();
  }
}
