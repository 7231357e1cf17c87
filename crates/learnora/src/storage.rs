//! Durable string-keyed slots backing the conversation store
//!
//! The store treats these as a best-effort cache: every slot holds a JSON
//! document that is rewritten whole on each change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::Result;

pub const CONVERSATIONS_KEY: &str = "chatbot_conversations";
pub const ACTIVE_CONVERSATION_KEY: &str = "chatbot_active_conversation";

pub trait StateStorage: Send + Sync {
  fn read(&self, key: &str) -> Result<Option<String>>;

  fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a directory
pub struct FileStorage {
  dir: PathBuf,
}

impl FileStorage {
  pub fn new<P: AsRef<Path>>(dir: P) -> Self {
    Self { dir: dir.as_ref().to_path_buf() }
  }

  pub fn slot_path(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{key}.json"))
  }
}

impl StateStorage for FileStorage {
  fn read(&self, key: &str) -> Result<Option<String>> {
    let path = self.slot_path(key);
    if !path.exists() {
      return Ok(None);
    }

    Ok(Some(std::fs::read_to_string(path)?))
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    std::fs::create_dir_all(&self.dir)?;
    std::fs::write(self.slot_path(key), value)?;
    Ok(())
  }
}

/// In-memory slots. Clones share the same map, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_slot(key: &str, value: &str) -> Self {
    let storage = Self::new();
    storage.slots().insert(key.to_string(), value.to_string());
    storage
  }

  pub fn get(&self, key: &str) -> Option<String> {
    self.slots().get(key).cloned()
  }

  fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl StateStorage for MemoryStorage {
  fn read(&self, key: &str) -> Result<Option<String>> {
    Ok(self.get(key))
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    self.slots().insert(key.to_string(), value.to_string());
    Ok(())
  }
}
