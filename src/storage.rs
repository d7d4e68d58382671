//! Key-value persistence collaborators backing the stores.
//!
//! Values are JSON strings keyed like the browser's local storage
//! (`"chatSessions"`, `"pb_auth"`). A storage may report itself unavailable,
//! in which case callers skip every read and write and run purely in memory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub trait KeyValueStorage {
    /// Whether durable storage exists in this execution context.
    fn is_available(&self) -> bool {
        true
    }

    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// Durable storage with one file per key under a base directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the base directory if it does not exist yet.
    pub fn new(dir: PathBuf) -> Result<Self, String> {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| format!("Failed to create storage directory: {}", e))?;
        }
        Ok(Self { dir })
    }

    /// Opens storage under the platform data directory.
    pub fn in_app_data_dir() -> Result<Self, String> {
        let data_dir = dirs_next::data_dir().ok_or("Failed to find data directory")?;
        Self::new(data_dir.join("brainchat").join("data"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), String> {
        fs::write(self.key_path(key), value).map_err(|e| e.to_string())
    }
}

/// Ephemeral storage over a shared map. Clones share the same backing map,
/// so a value written through one handle is readable through another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The execution context without durable storage (e.g. server-side
/// rendering). Reports unavailable; reads and writes are inert.
pub struct DisabledStorage;

impl KeyValueStorage for DisabledStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }
}
