/*!
 * Persisted preferences behind a narrow key/value interface
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::types::FilterConfig;

/// Key of the persisted filter configuration
pub const FILTER_CONFIG_KEY: &str = "codepack-filter-config";

/// Key of the recently opened directories
pub const RECENT_DIRECTORIES_KEY: &str = "codepack-recent-directories";

/// Number of recent directories remembered
pub const MAX_RECENT_DIRECTORIES: usize = 5;

/// A string key/value store
pub trait KeyValueStore {
    /// Raw value stored under `key`
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Store a raw value under `key`
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Load a JSON value, falling back to `default` when it is missing or invalid
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                log::warn!("Error reading stored key {:?}: {}", key, e);
                return default;
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Error parsing stored key {:?}: {}", key, e);
            default
        })
    }

    /// Save a value as JSON
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string_pretty(value)?;
        self.set_raw(key, &raw)
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the user's configuration directory
    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("codepack");
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }
}

/// Volatile store, for callers that must not touch disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persisted filter configuration, or the default one
pub fn load_filter_config<S: KeyValueStore>(store: &S) -> FilterConfig {
    store.load(FILTER_CONFIG_KEY, FilterConfig::default())
}

pub fn save_filter_config<S: KeyValueStore>(store: &S, config: &FilterConfig) -> Result<()> {
    store.save(FILTER_CONFIG_KEY, config)
}

/// Recently opened directories, most recent first
pub fn recent_directories<S: KeyValueStore>(store: &S) -> Vec<String> {
    store.load(RECENT_DIRECTORIES_KEY, Vec::new())
}

/// Move `dir` to the front of the recent list
pub fn add_recent_directory<S: KeyValueStore>(store: &S, dir: &str) -> Result<Vec<String>> {
    let mut dirs = recent_directories(store);
    dirs.retain(|d| d != dir);
    dirs.insert(0, dir.to_string());
    dirs.truncate(MAX_RECENT_DIRECTORIES);
    store.save(RECENT_DIRECTORIES_KEY, &dirs)?;
    Ok(dirs)
}

pub fn remove_recent_directory<S: KeyValueStore>(store: &S, dir: &str) -> Result<Vec<String>> {
    let mut dirs = recent_directories(store);
    dirs.retain(|d| d != dir);
    store.save(RECENT_DIRECTORIES_KEY, &dirs)?;
    Ok(dirs)
}
