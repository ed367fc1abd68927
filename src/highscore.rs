use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::{fs, io};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const HIGH_SCORE_KEY: &str = "highScore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {path} is not valid json: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("value {value:?} under {key:?} is not a score")]
    BadValue { key: String, value: String },
}

/// String key-value persistence, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct StoreFile {
    entries: BTreeMap<String, String>,
    updated_at: Option<DateTime<Local>>,
}

/// JSON file holding every key; rewritten in full on each `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn read(&self) -> Result<StoreFile, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut file = match self.read() {
            Ok(file) => file,
            Err(StoreError::Json { source, .. }) => {
                warn!(path = %self.path.display(), "replacing unreadable store file: {source}");
                StoreFile::default()
            }
            Err(e) => return Err(e),
        };
        file.entries.insert(key.to_string(), value.to_string());
        file.updated_at = Some(Local::now());

        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Best score so far. Falls back to memory only when the store cannot be
/// reached; a bad stored value reads as zero and is overwritten later.
pub struct HighScoreBook {
    store: Option<Box<dyn KeyValueStore>>,
    best: u32,
}

impl HighScoreBook {
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let best = match read_score(&*store) {
            Ok(best) => {
                debug!(best, "high score loaded");
                best
            }
            Err(e @ (StoreError::BadValue { .. } | StoreError::Json { .. })) => {
                warn!("ignoring stored high score: {e}");
                0
            }
            Err(e) => {
                warn!("high score unavailable, keeping it in memory: {e}");
                return HighScoreBook::in_memory();
            }
        };

        HighScoreBook {
            store: Some(store),
            best,
        }
    }

    pub fn in_memory() -> Self {
        HighScoreBook {
            store: None,
            best: 0,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Records a finished game. Returns true when it beat the previous best.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        info!(score, "new high score");

        let saved = match self.store.as_mut() {
            Some(store) => store.set(HIGH_SCORE_KEY, &score.to_string()),
            None => Ok(()),
        };
        if let Err(e) = saved {
            warn!("failed to save high score, keeping it in memory: {e}");
            self.store = None;
        }
        true
    }
}

fn read_score(store: &dyn KeyValueStore) -> Result<u32, StoreError> {
    match store.get(HIGH_SCORE_KEY)? {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| StoreError::BadValue {
            key: HIGH_SCORE_KEY.to_string(),
            value,
        }),
    }
}
