//! Storage module for saving and loading the card snapshot.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Card;

const SNAPSHOT_FILE: &str = "flashcards.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed card snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere the full card collection can be read from and written back to.
pub trait CardStore {
    fn load(&self) -> Result<Vec<Card>, StorageError>;
    fn save(&self, cards: &[Card]) -> Result<(), StorageError>;
}

/// Keeps the collection as a single JSON array in a data directory.
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&data_dir).map_err(|source| StorageError::Io {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("focus-study")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}

impl CardStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Card>, StorageError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        let cards: Vec<Card> = serde_json::from_str(&json)?;
        tracing::info!(count = cards.len(), path = %path.display(), "loaded card snapshot");
        Ok(cards)
    }

    fn save(&self, cards: &[Card]) -> Result<(), StorageError> {
        let path = self.snapshot_path();
        let json = serde_json::to_string_pretty(cards)?;
        fs::write(&path, json).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(count = cards.len(), "saved card snapshot");
        Ok(())
    }
}

/// Store that never touches disk. The last saved snapshot can be inspected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: RefCell<Vec<Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: RefCell::new(cards),
        }
    }

    pub fn snapshot(&self) -> Vec<Card> {
        self.cards.borrow().clone()
    }
}

impl CardStore for MemoryStore {
    fn load(&self) -> Result<Vec<Card>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, cards: &[Card]) -> Result<(), StorageError> {
        *self.cards.borrow_mut() = cards.to_vec();
        Ok(())
    }
}

impl<S: CardStore + ?Sized> CardStore for std::rc::Rc<S> {
    fn load(&self) -> Result<Vec<Card>, StorageError> {
        (**self).load()
    }

    fn save(&self, cards: &[Card]) -> Result<(), StorageError> {
        (**self).save(cards)
    }
}
