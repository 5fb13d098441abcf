// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One deck, one JSON file. Writes go through a temp file and an atomic
//! rename so a crash mid-save never leaves a torn deck on disk.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{DeckId, IdError};

use super::snapshot::DeckSnapshot;

const DECK_FILE_SUFFIX: &str = ".deck.json";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: IdField,
        value: String,
        source: Box<IdError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    Deck,
    Slide,
}

impl IdField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deck => "deck_id",
            Self::Slide => "slide_id",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid {} {value:?}: {source}", field.as_str()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}

/// Acknowledgement of a completed save: the deck revision that reached disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveAck {
    pub rev: u64,
}

/// Where saved decks go. The debounced saver only sees this trait, so tests
/// drive it with an in-memory recorder instead of the filesystem.
pub trait PersistenceGateway {
    fn save_deck(&self, snapshot: &DeckSnapshot) -> Result<SaveAck, StoreError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no per-file fsync.
    #[default]
    BestEffort,
    /// Additionally flushes file contents and the directory entry to stable
    /// storage where the platform allows it.
    Durable,
}

/// Filesystem-backed gateway: `<root>/<deck_id>.deck.json`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
    durability: WriteDurability,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn deck_path(&self, deck_id: &DeckId) -> PathBuf {
        self.root
            .join(format!("{}{DECK_FILE_SUFFIX}", deck_id.as_str()))
    }

    pub fn load_deck(&self, deck_id: &DeckId) -> Result<DeckSnapshot, StoreError> {
        let path = self.deck_path(deck_id);
        let json = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })
    }

    /// Lists the ids of every deck file under the root, in name order.
    pub fn list_decks(&self) -> Result<Vec<DeckId>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(DECK_FILE_SUFFIX)) else {
                continue;
            };
            // Files with unparseable names are someone else's, not an error.
            if let Ok(deck_id) = DeckId::new(stem) {
                ids.push(deck_id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl PersistenceGateway for FileGateway {
    fn save_deck(&self, snapshot: &DeckSnapshot) -> Result<SaveAck, StoreError> {
        let deck_id =
            DeckId::new(snapshot.deck_id.clone()).map_err(|source| StoreError::InvalidId {
                field: IdField::Deck,
                value: snapshot.deck_id.clone(),
                source: Box::new(source),
            })?;
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.deck_path(&deck_id);
        let json =
            serde_json::to_string_pretty(snapshot).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        write_atomic(&path, json.as_bytes(), self.durability)?;
        Ok(SaveAck { rev: snapshot.rev })
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".proteus.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(not(windows))]
fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

#[cfg(windows)]
fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            let _ = fs::remove_file(to);
            fs::rename(from, to)
        }
    }
}
