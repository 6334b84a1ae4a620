use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;
use wundr_core::{storage_key, CoreError, Flashcard, FlashcardStore, STORE_NAMESPACE};

pub mod paths;

const FILE_VERSION: u32 = 1;

/// On-disk shape: a flat key-value map. Flashcards live under their
/// `flashcard:` keys; records are kept as raw JSON so one unreadable
/// entry cannot take the rest of the file down with it.
#[derive(Clone, Serialize, Deserialize)]
struct StoreImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    records: BTreeMap<String, serde_json::Value>,
}

impl StoreImage {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            version: FILE_VERSION,
            created_at: now,
            updated_at: now,
            records: BTreeMap::new(),
        }
    }
}

pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<StoreImage>,
}

impl JsonStore {
    pub async fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10).await
    }

    pub async fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path).await?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
        })
    }

    async fn save(&self) -> Result<(), CoreError> {
        let snapshot = {
            let mut s = self.state.write();
            s.updated_at = Utc::now();
            s.clone()
        };
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;

        // Join error -> CoreError, inner io::Error -> CoreError
        task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(())
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

async fn load_or_init(path: &Path) -> Result<StoreImage, CoreError> {
    if !path.exists() {
        // First open; the file appears on the first write.
        return Ok(StoreImage::new_empty());
    }
    let p = path.to_path_buf();
    let mut img = task::spawn_blocking(move || -> std::io::Result<StoreImage> {
        let raw = fs::read_to_string(&p)?;
        Ok(serde_json::from_str(&raw)?)
    })
    .await
    .map_err(|_| CoreError::Storage("io"))
    .and_then(|r| r.map_err(|_| CoreError::Storage("io")))?;
    img.updated_at = Utc::now();
    Ok(img)
}

// Write to a temp file in the destination's directory, then rename over
// the destination, so a crash mid-write never leaves a torn file.
fn persist_bytes(dir: &Path, dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    let _ = fs::remove_file(dest);
    tmp.persist(dest)?;
    Ok(())
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &StoreImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img)?;
    persist_bytes(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path,
        &json,
    )?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    persist_bytes(
        backups_dir,
        &backups_dir.join(format!("wundr-{stamp}.json")),
        &json,
    )?;

    rotate_backups(backups_dir, max_backups)
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut backups: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    if backups.len() <= keep {
        return Ok(());
    }
    backups.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    let excess = backups.len() - keep;
    for old in backups.into_iter().take(excess) {
        let _ = fs::remove_file(old.path());
    }
    Ok(())
}

fn decode(key: &str, value: &serde_json::Value) -> Option<Flashcard> {
    match serde_json::from_value::<Flashcard>(value.clone()) {
        Ok(card) => Some(card),
        Err(err) => {
            tracing::warn!(%err, key, "skipping unreadable flashcard record");
            None
        }
    }
}

use async_trait::async_trait;

#[async_trait]
impl FlashcardStore for JsonStore {
    async fn put(&self, card: &Flashcard) -> Result<(), CoreError> {
        let value = serde_json::to_value(card).map_err(|_| CoreError::Storage("encode"))?;
        {
            let mut s = self.state.write();
            s.records.insert(storage_key(&card.id), value);
        }
        self.save().await
    }

    async fn get(&self, id: &str) -> Result<Option<Flashcard>, CoreError> {
        let key = storage_key(id);
        let s = self.state.read();
        Ok(s.records.get(&key).and_then(|v| decode(&key, v)))
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let removed = {
            let mut s = self.state.write();
            s.records.remove(&storage_key(id)).is_some()
        };
        if removed {
            self.save().await
        } else {
            Ok(())
        }
    }

    async fn clear(&self) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            s.records.retain(|k, _| !k.starts_with(STORE_NAMESPACE));
        }
        self.save().await
    }

    async fn list(&self) -> Result<Vec<Flashcard>, CoreError> {
        let s = self.state.read();
        Ok(s.records
            .iter()
            .filter(|(k, _)| k.starts_with(STORE_NAMESPACE))
            .filter_map(|(k, v)| decode(k, v))
            .collect())
    }
}
