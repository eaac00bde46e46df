//! File-backed cache backend.
//!
//! Stores one JSON record per key under a directory so cached quotes survive
//! restarts. Records are written to a temp file and renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStore};
use crate::error::StoreError;
use crate::models::Quote;

const RECORD_EXTENSION: &str = "json";

/// On-disk layout of a cached quote.
#[derive(Debug, Serialize, Deserialize)]
struct QuoteRecord {
    app_id: String,
    market_hash_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    highest_buy_order: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    lowest_sell_order: Decimal,
    /// Unix seconds
    #[serde(with = "chrono::serde::ts_seconds")]
    expires_at: DateTime<Utc>,
}

impl From<&CacheEntry> for QuoteRecord {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            app_id: entry.quote.app_id.clone(),
            market_hash_name: entry.quote.market_hash_name.clone(),
            highest_buy_order: entry.quote.highest_buy_order,
            lowest_sell_order: entry.quote.lowest_sell_order,
            expires_at: entry.expires_at,
        }
    }
}

impl From<QuoteRecord> for CacheEntry {
    fn from(record: QuoteRecord) -> Self {
        Self {
            quote: Quote {
                app_id: record.app_id,
                market_hash_name: record.market_hash_name,
                highest_buy_order: record.highest_buy_order,
                lowest_sell_order: record.lowest_sell_order,
            },
            expires_at: record.expires_at,
        }
    }
}

// == File Store ==
/// Directory of JSON records, one per cache key.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `base_path`.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await.map_err(unavailable)?;
        Ok(Self { base_path })
    }

    /// Fixed-width file name from a digest of both key fields, so long
    /// market hash names never exceed the filesystem's name limit.
    fn record_path(&self, key: &CacheKey) -> PathBuf {
        let name = format!("{}.{}", record_digest(key), RECORD_EXTENSION);
        self.base_path.join(name)
    }

    async fn read_record(path: &Path) -> Result<Option<QuoteRecord>, StoreError> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(e)),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        let record = Self::read_record(&self.record_path(key)).await?;
        Ok(record
            .filter(|record| {
                record.app_id == key.app_id() && record.market_hash_name == key.market_hash_name()
            })
            .map(CacheEntry::from))
    }

    async fn put(&self, key: &CacheKey, entry: CacheEntry) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let json = serde_json::to_vec(&QuoteRecord::from(&entry))
            .map_err(|e| StoreError::Unavailable(format!("encoding record: {}", e)))?;

        // Unique temp name so concurrent fills of one key never share a file
        let temp_path = path.with_extension(format!("{:016x}.tmp", rand::random::<u64>()));
        let mut file = fs::File::create(&temp_path).await.map_err(unavailable)?;
        file.write_all(&json).await.map_err(unavailable)?;
        file.sync_all().await.map_err(unavailable)?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(unavailable(e));
        }

        debug!(key = %key, path = %path.display(), "Wrote cache record");
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut dir = fs::read_dir(&self.base_path).await.map_err(unavailable)?;
        let mut removed = 0;

        while let Some(item) = dir.next_entry().await.map_err(unavailable)? {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            match Self::read_record(&path).await {
                Ok(Some(record)) if now >= record.expires_at => {
                    match fs::remove_file(&path).await {
                        Ok(()) => removed += 1,
                        Err(e) if e.kind() == ErrorKind::NotFound => {}
                        Err(e) => return Err(unavailable(e)),
                    }
                }
                Ok(_) => {}
                Err(err) => warn!(error = %err, "Skipping unreadable cache record"),
            }
        }

        Ok(removed)
    }

    fn backend_type(&self) -> &'static str {
        "file"
    }
}

/// SHA-256 over the length-prefixed key fields, hex encoded.
fn record_digest(key: &CacheKey) -> String {
    let mut hasher = Sha256::new();
    for field in [key.app_id(), key.market_hash_name()] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn unavailable(err: std::io::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
