use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use lastseen_api::{Record, RecordSource, SourceError};

// ═══════════════════════════════════════════════════════════════
//  MemoryStorageConfig
// ═══════════════════════════════════════════════════════════════

fn default_max_records() -> usize {
    1000
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MemoryStorageConfig {
    /// Ring-buffer capacity per device.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    /// JSON array of records loaded at startup.
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            seed_file: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemoryRecordSource
// ═══════════════════════════════════════════════════════════════

/// In-memory record store, one ring buffer per device.
///
/// Nothing survives a restart. Used for local runs and as the backing
/// store in tests.
pub struct MemoryRecordSource {
    devices: RwLock<HashMap<String, VecDeque<Record>>>,
    max_records: usize,
}

impl MemoryRecordSource {
    pub fn new(max_records: usize) -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            max_records,
        }
    }

    /// Build from config, loading the seed file if one is set.
    pub async fn from_config(config: &MemoryStorageConfig) -> Result<Self, SourceError> {
        let source = Self::new(config.max_records);
        if let Some(path) = &config.seed_file {
            let loaded = source.load_seed(path).await?;
            tracing::info!(path = %path, records = loaded, "seeded memory storage");
        }
        Ok(source)
    }

    /// Store a record, evicting the device's oldest one when full.
    /// A zero-capacity store keeps nothing.
    pub async fn insert(&self, record: Record) {
        if self.max_records == 0 {
            return;
        }
        let mut devices = self.devices.write().await;
        let buf = devices.entry(record.device_id.clone()).or_default();
        if buf.len() >= self.max_records {
            buf.pop_front();
        }
        buf.push_back(record);
    }

    pub async fn extend(&self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.insert(record).await;
        }
    }

    /// Load a JSON array of records from `path`. Returns how many were read.
    pub async fn load_seed(&self, path: impl AsRef<Path>) -> Result<usize, SourceError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| SourceError::io(format!("read '{}': {e}", path.display())))?;
        let records: Vec<Record> = serde_json::from_slice(&content)
            .map_err(|e| SourceError::new(format!("parse '{}': {e}", path.display())))?;
        let count = records.len();
        self.extend(records).await;
        Ok(count)
    }

    /// Total records held across all devices.
    pub async fn len(&self) -> usize {
        self.devices.read().await.values().map(VecDeque::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl RecordSource for MemoryRecordSource {
    fn get_records(
        &self,
        device_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Record>, SourceError>> + Send + '_>> {
        let device_id = device_id.to_string();
        let cancel = cancel.clone();
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(SourceError::cancelled());
            }

            let devices = self.devices.read().await;
            let Some(buf) = devices.get(&device_id) else {
                return Ok(Vec::new());
            };

            // Newest insert first; the stable sort keeps that order on birth_date ties.
            let mut result: Vec<Record> = buf.iter().rev().cloned().collect();
            result.sort_by(|a, b| b.birth_date.cmp(&a.birth_date));
            result.truncate(limit);
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use lastseen_api::SourceErrorKind;

    use super::*;

    fn record(id: i64, device_id: &str, birth_date: i64) -> Record {
        Record {
            id,
            device_id: device_id.into(),
            birth_date,
            death_date: birth_date + 100,
            data: Vec::new(),
        }
    }

    async fn ids(source: &MemoryRecordSource, device_id: &str, limit: usize) -> Vec<i64> {
        source
            .get_records(device_id, limit, &CancellationToken::new())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[tokio::test]
    async fn newest_first_and_limited() {
        let source = MemoryRecordSource::new(10);
        source
            .extend(vec![record(1, "a", 10), record(2, "a", 30), record(3, "a", 20)])
            .await;

        assert_eq!(ids(&source, "a", 5).await, vec![2, 3, 1]);
        assert_eq!(ids(&source, "a", 2).await, vec![2, 3]);
    }

    #[tokio::test]
    async fn ties_prefer_later_inserts() {
        let source = MemoryRecordSource::new(10);
        source.extend(vec![record(1, "a", 10), record(2, "a", 10)]).await;

        assert_eq!(ids(&source, "a", 5).await, vec![2, 1]);
    }

    #[tokio::test]
    async fn devices_are_isolated() {
        let source = MemoryRecordSource::new(10);
        source.extend(vec![record(1, "a", 10), record(2, "b", 10)]).await;

        assert_eq!(ids(&source, "a", 5).await, vec![1]);
        assert!(ids(&source, "missing", 5).await.is_empty());
        assert_eq!(source.len().await, 2);
    }

    #[tokio::test]
    async fn ring_buffer_evicts_oldest() {
        let source = MemoryRecordSource::new(2);
        source
            .extend(vec![record(1, "a", 10), record(2, "a", 20), record(3, "a", 30)])
            .await;

        assert_eq!(ids(&source, "a", 5).await, vec![3, 2]);
    }

    #[tokio::test]
    async fn zero_capacity_keeps_nothing() {
        let source = MemoryRecordSource::new(0);
        source.extend(vec![record(1, "a", 10), record(2, "a", 20)]).await;

        assert!(source.is_empty().await);
        assert!(ids(&source, "a", 5).await.is_empty());
    }

    #[tokio::test]
    async fn cancelled_query_is_rejected() {
        let source = MemoryRecordSource::new(2);
        source.insert(record(1, "a", 10)).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = source.get_records("a", 5, &cancel).await.unwrap_err();
        assert_eq!(err.kind(), SourceErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn seed_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("lastseen-seed-{}.json", std::process::id()));
        let seed = serde_json::to_vec(&vec![record(1, "a", 10), record(2, "a", 20)]).unwrap();
        tokio::fs::write(&path, seed).await.unwrap();

        let config = MemoryStorageConfig {
            max_records: 10,
            seed_file: Some(path.display().to_string()),
        };
        let source = MemoryRecordSource::from_config(&config).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(ids(&source, "a", 5).await, vec![2, 1]);
    }

    #[tokio::test]
    async fn missing_seed_file_is_an_io_error() {
        let source = MemoryRecordSource::new(1);
        let err = source.load_seed("/definitely/not/here.json").await.unwrap_err();
        assert_eq!(err.kind(), SourceErrorKind::Io);
        assert!(source.is_empty().await);
    }

    #[test]
    fn config_defaults() {
        let config: MemoryStorageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_records, 1000);
        assert!(config.seed_file.is_none());
    }
}
