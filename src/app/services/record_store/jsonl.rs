//! JSON-lines file record store
//!
//! One record per line. `create` appends a line; `update` and the deletes
//! rewrite the whole file through a temporary sibling that is renamed into
//! place. The full record set is cached in memory after `open`.
//!
//! A failed append is truncated back off the file. A trailing line left
//! without its newline by an interrupted write is dropped on `open`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{RecordStore, StoreError, StoreResult};
use crate::app::models::{BatchId, NewRecord, NormalizedRecord, RecordId, RecordPatch};
use crate::app::services::aggregator::RecordFilter;

#[derive(Debug)]
struct JsonlState {
    records: Vec<NormalizedRecord>,
    next_id: u64,
}

/// Record store persisted as a JSON-lines file
#[derive(Debug)]
pub struct JsonlRecordStore {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlRecordStore {
    /// Open (or create) a store file, loading any existing records
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::io(
                    format!("Failed to create store directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let (records, valid_len) = parse_lines(&content, &path)?;
                if valid_len < content.len() {
                    warn!(
                        "Dropping incomplete last line of {} ({} bytes)",
                        path.display(),
                        content.len() - valid_len
                    );
                    truncate_file(&path, valid_len as u64).await?;
                }
                if !content[..valid_len].is_empty() && !content[..valid_len].ends_with('\n') {
                    append_newline(&path).await?;
                }
                records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::io(
                    format!("Failed to read store file {}", path.display()),
                    e,
                ));
            }
        };

        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        info!(
            "Opened record store {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            state: Mutex::new(JsonlState { records, next_id }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: &NormalizedRecord) -> StoreResult<()> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| StoreError::serialization("Failed to encode record", e))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error("open", e))?;
        let original_len = file
            .metadata()
            .await
            .map_err(|e| self.io_error("inspect", e))?
            .len();

        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(truncate_error) = file.set_len(original_len).await {
                warn!(
                    "Could not remove partial record from {}: {}",
                    self.path.display(),
                    truncate_error
                );
            }
            return Err(self.io_error("append to", e));
        }
        Ok(())
    }

    async fn rewrite(&self, records: &[NormalizedRecord]) -> StoreResult<()> {
        let mut content = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| StoreError::serialization("Failed to encode record", e))?;
            content.push_str(&line);
            content.push('\n');
        }

        let temp_path = self.path.with_extension("jsonl.tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| self.io_error("write temporary copy of", e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error("replace", e))?;

        debug!("Rewrote {} with {} records", self.path.display(), records.len());
        Ok(())
    }

    fn io_error(&self, action: &str, source: std::io::Error) -> StoreError {
        StoreError::io(
            format!("Failed to {} store file {}", action, self.path.display()),
            source,
        )
    }
}

/// Parse every line, returning the records and the byte length they cover
///
/// Only an unterminated last line may fail to parse; it is left out of the
/// returned length so the caller can cut it off.
fn parse_lines(content: &str, path: &Path) -> StoreResult<(Vec<NormalizedRecord>, usize)> {
    let mut records = Vec::new();
    let mut offset = 0;

    for (i, line) in content.split_inclusive('\n').enumerate() {
        let terminated = line.ends_with('\n');
        let text = line.trim();
        if !text.is_empty() {
            match serde_json::from_str(text) {
                Ok(record) => records.push(record),
                Err(_) if !terminated => return Ok((records, offset)),
                Err(e) => {
                    return Err(StoreError::serialization(
                        format!("Invalid record on line {} of {}", i + 1, path.display()),
                        e,
                    ));
                }
            }
        }
        offset += line.len();
    }

    Ok((records, offset))
}

async fn truncate_file(path: &Path, len: u64) -> StoreResult<()> {
    let io_error = |e: std::io::Error| {
        StoreError::io(
            format!("Failed to truncate store file {}", path.display()),
            e,
        )
    };
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .map_err(io_error)?;
    file.set_len(len).await.map_err(io_error)
}

/// Terminate a complete last record so the next append starts on a new line
async fn append_newline(path: &Path) -> StoreResult<()> {
    let io_error = |e: std::io::Error| {
        StoreError::io(
            format!("Failed to terminate last line of {}", path.display()),
            e,
        )
    };
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .await
        .map_err(io_error)?;
    file.write_all(b"\n").await.map_err(io_error)?;
    file.flush().await.map_err(io_error)
}

#[async_trait]
impl RecordStore for JsonlRecordStore {
    async fn create(&self, record: NewRecord) -> StoreResult<RecordId> {
        let mut state = self.state.lock().await;
        let id = RecordId(state.next_id);
        let record = NormalizedRecord::from_new(id, record);

        self.append(&record).await?;

        state.next_id += 1;
        state.records.push(record);
        Ok(id)
    }

    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<NormalizedRecord>> {
        let state = self.state.lock().await;
        Ok(filter.apply(&state.records).cloned().collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<NormalizedRecord> {
        let state = self.state.lock().await;
        state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> StoreResult<NormalizedRecord> {
        let mut state = self.state.lock().await;
        let mut records = state.records.clone();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        patch.apply(record);
        let updated = record.clone();

        self.rewrite(&records).await?;
        state.records = records;
        Ok(updated)
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if !state.records.iter().any(|r| r.id == id) {
            return Err(StoreError::NotFound { id });
        }

        let records: Vec<NormalizedRecord> = state
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.rewrite(&records).await?;
        state.records = records;
        Ok(())
    }

    async fn delete_by_batch(&self, batch_id: &BatchId) -> StoreResult<usize> {
        let mut state = self.state.lock().await;
        let records: Vec<NormalizedRecord> = state
            .records
            .iter()
            .filter(|r| r.batch_id.as_ref() != Some(batch_id))
            .cloned()
            .collect();
        let removed = state.records.len() - records.len();
        if removed == 0 {
            return Ok(0);
        }

        self.rewrite(&records).await?;
        state.records = records;
        Ok(removed)
    }
}
