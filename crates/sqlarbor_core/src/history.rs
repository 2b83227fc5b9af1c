use crate::DbError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// A single query history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub sql: String,
    pub timestamp: i64,
    pub database: Option<String>,
    pub connection_name: Option<String>,
    pub execution_time_ms: u64,
    pub row_count: Option<usize>,
}

impl HistoryEntry {
    pub fn new(
        sql: String,
        database: Option<String>,
        connection_name: Option<String>,
        execution_time: Duration,
        row_count: Option<usize>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql,
            timestamp: chrono::Utc::now().timestamp(),
            database,
            connection_name,
            execution_time_ms: execution_time.as_millis() as u64,
            row_count,
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        use chrono::{DateTime, Local, TimeZone, Utc};

        match Utc.timestamp_opt(self.timestamp, 0).single() {
            Some(dt) => {
                let local: DateTime<Local> = dt.into();
                local.format("%Y-%m-%d %H:%M:%S").to_string()
            }
            None => "Unknown".to_string(),
        }
    }
}

/// Persistent store for query history, newest first.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl HistoryStore {
    const DEFAULT_MAX_ENTRIES: usize = 1000;

    pub fn new() -> Result<Self, DbError> {
        Self::open(crate::store::app_config_dir()?.join("history.json"))
    }

    /// Opens a store at an explicit path. Used by tests and by hosts that
    /// manage their own storage location.
    pub fn open(path: PathBuf) -> Result<Self, DbError> {
        let entries = Self::load_from_path(&path)?;

        Ok(Self {
            path,
            entries,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        })
    }

    fn load_from_path(path: &PathBuf) -> Result<Vec<HistoryEntry>, DbError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).map_err(DbError::IoError)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("Failed to parse history ({}), starting empty", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self) -> Result<(), DbError> {
        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DbError::IoError(std::io::Error::other(e)))?;

        fs::write(&self.path, content).map_err(DbError::IoError)?;
        Ok(())
    }

    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
    }

    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max.max(10);
        self.entries.truncate(self.max_entries);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sql: &str) -> HistoryEntry {
        HistoryEntry::new(sql.to_string(), None, None, Duration::from_millis(5), None)
    }

    #[test]
    fn add_keeps_newest_first_and_respects_cap() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("history.json")).unwrap();
        store.set_max_entries(10);

        for i in 0..15 {
            store.add(entry(&format!("SELECT {}", i)));
        }

        assert_eq!(store.entries().len(), 10);
        assert_eq!(store.entries()[0].sql, "SELECT 14");
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::open(path.clone()).unwrap();
        store.add(entry("SELECT 1"));
        store.save().unwrap();

        let reloaded = HistoryStore::open(path).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].sql, "SELECT 1");
    }

    #[test]
    fn corrupted_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        let store = HistoryStore::open(path).unwrap();
        assert!(store.entries().is_empty());
    }
}
