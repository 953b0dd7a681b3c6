use std::path::{Path, PathBuf};

use timetable_core::{Error, Result, storage::StorageBackend};

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|e| {
                Error::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        Ok(Self { data_dir })
    }

    pub fn with_default_dir(app_name: &str) -> Result<Self> {
        let data_dir = Self::get_default_data_dir(app_name)?;
        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn get_default_data_dir(app_name: &str) -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(home) = std::env::var_os("HOME") {
                Ok(PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(app_name))
            } else {
                Err(Error::Storage(
                    "Cannot determine data directory".to_string(),
                ))
            }
        }

        #[cfg(target_os = "linux")]
        {
            if let Some(data_dir) = std::env::var_os("XDG_DATA_HOME") {
                Ok(PathBuf::from(data_dir).join(app_name))
            } else if let Some(home) = std::env::var_os("HOME") {
                Ok(PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join(app_name))
            } else {
                Err(Error::Storage(
                    "Cannot determine data directory".to_string(),
                ))
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(app_data) = std::env::var_os("APPDATA") {
                Ok(PathBuf::from(app_data).join(app_name))
            } else {
                Err(Error::Storage(
                    "Cannot determine data directory".to_string(),
                ))
            }
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            Err(Error::Storage(
                "Unsupported operating system for data directory detection".to_string(),
            ))
        }
    }

    /// Keys are stored under readable names so the files can be inspected by hand.
    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        self.data_dir.join(format!("{}.json", file_name))
    }
}

impl StorageBackend for FileStorage {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let file_path = self.entry_path(key);

        if !file_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read(&file_path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", file_path.display(), e)))?;
        Ok(Some(content))
    }

    fn set_raw(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let file_path = self.entry_path(key);
        // readers never see a partially written record
        let tmp_path = file_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
        std::fs::rename(&tmp_path, &file_path)
            .map_err(|e| Error::Storage(format!("Failed to replace {}: {}", file_path.display(), e)))?;

        tracing::debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let file_path = self.entry_path(key);
        if file_path.exists() {
            std::fs::remove_file(&file_path).map_err(|e| {
                Error::Storage(format!("Failed to delete {}: {}", file_path.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::{SystemTime, UNIX_EPOCH},
    };

    use timetable_core::{TimetableRecord, persistence::TimetableStore, storage::Storage};

    use super::*;

    fn scratch_dir() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "timetable-test-{}-{}-{}",
            std::process::id(),
            nanos,
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = scratch_dir();
        let storage = FileStorage::new(dir.clone()).unwrap();
        assert!(storage.get_raw("timetables").unwrap().is_none());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn values_survive_reopening() {
        let dir = scratch_dir();
        let mut storage = FileStorage::new(dir.clone()).unwrap();
        storage.set("savedTimetable", &vec![1_u32, 2, 3]).unwrap();

        let reopened = FileStorage::new(dir.clone()).unwrap();
        let value: Option<Vec<u32>> = reopened.get("savedTimetable").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert!(dir.join("savedTimetable.json").exists());

        let mut reopened = reopened;
        reopened.delete("savedTimetable").unwrap();
        assert!(reopened.get_raw("savedTimetable").unwrap().is_none());
        // deleting twice is fine
        reopened.delete("savedTimetable").unwrap();
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn store_works_over_files() {
        let dir = scratch_dir();
        let mut store = TimetableStore::new(FileStorage::new(dir.clone()).unwrap());
        store
            .upsert(TimetableRecord {
                name: "Fall Plan".to_string(),
                crns: vec![10, 20],
                colors: Default::default(),
                timestamp: chrono::Utc::now(),
            })
            .unwrap();

        let store = TimetableStore::new(FileStorage::new(dir.clone()).unwrap());
        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.name, "Fall Plan");
        assert_eq!(latest.crns, vec![10, 20]);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
