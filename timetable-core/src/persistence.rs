//! Named timetable records kept in a [`StorageBackend`].
//!
//! Every write re-reads the stored list first, so records written by another
//! process since the last read survive; a record with the same name is
//! replaced (last write wins).

use chrono::Utc;

use crate::{
    Error, LegacyTimetable, Result, TimetableRecord,
    storage::{Storage, StorageBackend},
};

/// Storage key of the timetable list.
pub const TIMETABLES_KEY: &str = "timetables";
/// Storage key of the pre-multi-timetable single record.
pub const LEGACY_KEY: &str = "savedTimetable";

pub struct TimetableStore<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> TimetableStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> Result<Vec<TimetableRecord>> {
        Ok(self
            .storage
            .get::<Vec<TimetableRecord>>(TIMETABLES_KEY)?
            .unwrap_or_default())
    }

    pub fn find(&self, name: &str) -> Result<Option<TimetableRecord>> {
        Ok(self.records()?.into_iter().find(|r| r.name == name))
    }

    /// Most recently saved record.
    pub fn latest(&self) -> Result<Option<TimetableRecord>> {
        Ok(self.records()?.pop())
    }

    pub fn has_records(&self) -> Result<bool> {
        Ok(self.storage.get_raw(TIMETABLES_KEY)?.is_some())
    }

    /// Inserts or replaces the record with the same name, moving it to the end.
    pub fn upsert(&mut self, record: TimetableRecord) -> Result<Vec<TimetableRecord>> {
        let mut records = self.records()?;
        records.retain(|r| r.name != record.name);
        tracing::info!("Saving timetable \"{}\" ({} sections)", record.name, record.crns.len());
        records.push(record);
        self.storage.set(TIMETABLES_KEY, &records)?;
        Ok(records)
    }

    /// Moves a record to the end with a fresh timestamp, leaving its sections alone.
    pub fn touch(&mut self, name: &str) -> Result<()> {
        let mut records = self.records()?;
        let index = records
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| Error::TimetableNotFound(name.to_string()))?;
        let mut record = records.remove(index);
        record.timestamp = Utc::now();
        records.push(record);
        self.storage.set(TIMETABLES_KEY, &records)?;
        tracing::debug!("Marked timetable \"{}\" as most recent", name);
        Ok(())
    }

    /// Removes a record by name and returns the remaining ones.
    pub fn remove(&mut self, name: &str) -> Result<Vec<TimetableRecord>> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.name != name);
        if records.len() == before {
            return Err(Error::TimetableNotFound(name.to_string()));
        }
        self.storage.set(TIMETABLES_KEY, &records)?;
        tracing::info!("Deleted timetable \"{}\"", name);
        Ok(records)
    }

    pub fn legacy(&self) -> Result<Option<LegacyTimetable>> {
        self.storage.get::<LegacyTimetable>(LEGACY_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn record(name: &str, crns: &[u32]) -> TimetableRecord {
        TimetableRecord {
            name: name.to_string(),
            crns: crns.to_vec(),
            colors: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn upsert_replaces_and_moves_to_end() {
        let mut store = TimetableStore::new(MemoryStorage::new());
        assert!(!store.has_records().unwrap());

        store.upsert(record("A", &[1])).unwrap();
        store.upsert(record("B", &[2])).unwrap();
        let records = store.upsert(record("A", &[3])).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(store.latest().unwrap().unwrap().crns, vec![3]);
        assert_eq!(store.find("B").unwrap().unwrap().crns, vec![2]);
    }

    #[test]
    fn touch_moves_record_without_rewriting_it() {
        let mut store = TimetableStore::new(MemoryStorage::new());
        store.upsert(record("A", &[1, 999])).unwrap();
        store.upsert(record("B", &[2])).unwrap();

        store.touch("A").unwrap();
        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.name, "A");
        assert_eq!(latest.crns, vec![1, 999]);
        assert_eq!(store.records().unwrap().len(), 2);

        assert!(matches!(store.touch("Z"), Err(Error::TimetableNotFound(_))));
    }

    #[test]
    fn remove_unknown_name_fails() {
        let mut store = TimetableStore::new(MemoryStorage::new());
        store.upsert(record("A", &[1])).unwrap();
        assert!(matches!(
            store.remove("Z"),
            Err(Error::TimetableNotFound(_))
        ));
        assert!(store.remove("A").unwrap().is_empty());
        assert!(store.has_records().unwrap());
    }

    #[test]
    fn reads_records_written_in_browser_format() {
        let mut storage = MemoryStorage::new();
        let json = r##"[{"name":"Fall Plan","crns":[111,222],
            "colors":{"111":"#039be5","222":"#039be5"},
            "timestamp":"2024-09-01T12:00:00.000Z"}]"##;
        storage.set_raw(TIMETABLES_KEY, json.as_bytes()).unwrap();
        storage
            .set_raw(LEGACY_KEY, br##"{"crns":[5],"colors":{"CSC-225":"#33b679"}}"##)
            .unwrap();

        let store = TimetableStore::new(storage);
        let found = store.find("Fall Plan").unwrap().unwrap();
        assert_eq!(found.crns, vec![111, 222]);
        assert_eq!(found.colors[&111].as_str(), "#039be5");

        let legacy = store.legacy().unwrap().unwrap();
        assert_eq!(legacy.crns, vec![5]);
        assert_eq!(legacy.colors["CSC-225"].as_str(), "#33b679");
    }

    #[test]
    fn writes_preserve_records_from_other_writers() {
        let mut store = TimetableStore::new(MemoryStorage::new());
        store.upsert(record("Mine", &[1])).unwrap();

        // another writer appends behind our back
        let mut records = store.records().unwrap();
        records.push(record("Theirs", &[2]));
        store.storage_mut().set(TIMETABLES_KEY, &records).unwrap();

        let records = store.upsert(record("Mine", &[3])).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.name == "Theirs"));
    }
}
