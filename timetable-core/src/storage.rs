use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::Result;

/// Key-value storage standing in for device-local storage.
pub trait StorageBackend {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set_raw(&mut self, key: &str, value: &[u8]) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// Typed JSON access on top of a [`StorageBackend`].
pub trait Storage: StorageBackend {
    fn set<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value_bytes = serde_json::to_vec(value)?;
        self.set_raw(key, &value_bytes)
    }

    fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_slice::<T>(&raw)?)),
            None => Ok(None),
        }
    }
}

/// Every backend gets typed access.
impl<T: StorageBackend> Storage for T {}

/// In-process storage, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let mut storage = MemoryStorage::new();
        storage.set("numbers", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(
            storage.get::<Vec<u32>>("numbers").unwrap(),
            Some(vec![1, 2, 3])
        );
        assert_eq!(storage.get::<Vec<u32>>("missing").unwrap(), None);

        storage.delete("numbers").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn corrupt_value_is_a_json_error() {
        let mut storage = MemoryStorage::new();
        storage.set_raw("numbers", b"not json").unwrap();
        assert!(matches!(
            storage.get::<Vec<u32>>("numbers"),
            Err(crate::Error::Json(_))
        ));
    }
}
