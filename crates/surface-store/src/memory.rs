//! In-memory store for tests. Not durable and not cross-process, but
//! implements the same contract as the filesystem container.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::traits::{validate_key, SharedStateStore, StoreError};

/// Map-backed store for unit and scenario tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedStateStore for InMemoryStore {
    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.inner
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.inner.lock().unwrap().get(key).cloned())
    }

    fn list_keys_under(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_store() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_bytes("surface.json").unwrap(), None);

        store.put_bytes("surface.json", b"{}").unwrap();
        store.put_bytes("images/featured", b"img").unwrap();

        assert_eq!(store.get_bytes("surface.json").unwrap().unwrap(), b"{}");
        assert_eq!(
            store.list_keys_under("images/").unwrap(),
            vec!["images/featured"]
        );
        assert!(store.put_bytes("../nope", b"x").is_err());
    }
}
