use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Container storage failure. Fatal for the current refresh cycle only; the
/// previously stored payload stays visible until the next successful write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is not a valid slash-separated logical path.
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    /// Underlying container I/O failed.
    #[error("container i/o for {key:?}: {source}")]
    Io {
        /// Key being read or written.
        key: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A JSON value failed to encode.
    #[error("encode {key:?}: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A stored JSON value failed to decode.
    #[error("decode {key:?}: {source}")]
    Decode {
        /// Key being read.
        key: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Platform-neutral key/value + file area shared across the process
/// boundary. The platform adapter supplies only the container location; the
/// interface is identical on both sides.
pub trait SharedStateStore: Send + Sync {
    /// Writes `bytes` under `key`, atomically replacing any previous value.
    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Reads the value under `key`, or `None` if absent.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Lists keys starting with `prefix`, sorted.
    fn list_keys_under(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Writes a JSON value under `key`.
pub fn put_json<T: Serialize>(
    store: &dyn SharedStateStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.put_bytes(key, &bytes)
}

/// Reads a JSON value from `key`, or `None` if absent.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn SharedStateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(bytes) = store.get_bytes(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Checks a key is a well-formed relative slash path: non-empty components,
/// no traversal, no platform separators smuggled in.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.ends_with('/')
        || key.contains('\\')
        || key.split('/').any(|c| c.is_empty() || c == "." || c == "..");
    if bad {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
