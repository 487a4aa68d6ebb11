use std::collections::BTreeMap;

use thiserror::Error;

use surface_core::model::{CachedImage, Slot};

use crate::fetcher::FetchError;

/// Why one slot failed to resolve. Always scoped to that slot; the other
/// slots in the same cycle are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The remote reference could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The fetched bytes are not a decodable image.
    #[error("decode failed: {0}")]
    Decode(String),
    /// The fetched bytes exceed the configured per-slot ceiling.
    #[error("image is {size} bytes, ceiling is {max}")]
    TooLarge { size: u64, max: u64 },
}

/// Outcome for one logical slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResolution {
    /// Bytes fetched, decoded, and written under the slot's stable key.
    Cached(CachedImage),
    /// The slot could not be resolved; it renders the deterministic
    /// placeholder instead.
    Miss {
        /// Remote reference that failed.
        source_ref: String,
        /// What went wrong, for logs.
        error: CacheError,
    },
}

impl SlotResolution {
    pub fn is_cached(&self) -> bool {
        matches!(self, SlotResolution::Cached(_))
    }
}

/// Per-slot resolution outcomes for one refresh cycle.
#[derive(Debug, Default)]
pub struct CacheReport {
    pub slots: BTreeMap<Slot, SlotResolution>,
}

impl CacheReport {
    /// The validated images, keyed by slot name, in the shape the stored
    /// surface document's manifest expects.
    pub fn cached_images(&self) -> BTreeMap<String, CachedImage> {
        self.slots
            .iter()
            .filter_map(|(slot, res)| match res {
                SlotResolution::Cached(img) => Some((slot.name(), img.clone())),
                SlotResolution::Miss { .. } => None,
            })
            .collect()
    }

    /// Number of slots that resolved to a validated image.
    pub fn cached_count(&self) -> usize {
        self.slots.values().filter(|r| r.is_cached()).count()
    }

    /// Number of slots that fell back to the placeholder.
    pub fn miss_count(&self) -> usize {
        self.slots.len() - self.cached_count()
    }
}
