use std::sync::Arc;

use surface_core::model::{CachedImage, Slot, SurfacePayload};
use surface_store::{SharedStateStore, StoreError};

use crate::fetcher::ImageFetcher;
use crate::report::{CacheError, CacheReport, SlotResolution};

/// Resolves payload image references into validated bytes in the store.
pub struct ImageCacheManager {
    fetcher: Arc<dyn ImageFetcher>,
    /// Optional per-slot byte ceiling. Decode validity is the only hard
    /// gate; this is a tuning knob, unset by default.
    max_bytes: Option<u64>,
}

impl ImageCacheManager {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            max_bytes: None,
        }
    }

    /// Rejects fetched images larger than `max` bytes.
    pub fn with_max_bytes(mut self, max: u64) -> Self {
        self.max_bytes = Some(max);
        self
    }

    /// Resolves every remote reference in `payload`.
    ///
    /// Fetch and decode failures are absorbed per slot and recorded as
    /// misses; only a container write failure aborts the cycle. Bytes are
    /// written under the slot's stable key only after decode succeeds, so
    /// the surface can never read unvalidated data mid-write.
    pub async fn resolve_all(
        &self,
        store: &dyn SharedStateStore,
        payload: &SurfacePayload,
    ) -> Result<CacheReport, StoreError> {
        let mut report = CacheReport::default();

        for (slot, url) in payload.image_slots() {
            match self.resolve_slot(store, slot, &url).await {
                Ok(Resolved::Image(img)) => {
                    report.slots.insert(slot, SlotResolution::Cached(img));
                }
                Ok(Resolved::Skipped(error)) => {
                    tracing::warn!(slot = %slot, url = %url, error = %error, "image slot fell back to placeholder");
                    report.slots.insert(
                        slot,
                        SlotResolution::Miss {
                            source_ref: url,
                            error,
                        },
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            cached = report.cached_count(),
            misses = report.miss_count(),
            "image resolution finished"
        );
        Ok(report)
    }

    async fn resolve_slot(
        &self,
        store: &dyn SharedStateStore,
        slot: Slot,
        url: &str,
    ) -> Result<Resolved, StoreError> {
        let bytes = match self.fetcher.fetch(url).await {
            Ok(b) => b,
            Err(e) => return Ok(Resolved::Skipped(e.into())),
        };

        if let Some(max) = self.max_bytes {
            if bytes.len() as u64 > max {
                return Ok(Resolved::Skipped(CacheError::TooLarge {
                    size: bytes.len() as u64,
                    max,
                }));
            }
        }

        // Decode before writing anything: a reference that is not a real
        // image never reaches the container.
        if let Err(e) = image::load_from_memory(&bytes) {
            return Ok(Resolved::Skipped(CacheError::Decode(e.to_string())));
        }

        let local_key = slot.image_key();
        store.put_bytes(&local_key, &bytes)?;

        Ok(Resolved::Image(CachedImage {
            source_ref: url.to_string(),
            local_key,
            byte_size: bytes.len() as u64,
            validated: true,
        }))
    }
}

enum Resolved {
    Image(CachedImage),
    Skipped(CacheError),
}
