//! Image cache manager: resolves the payload's remote image references into
//! validated bytes inside the shared container.
//!
//! This is the only component permitted network access, and it runs in the
//! host-app process only. Bytes are decode-validated before anything is
//! written, and failures are isolated per slot: one malformed upstream image
//! must never blank the entire surface.

pub mod fetcher;
pub mod manager;
pub mod report;

pub use fetcher::{FetchError, HttpImageFetcher, ImageFetcher, StaticFetcher};
pub use manager::ImageCacheManager;
pub use report::{CacheError, CacheReport, SlotResolution};
