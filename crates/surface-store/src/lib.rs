//! The shared state store: the cross-process storage area both the host app
//! and the sandboxed ambient-surface process read and write.
//!
//! Writes are atomic per key so a reader never observes a half-written
//! value. Combined with the single-writer-per-key discipline (host writes
//! payload and images, surface writes rotation), this makes last-writer-wins
//! safe without any cross-process locking.

pub mod fs;
pub mod keys;
pub mod memory;
pub mod traits;

pub use fs::FsSharedStore;
pub use memory::InMemoryStore;
pub use traits::{get_json, put_json, SharedStateStore, StoreError};
