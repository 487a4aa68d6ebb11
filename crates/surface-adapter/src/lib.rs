//! Platform adapter contract for the ambient surface.
//!
//! The shared core never references either platform mechanism by name; it
//! talks to this capability trait. Two conforming implementations exist:
//! a state-driven one (`surface-adapter-glance`) and a message-driven one
//! (`surface-adapter-notify`). Both render exclusively from the shared
//! container and degrade to a deterministic placeholder when a referenced
//! image is absent or unvalidated.

pub mod recording;
pub mod traits;
pub mod view;

pub use recording::{AdapterCall, RecordingAdapter};
pub use traits::{event_channel, AdapterError, EventSink, EventSource, PlatformAdapter};
pub use view::{compose_view, ImageSource, PlaceholderSpec, SurfaceView, TileView};
