//! Surface session lifecycle: start/update/end for the ambient surface,
//! interaction event handling, and the host bridge.
//!
//! Within one refresh cycle the ordering is fixed: payload validation, then
//! image resolution, then the shared-container write, then the adapter call.
//! The adapter is never called with a payload whose images are still
//! resolving; partial results are fine, in-flight results are not.

pub mod bridge;
pub mod manager;

pub use bridge::SurfaceBridge;
pub use manager::{drive_events, SessionError, SurfaceSessionManager};
