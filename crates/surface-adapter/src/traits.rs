use thiserror::Error;
use tokio::sync::mpsc;

use surface_core::model::StoredSurface;
use surface_core::rotation::{InteractionEvent, RotationState};
use surface_core::session::SurfaceSession;

/// A native surface call failed. Surfaced to the session lifecycle, which
/// reverts to `Inactive` without automatic retry: repeated native failures
/// usually mean a permission or capability problem the caller must address.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The ambient-surface capability is disabled or unsupported.
    #[error("surface capability unavailable")]
    CapabilityUnavailable,
    /// Native surface creation failed.
    #[error("native present failed: {0}")]
    Present(String),
    /// Native surface refresh failed.
    #[error("native refresh failed: {0}")]
    Refresh(String),
    /// Native surface teardown failed.
    #[error("native dismiss failed: {0}")]
    Dismiss(String),
    /// A refresh or dismiss targeted a session with no presented surface.
    #[error("no surface presented for session {0}")]
    NotPresented(String),
}

/// Outbound half of the interaction channel, handed to adapters at
/// construction so native callbacks can reach the session lifecycle.
pub type EventSink = mpsc::UnboundedSender<InteractionEvent>;

/// Inbound half, consumed by the session lifecycle.
pub type EventSource = mpsc::UnboundedReceiver<InteractionEvent>;

/// Creates the interaction event channel. Unbounded: events are user-paced
/// taps and the surface process must never block on delivery.
pub fn event_channel() -> (EventSink, EventSource) {
    mpsc::unbounded_channel()
}

/// Capability interface every platform implementation provides.
///
/// Adapters translate the stored surface document into their native
/// presentation and report call outcomes; they never mutate the session.
pub trait PlatformAdapter: Send + Sync {
    /// Whether the ambient-surface capability is currently available.
    fn capability_available(&self) -> bool;

    /// Creates the native surface showing the given content and tile.
    fn present(
        &self,
        session: &SurfaceSession,
        surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError>;

    /// Pushes new content into an already-presented surface.
    fn refresh_content(
        &self,
        session: &SurfaceSession,
        surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError>;

    /// Tears the native surface down.
    fn dismiss(&self, session: &SurfaceSession) -> Result<(), AdapterError>;
}
