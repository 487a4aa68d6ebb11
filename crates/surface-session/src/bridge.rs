//! The native bridge surface exposed to the host application.
//!
//! Errors are logged, not thrown, across this boundary: a failure to
//! present an ambient surface must never crash or block the host app's
//! normal operation.

use std::sync::Arc;

use surface_core::session::SessionState;
use surface_core::validate;

use crate::manager::SurfaceSessionManager;

/// Thin log-don't-throw wrapper over the session manager.
#[derive(Clone)]
pub struct SurfaceBridge {
    manager: Arc<SurfaceSessionManager>,
}

impl SurfaceBridge {
    pub fn new(manager: Arc<SurfaceSessionManager>) -> Self {
        Self { manager }
    }

    /// Whether the ambient-surface capability is available on this device.
    /// Hosts use this to drive user-visible toggles.
    pub fn is_capability_available(&self) -> bool {
        self.manager.capability_available()
    }

    /// Validates the raw payload and starts or updates the surface,
    /// whichever the current session state calls for.
    pub async fn start_or_update_surface(&self, json_payload: &str) {
        let payload = match validate::validate(json_payload) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting surface payload");
                return;
            }
        };

        let result = if self.manager.session().state == SessionState::Active {
            self.manager.update(payload).await
        } else {
            self.manager.start(payload).await.map(|_| ())
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "surface start/update failed");
        }
    }

    /// Ends the surface session. Never fails from the host's perspective.
    pub fn end_surface(&self) {
        self.manager.end();
    }
}
