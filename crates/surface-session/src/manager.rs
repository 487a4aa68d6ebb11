use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use surface_adapter::{AdapterError, EventSource, PlatformAdapter};
use surface_cache::ImageCacheManager;
use surface_core::model::{StoredSurface, SurfacePayload};
use surface_core::rotation::{self, InteractionEvent, RotationState, Transition};
use surface_core::session::{SessionState, SurfaceSession};
use surface_core::SessionId;
use surface_store::{get_json, keys, put_json, SharedStateStore, StoreError};

/// Session lifecycle failure, surfaced to the host application.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session is already starting or active; call `update` instead.
    #[error("a session is already active for this surface")]
    AlreadyActive,
    /// `update` was called with no session to update.
    #[error("no active session")]
    NotActive,
    /// Shared container failure; fatal for this refresh cycle only.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Native surface call failure; not retried automatically.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Owns the surface session and drives refresh cycles.
///
/// The session entity is mutated only here; the adapter just reports call
/// outcomes. The lock is never held across an await.
pub struct SurfaceSessionManager {
    store: Arc<dyn SharedStateStore>,
    cache: ImageCacheManager,
    adapter: Arc<dyn PlatformAdapter>,
    session: Mutex<SurfaceSession>,
    refresh_generation: AtomicU64,
}

impl SurfaceSessionManager {
    pub fn new(
        store: Arc<dyn SharedStateStore>,
        cache: ImageCacheManager,
        adapter: Arc<dyn PlatformAdapter>,
    ) -> Self {
        Self {
            store,
            cache,
            adapter,
            session: Mutex::new(SurfaceSession::inactive()),
            refresh_generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current session entity.
    pub fn session(&self) -> SurfaceSession {
        self.session.lock().unwrap().clone()
    }

    /// Whether the platform surface capability is available at all.
    pub fn capability_available(&self) -> bool {
        self.adapter.capability_available()
    }

    /// Starts a new session with the given payload.
    ///
    /// Fails with [`SessionError::AlreadyActive`] when a session is already
    /// starting or active, leaving it untouched. An adapter failure reverts
    /// the session to inactive and is surfaced without retry.
    pub async fn start(&self, payload: SurfacePayload) -> Result<SessionId, SessionError> {
        let session = {
            let mut guard = self.session.lock().unwrap();
            if guard.is_engaged() {
                return Err(SessionError::AlreadyActive);
            }
            *guard = SurfaceSession::begin();
            guard.clone()
        };

        let rotation = RotationState::default();
        let stored = match self.resolve_and_store(&payload, Some(rotation)).await {
            Ok(s) => s,
            Err(e) => {
                self.set_state(SessionState::Inactive);
                return Err(e.into());
            }
        };

        if let Err(e) = self.adapter.present(&session, &stored, rotation) {
            self.set_state(SessionState::Inactive);
            return Err(e.into());
        }

        {
            let mut guard = self.session.lock().unwrap();
            guard.state = SessionState::Active;
            guard.touch();
        }
        tracing::info!(session_id = %session.session_id, "surface session started");
        Ok(session.session_id)
    }

    /// Pushes a new payload into the active session.
    ///
    /// The user's current tile choice is preserved unless the new payload
    /// has fewer tiles, in which case the index clamps. A newer `update`
    /// supersedes an older in-flight one: the older one's container writes
    /// may complete (same keys, idempotent) but its adapter call is
    /// suppressed to avoid flickering back to stale content.
    pub async fn update(&self, payload: SurfacePayload) -> Result<(), SessionError> {
        let session = {
            let guard = self.session.lock().unwrap();
            if guard.state != SessionState::Active {
                return Err(SessionError::NotActive);
            }
            guard.clone()
        };

        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let stored = self.resolve_and_store(&payload, None).await?;

        // Clamp the persisted rotation index if the payload shrank.
        let rotation = self.read_rotation()?.clamped(stored.payload.tile_count());
        put_json(self.store.as_ref(), keys::ROTATION_INDEX, &rotation.current_index)?;

        if self.refresh_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "update superseded; skipping adapter refresh");
            return Ok(());
        }

        if let Err(e) = self.adapter.refresh_content(&session, &stored, rotation) {
            self.set_state(SessionState::Inactive);
            return Err(e.into());
        }

        self.session.lock().unwrap().touch();
        Ok(())
    }

    /// Ends the session. The session reaches `Inactive` regardless of
    /// whether native teardown succeeds; the host app is never blocked by a
    /// surface that refuses to tear down cleanly.
    pub fn end(&self) {
        let session = {
            let mut guard = self.session.lock().unwrap();
            if guard.state == SessionState::Inactive {
                return;
            }
            guard.state = SessionState::Ending;
            guard.clone()
        };

        if let Err(e) = self.adapter.dismiss(&session) {
            tracing::warn!(error = %e, session_id = %session.session_id, "native teardown failed");
        }

        if let Err(e) = put_json(self.store.as_ref(), keys::ROTATION_INDEX, &0u32) {
            tracing::warn!(error = %e, "failed to reset rotation index");
        }

        self.session.lock().unwrap().state = SessionState::Inactive;
        tracing::info!(session_id = %session.session_id, "surface session ended");
    }

    /// Applies one interaction event from the ambient surface.
    ///
    /// Rotation transitions persist immediately and re-render from cached
    /// data only; no network round-trip happens here. Events for unknown
    /// sessions or with no active session are dropped.
    pub fn handle_event(&self, event: InteractionEvent) {
        let session = {
            let guard = self.session.lock().unwrap();
            if guard.state != SessionState::Active {
                tracing::debug!(kind = ?event.kind, "no active session; dropping event");
                return;
            }
            if guard.session_id != event.session_id {
                tracing::warn!(
                    event_session = %event.session_id,
                    current_session = %guard.session_id,
                    "event for stale session; dropping"
                );
                return;
            }
            guard.clone()
        };

        let stored: StoredSurface = match get_json(self.store.as_ref(), keys::SURFACE_DOC) {
            Ok(Some(s)) => s,
            Ok(None) => {
                tracing::warn!("no stored surface document; dropping event");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored surface; dropping event");
                return;
            }
        };

        let current = match self.read_rotation() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read rotation state; dropping event");
                return;
            }
        };

        match rotation::apply(current, event.kind, stored.payload.tile_count()) {
            Transition::Rotated(next) => {
                if let Err(e) =
                    put_json(self.store.as_ref(), keys::ROTATION_INDEX, &next.current_index)
                {
                    tracing::warn!(error = %e, "failed to persist rotation state");
                    return;
                }
                if let Err(e) = self.adapter.refresh_content(&session, &stored, next) {
                    tracing::warn!(error = %e, "refresh after rotation failed");
                }
            }
            Transition::EndRequested => self.end(),
        }
    }

    async fn resolve_and_store(
        &self,
        payload: &SurfacePayload,
        rotation: Option<RotationState>,
    ) -> Result<StoredSurface, StoreError> {
        let report = self.cache.resolve_all(self.store.as_ref(), payload).await?;
        let stored = StoredSurface {
            payload: payload.clone(),
            images: report.cached_images(),
        };
        put_json(self.store.as_ref(), keys::SURFACE_DOC, &stored)?;
        if let Some(r) = rotation {
            put_json(self.store.as_ref(), keys::ROTATION_INDEX, &r.current_index)?;
        }
        Ok(stored)
    }

    fn read_rotation(&self) -> Result<RotationState, StoreError> {
        let index: Option<u32> = get_json(self.store.as_ref(), keys::ROTATION_INDEX)?;
        Ok(RotationState {
            current_index: index.unwrap_or(0),
        })
    }

    fn set_state(&self, state: SessionState) {
        self.session.lock().unwrap().state = state;
    }
}

/// Consumes interaction events until the channel closes. Spawn alongside
/// the manager in the host process (or its always-resident receiver).
pub async fn drive_events(manager: Arc<SurfaceSessionManager>, mut events: EventSource) {
    while let Some(event) = events.recv().await {
        manager.handle_event(event);
    }
}
