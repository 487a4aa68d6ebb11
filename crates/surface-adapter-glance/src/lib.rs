//! State-driven platform variant.
//!
//! Models the lock-screen / dynamic-island style mechanism: the OS holds a
//! content-state object per surface and the adapter pushes updates into it.
//! The OS re-renders from that state on its own throttled cadence (a few
//! times per hour); the adapter cannot force it faster. Interaction arrives
//! as callbacks on the OS-held handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use surface_adapter::{compose_view, AdapterError, EventSink, PlatformAdapter, SurfaceView};
use surface_core::model::StoredSurface;
use surface_core::now_ms;
use surface_core::rotation::{InteractionEvent, InteractionKind, RotationState};
use surface_core::session::SurfaceSession;
use surface_core::SessionId;
use surface_store::SharedStateStore;

/// The content-state object the OS renders from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlanceContentState {
    /// The composed view for the current tile.
    pub view: SurfaceView,
    /// When the adapter last pushed this state (unix ms).
    pub pushed_at_ms: i64,
}

/// Stand-in for the OS side of the mechanism: holds the current content
/// state and surfaces the user's interaction callbacks.
pub struct GlanceSurfaceHandle {
    state: Mutex<Option<GlanceContentState>>,
    enabled: AtomicBool,
    events: EventSink,
}

impl GlanceSurfaceHandle {
    fn new(events: EventSink) -> Self {
        Self {
            state: Mutex::new(None),
            enabled: AtomicBool::new(true),
            events,
        }
    }

    /// The content state the OS currently renders, if any.
    pub fn current(&self) -> Option<GlanceContentState> {
        self.state.lock().unwrap().clone()
    }

    /// Simulates the user toggling the surface capability off or on.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// OS callback: the user tapped forward.
    pub fn tapped_next(&self) {
        self.emit(InteractionKind::Next);
    }

    /// OS callback: the user tapped backward.
    pub fn tapped_prev(&self) {
        self.emit(InteractionKind::Prev);
    }

    /// OS callback: the user swiped the surface away.
    pub fn dismissed(&self) {
        self.emit(InteractionKind::Dismiss);
    }

    fn emit(&self, kind: InteractionKind) {
        let Some(state) = self.current() else {
            // Interaction on a surface that is no longer presented.
            return;
        };
        let event = InteractionEvent {
            session_id: state.view.session_id.clone(),
            kind,
        };
        if self.events.send(event).is_err() {
            tracing::warn!("interaction channel closed; dropping event");
        }
    }
}

/// Adapter pushing content-state updates into the OS-held handle.
pub struct GlanceAdapter {
    store: Arc<dyn SharedStateStore>,
    handle: Arc<GlanceSurfaceHandle>,
}

impl GlanceAdapter {
    /// Builds the adapter and its OS-side handle.
    pub fn new(store: Arc<dyn SharedStateStore>, events: EventSink) -> Self {
        Self {
            store,
            handle: Arc::new(GlanceSurfaceHandle::new(events)),
        }
    }

    /// The OS-side handle, for wiring interaction callbacks and inspection.
    pub fn handle(&self) -> Arc<GlanceSurfaceHandle> {
        Arc::clone(&self.handle)
    }

    fn push_state(&self, session_id: &SessionId, surface: &StoredSurface, rotation: RotationState) {
        let view = compose_view(session_id, surface, rotation, self.store.as_ref());
        let state = GlanceContentState {
            view,
            pushed_at_ms: now_ms(),
        };
        *self.handle.state.lock().unwrap() = Some(state);
    }
}

impl PlatformAdapter for GlanceAdapter {
    fn capability_available(&self) -> bool {
        self.handle.enabled.load(Ordering::SeqCst)
    }

    fn present(
        &self,
        session: &SurfaceSession,
        surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError> {
        if !self.capability_available() {
            return Err(AdapterError::CapabilityUnavailable);
        }
        self.push_state(&session.session_id, surface, rotation);
        Ok(())
    }

    fn refresh_content(
        &self,
        session: &SurfaceSession,
        surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError> {
        if self.handle.current().is_none() {
            return Err(AdapterError::NotPresented(session.session_id.to_string()));
        }
        self.push_state(&session.session_id, surface, rotation);
        Ok(())
    }

    fn dismiss(&self, _session: &SurfaceSession) -> Result<(), AdapterError> {
        // Teardown is idempotent; ending an already-gone surface is fine.
        *self.handle.state.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use surface_adapter::{event_channel, TileView};
    use surface_core::model::{SurfacePayload, UpcomingItem, UpcomingList, WeeklyGrid};
    use surface_store::InMemoryStore;

    fn stored_surface() -> StoredSurface {
        StoredSurface {
            payload: SurfacePayload {
                generated_at_ms: 1,
                featured: None,
                weekly_grid: WeeklyGrid::default(),
                upcoming: UpcomingList {
                    items: vec![UpcomingItem {
                        id: "e".into(),
                        title: "Gig".into(),
                        starts_at_ms: 2,
                        venue: "Bar".into(),
                        link: "app://e".into(),
                    }],
                    see_all_link: "app://upcoming".into(),
                },
                ambient_context: None,
            },
            images: BTreeMap::new(),
        }
    }

    fn session() -> SurfaceSession {
        SurfaceSession::begin()
    }

    #[tokio::test]
    async fn present_pushes_content_state() {
        let (sink, _rx) = event_channel();
        let adapter = GlanceAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = session();

        adapter
            .present(&s, &stored_surface(), RotationState::default())
            .unwrap();

        let state = adapter.handle().current().unwrap();
        assert_eq!(state.view.session_id, s.session_id);
        assert!(matches!(state.view.tile, TileView::Upcoming { .. }));
    }

    #[tokio::test]
    async fn present_fails_when_capability_disabled() {
        let (sink, _rx) = event_channel();
        let adapter = GlanceAdapter::new(Arc::new(InMemoryStore::new()), sink);
        adapter.handle().set_enabled(false);

        let err = adapter
            .present(&session(), &stored_surface(), RotationState::default())
            .unwrap_err();
        assert!(matches!(err, AdapterError::CapabilityUnavailable));
        assert!(adapter.handle().current().is_none());
    }

    #[tokio::test]
    async fn refresh_without_presented_surface_fails() {
        let (sink, _rx) = event_channel();
        let adapter = GlanceAdapter::new(Arc::new(InMemoryStore::new()), sink);

        let err = adapter
            .refresh_content(&session(), &stored_surface(), RotationState::default())
            .unwrap_err();
        assert!(matches!(err, AdapterError::NotPresented(_)));
    }

    #[tokio::test]
    async fn callbacks_emit_events_tagged_with_session() {
        let (sink, mut rx) = event_channel();
        let adapter = GlanceAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = session();
        adapter
            .present(&s, &stored_surface(), RotationState::default())
            .unwrap();

        let handle = adapter.handle();
        handle.tapped_next();
        handle.dismissed();

        let e1 = rx.recv().await.unwrap();
        assert_eq!(e1.session_id, s.session_id);
        assert_eq!(e1.kind, InteractionKind::Next);
        let e2 = rx.recv().await.unwrap();
        assert_eq!(e2.kind, InteractionKind::Dismiss);
    }

    #[tokio::test]
    async fn callbacks_after_dismiss_are_dropped() {
        let (sink, mut rx) = event_channel();
        let adapter = GlanceAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = session();
        adapter
            .present(&s, &stored_surface(), RotationState::default())
            .unwrap();
        adapter.dismiss(&s).unwrap();

        adapter.handle().tapped_next();
        assert!(rx.try_recv().is_err());
    }
}
