//! Message-driven platform variant.
//!
//! Models the persistent-notification mechanism: there is no OS-held state
//! object, so the adapter constructs a renderable view from scratch on every
//! refresh and wires interaction through broadcast intents. Tapping a
//! control fires an action string back at the host process.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use surface_adapter::{compose_view, AdapterError, EventSink, PlatformAdapter, SurfaceView};
use surface_core::model::StoredSurface;
use surface_core::now_ms;
use surface_core::rotation::{InteractionEvent, InteractionKind, RotationState};
use surface_core::session::SurfaceSession;
use surface_core::SessionId;
use surface_store::SharedStateStore;

/// Broadcast action: advance to the next tile.
pub const ACTION_NEXT: &str = "com.surface.action.NEXT";
/// Broadcast action: go back to the previous tile.
pub const ACTION_PREV: &str = "com.surface.action.PREV";
/// Broadcast action: dismiss the surface.
pub const ACTION_DISMISS: &str = "com.surface.action.DISMISS";
/// Extra carrying the session id the action targets.
pub const EXTRA_SESSION_ID: &str = "sessionId";

/// A received broadcast intent: action string plus string extras.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Broadcast {
    pub action: String,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

impl Broadcast {
    /// Builds the broadcast one of our own controls would fire.
    pub fn for_session(action: &str, session_id: &SessionId) -> Self {
        let mut extras = BTreeMap::new();
        extras.insert(EXTRA_SESSION_ID.to_string(), session_id.to_string());
        Self {
            action: action.to_string(),
            extras,
        }
    }
}

/// One tappable control on the notification, bound to a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    pub action: String,
    pub session_id: String,
}

/// The notification as posted: a view rebuilt from scratch plus the actions
/// its controls fire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub view: SurfaceView,
    pub actions: Vec<PendingAction>,
    /// When this view was posted (unix ms).
    pub posted_at_ms: i64,
}

/// Adapter posting a persistent notification and translating broadcasts
/// back into interaction events.
pub struct NotifyAdapter {
    store: Arc<dyn SharedStateStore>,
    events: EventSink,
    posted: Mutex<Option<NotificationView>>,
    enabled: std::sync::atomic::AtomicBool,
}

impl NotifyAdapter {
    pub fn new(store: Arc<dyn SharedStateStore>, events: EventSink) -> Self {
        Self {
            store,
            events,
            posted: Mutex::new(None),
            enabled: std::sync::atomic::AtomicBool::new(true),
        }
    }

    /// The notification currently in the shade, if any.
    pub fn posted(&self) -> Option<NotificationView> {
        self.posted.lock().unwrap().clone()
    }

    /// Simulates the user revoking or granting the notification permission.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled
            .store(enabled, std::sync::atomic::Ordering::SeqCst);
    }

    /// Receives a broadcast intent from the OS.
    ///
    /// Unknown actions and broadcasts without a session id are logged and
    /// dropped; a stray intent must never disturb the surface.
    pub fn deliver_broadcast(&self, broadcast: &Broadcast) {
        let kind = match broadcast.action.as_str() {
            ACTION_NEXT => InteractionKind::Next,
            ACTION_PREV => InteractionKind::Prev,
            ACTION_DISMISS => InteractionKind::Dismiss,
            other => {
                tracing::warn!(action = %other, "unknown broadcast action; dropping");
                return;
            }
        };
        let Some(session_id) = broadcast.extras.get(EXTRA_SESSION_ID) else {
            tracing::warn!(action = %broadcast.action, "broadcast missing session id; dropping");
            return;
        };
        let event = InteractionEvent {
            session_id: SessionId::from_str(session_id.clone()),
            kind,
        };
        if self.events.send(event).is_err() {
            tracing::warn!("interaction channel closed; dropping event");
        }
    }

    fn post(&self, session_id: &SessionId, surface: &StoredSurface, rotation: RotationState) {
        let view = compose_view(session_id, surface, rotation, self.store.as_ref());
        let actions = [ACTION_PREV, ACTION_NEXT, ACTION_DISMISS]
            .iter()
            .map(|a| PendingAction {
                action: a.to_string(),
                session_id: session_id.to_string(),
            })
            .collect();
        *self.posted.lock().unwrap() = Some(NotificationView {
            view,
            actions,
            posted_at_ms: now_ms(),
        });
    }
}

impl PlatformAdapter for NotifyAdapter {
    fn capability_available(&self) -> bool {
        self.enabled.load(std::sync::atomic::Ordering::SeqCst)
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
        self.post(&session.session_id, surface, rotation);
        Ok(())
    }

    fn refresh_content(
        &self,
        session: &SurfaceSession,
        surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError> {
        if !self.capability_available() {
            return Err(AdapterError::Refresh("notifications disabled".into()));
        }
        // No persistent OS state: every refresh rebuilds and re-posts.
        self.post(&session.session_id, surface, rotation);
        Ok(())
    }

    fn dismiss(&self, _session: &SurfaceSession) -> Result<(), AdapterError> {
        *self.posted.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface_adapter::{event_channel, ImageSource, TileView};
    use surface_core::model::{GridItem, SurfacePayload, UpcomingList, WeeklyGrid};
    use surface_store::InMemoryStore;

    fn stored_surface() -> StoredSurface {
        StoredSurface {
            payload: SurfacePayload {
                generated_at_ms: 1,
                featured: None,
                weekly_grid: WeeklyGrid {
                    items: vec![GridItem {
                        id: "g".into(),
                        image_url: Some("https://cdn/g".into()),
                        link: "app://g".into(),
                    }],
                    see_all_link: "app://grid".into(),
                },
                upcoming: UpcomingList::default(),
                ambient_context: None,
            },
            images: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn present_posts_a_notification_with_actions() {
        let (sink, _rx) = event_channel();
        let adapter = NotifyAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = SurfaceSession::begin();

        adapter
            .present(&s, &stored_surface(), RotationState::default())
            .unwrap();

        let posted = adapter.posted().unwrap();
        assert_eq!(posted.actions.len(), 3);
        assert!(posted
            .actions
            .iter()
            .all(|a| a.session_id == s.session_id.to_string()));

        // Missing image renders the placeholder, never nothing.
        let TileView::Grid { cells, .. } = posted.view.tile else {
            panic!("expected grid tile");
        };
        assert!(matches!(cells[0].image, ImageSource::Placeholder(_)));
    }

    #[tokio::test]
    async fn refresh_rebuilds_the_view_from_scratch() {
        let (sink, _rx) = event_channel();
        let adapter = NotifyAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = SurfaceSession::begin();
        let surface = stored_surface();

        adapter
            .present(&s, &surface, RotationState::default())
            .unwrap();
        let first = adapter.posted().unwrap();

        adapter
            .refresh_content(&s, &surface, RotationState { current_index: 0 })
            .unwrap();
        let second = adapter.posted().unwrap();
        assert_eq!(first.view, second.view);
    }

    #[tokio::test]
    async fn broadcasts_translate_to_interaction_events() {
        let (sink, mut rx) = event_channel();
        let adapter = NotifyAdapter::new(Arc::new(InMemoryStore::new()), sink);
        let s = SurfaceSession::begin();

        adapter.deliver_broadcast(&Broadcast::for_session(ACTION_NEXT, &s.session_id));
        adapter.deliver_broadcast(&Broadcast::for_session(ACTION_DISMISS, &s.session_id));

        let e = rx.recv().await.unwrap();
        assert_eq!(e.kind, InteractionKind::Next);
        assert_eq!(e.session_id, s.session_id);
        let e = rx.recv().await.unwrap();
        assert_eq!(e.kind, InteractionKind::Dismiss);
    }

    #[tokio::test]
    async fn malformed_broadcasts_are_dropped() {
        let (sink, mut rx) = event_channel();
        let adapter = NotifyAdapter::new(Arc::new(InMemoryStore::new()), sink);

        adapter.deliver_broadcast(&Broadcast {
            action: "com.surface.action.UNKNOWN".into(),
            extras: BTreeMap::new(),
        });
        adapter.deliver_broadcast(&Broadcast {
            action: ACTION_NEXT.into(),
            extras: BTreeMap::new(),
        });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn present_fails_when_notifications_disabled() {
        let (sink, _rx) = event_channel();
        let adapter = NotifyAdapter::new(Arc::new(InMemoryStore::new()), sink);
        adapter.set_enabled(false);

        let err = adapter
            .present(
                &SurfaceSession::begin(),
                &stored_surface(),
                RotationState::default(),
            )
            .unwrap_err();
        assert!(matches!(err, AdapterError::CapabilityUnavailable));
    }
}
