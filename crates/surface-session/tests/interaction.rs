//! End to end interaction tests: user gestures on the real adapter
//! variants flowing through the event channel back into the session
//! manager.

use std::sync::Arc;
use std::time::Duration;

use surface_adapter::event_channel;
use surface_adapter_glance::GlanceAdapter;
use surface_adapter_notify::{Broadcast, NotifyAdapter, ACTION_DISMISS, ACTION_NEXT};
use surface_cache::{ImageCacheManager, StaticFetcher};
use surface_core::model::{GridItem, SurfacePayload, UpcomingItem};
use surface_core::session::SessionState;
use surface_session::{drive_events, SessionError, SurfaceSessionManager};
use surface_store::{get_json, keys, FsSharedStore, SharedStateStore};

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 40, 40, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn two_tile_payload(url: &str) -> SurfacePayload {
    let mut p = SurfacePayload {
        generated_at_ms: 1,
        featured: None,
        weekly_grid: Default::default(),
        upcoming: Default::default(),
        ambient_context: None,
    };
    p.weekly_grid.items.push(GridItem {
        id: "g0".into(),
        image_url: Some(url.to_string()),
        link: "app://g0".into(),
    });
    p.upcoming.items.push(UpcomingItem {
        id: "e0".into(),
        title: "Trivia night".into(),
        starts_at_ms: 2,
        venue: "Back room".into(),
        link: "app://e0".into(),
    });
    p
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn glance_tap_rotates_and_repushes_content() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SharedStateStore> = Arc::new(FsSharedStore::open(dir.path()).unwrap());
    let (sink, source) = event_channel();
    let adapter = Arc::new(GlanceAdapter::new(store.clone(), sink));
    let handle = adapter.handle();

    let manager = Arc::new(SurfaceSessionManager::new(
        store.clone(),
        ImageCacheManager::new(Arc::new(
            StaticFetcher::new().with("https://cdn/a", png_bytes()),
        )),
        adapter,
    ));
    tokio::spawn(drive_events(manager.clone(), source));

    manager.start(two_tile_payload("https://cdn/a")).await.unwrap();
    assert_eq!(handle.current().unwrap().view.tile_index, 0);

    handle.tapped_next();
    settle().await;

    assert_eq!(handle.current().unwrap().view.tile_index, 1);
    let index: u32 = get_json(store.as_ref(), keys::ROTATION_INDEX)
        .unwrap()
        .unwrap();
    assert_eq!(index, 1);

    // Wrap back around to the first tile.
    handle.tapped_next();
    settle().await;
    assert_eq!(handle.current().unwrap().view.tile_index, 0);
}

#[tokio::test]
async fn glance_dismiss_ends_session_and_clears_surface() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SharedStateStore> = Arc::new(FsSharedStore::open(dir.path()).unwrap());
    let (sink, source) = event_channel();
    let adapter = Arc::new(GlanceAdapter::new(store.clone(), sink));
    let handle = adapter.handle();

    let manager = Arc::new(SurfaceSessionManager::new(
        store,
        ImageCacheManager::new(Arc::new(StaticFetcher::new())),
        adapter,
    ));
    tokio::spawn(drive_events(manager.clone(), source));

    manager.start(two_tile_payload("https://cdn/a")).await.unwrap();

    handle.dismissed();
    settle().await;

    assert_eq!(manager.session().state, SessionState::Inactive);
    assert!(handle.current().is_none());
}

#[tokio::test]
async fn glance_disabled_capability_blocks_start() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SharedStateStore> = Arc::new(FsSharedStore::open(dir.path()).unwrap());
    let (sink, _source) = event_channel();
    let adapter = Arc::new(GlanceAdapter::new(store.clone(), sink));
    adapter.handle().set_enabled(false);

    let manager = SurfaceSessionManager::new(
        store,
        ImageCacheManager::new(Arc::new(StaticFetcher::new())),
        adapter,
    );

    let err = manager.start(two_tile_payload("https://cdn/a")).await.unwrap_err();
    assert!(matches!(err, SessionError::Adapter(_)));
    assert_eq!(manager.session().state, SessionState::Inactive);
}

#[tokio::test]
async fn notify_broadcast_rotates_the_notification() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SharedStateStore> = Arc::new(FsSharedStore::open(dir.path()).unwrap());
    let (sink, source) = event_channel();
    let adapter = Arc::new(NotifyAdapter::new(store.clone(), sink));

    let manager = Arc::new(SurfaceSessionManager::new(
        store,
        ImageCacheManager::new(Arc::new(
            StaticFetcher::new().with("https://cdn/a", png_bytes()),
        )),
        adapter.clone(),
    ));
    tokio::spawn(drive_events(manager.clone(), source));

    let id = manager.start(two_tile_payload("https://cdn/a")).await.unwrap();
    assert_eq!(adapter.posted().unwrap().view.tile_index, 0);

    adapter.deliver_broadcast(&Broadcast::for_session(ACTION_NEXT, &id));
    settle().await;

    assert_eq!(adapter.posted().unwrap().view.tile_index, 1);
}

#[tokio::test]
async fn notify_dismiss_broadcast_clears_the_notification() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SharedStateStore> = Arc::new(FsSharedStore::open(dir.path()).unwrap());
    let (sink, source) = event_channel();
    let adapter = Arc::new(NotifyAdapter::new(store.clone(), sink));

    let manager = Arc::new(SurfaceSessionManager::new(
        store,
        ImageCacheManager::new(Arc::new(StaticFetcher::new())),
        adapter.clone(),
    ));
    tokio::spawn(drive_events(manager.clone(), source));

    let id = manager.start(two_tile_payload("https://cdn/a")).await.unwrap();

    adapter.deliver_broadcast(&Broadcast::for_session(ACTION_DISMISS, &id));
    settle().await;

    assert_eq!(manager.session().state, SessionState::Inactive);
    assert!(adapter.posted().is_none());
}
