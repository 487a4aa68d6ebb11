//! Shared render view model.
//!
//! Tile selection, the explicit empty state, and the placeholder fallback
//! are implemented once here; each platform variant translates the resulting
//! view into its native form.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use surface_core::model::{
    AmbientContext, Slot, StoredSurface, TileKind, UpcomingItem,
};
use surface_core::rotation::RotationState;
use surface_core::SessionId;
use surface_store::SharedStateStore;

/// Deterministic two-stop gradient standing in for a missing image. Derived
/// from the slot name so the same slot always shows the same pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderSpec {
    pub start_rgb: [u8; 3],
    pub end_rgb: [u8; 3],
}

impl PlaceholderSpec {
    /// Gradient for a slot name.
    pub fn for_slot(slot_name: &str) -> Self {
        let digest = Sha256::digest(slot_name.as_bytes());
        Self {
            start_rgb: [digest[0], digest[1], digest[2]],
            end_rgb: [digest[3], digest[4], digest[5]],
        }
    }
}

/// Where a tile image comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    /// Validated bytes under this container key.
    Cached { key: String },
    /// No validated image; render the gradient.
    Placeholder(PlaceholderSpec),
}

/// One rendered row of the upcoming tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRow {
    pub title: String,
    pub starts_at_ms: i64,
    pub venue: String,
    pub link: String,
}

/// One cell of the rendered grid tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub image: ImageSource,
    pub link: String,
}

/// The tile currently selected by the rotation state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileView {
    Featured {
        title: String,
        starts_at_ms: i64,
        venue: String,
        locality: String,
        is_upcoming: bool,
        image: ImageSource,
        link: String,
    },
    Grid {
        cells: Vec<GridCell>,
        see_all_link: String,
    },
    Upcoming {
        rows: Vec<UpcomingRow>,
        see_all_link: String,
    },
    /// Documented empty state; never a blank surface.
    Empty,
}

/// Everything a native renderer needs for one refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceView {
    pub session_id: SessionId,
    pub tile_index: u32,
    pub tile_count: u32,
    /// When the host produced the underlying payload; lets renderers label
    /// stale content between host pushes.
    pub generated_at_ms: i64,
    pub tile: TileView,
    pub context: Option<AmbientContext>,
}

/// Composes the view for the tile the rotation state selects.
///
/// Images resolve to [`ImageSource::Cached`] only when the manifest entry is
/// validated and the bytes are actually present in the container; anything
/// else falls back to the placeholder.
pub fn compose_view(
    session_id: &SessionId,
    surface: &StoredSurface,
    rotation: RotationState,
    store: &dyn SharedStateStore,
) -> SurfaceView {
    let tiles = surface.payload.tiles();
    let tile_count = tiles.len() as u32;
    let index = rotation.clamped(tile_count).current_index;

    let tile = match tiles[index as usize] {
        TileKind::Featured => featured_tile(surface, store),
        TileKind::WeeklyGrid => grid_tile(surface, store),
        TileKind::Upcoming => upcoming_tile(&surface.payload.upcoming.items, surface),
        TileKind::Empty => TileView::Empty,
    };

    SurfaceView {
        session_id: session_id.clone(),
        tile_index: index,
        tile_count,
        generated_at_ms: surface.payload.generated_at_ms,
        tile,
        context: surface.payload.ambient_context.clone(),
    }
}

fn image_source(surface: &StoredSurface, store: &dyn SharedStateStore, slot: Slot) -> ImageSource {
    let name = slot.name();
    let usable = surface
        .images
        .get(&name)
        .filter(|img| img.validated)
        .map(|img| img.local_key.clone())
        .filter(|key| matches!(store.get_bytes(key), Ok(Some(_))));

    match usable {
        Some(key) => ImageSource::Cached { key },
        None => ImageSource::Placeholder(PlaceholderSpec::for_slot(&name)),
    }
}

fn featured_tile(surface: &StoredSurface, store: &dyn SharedStateStore) -> TileView {
    // tiles() only yields Featured when the item is present.
    let Some(f) = surface.payload.featured.as_ref() else {
        return TileView::Empty;
    };
    TileView::Featured {
        title: f.title.clone(),
        starts_at_ms: f.starts_at_ms,
        venue: f.venue.clone(),
        locality: f.locality.clone(),
        is_upcoming: f.is_upcoming,
        image: image_source(surface, store, Slot::Featured),
        link: f.link.clone(),
    }
}

fn grid_tile(surface: &StoredSurface, store: &dyn SharedStateStore) -> TileView {
    let cells = surface
        .payload
        .weekly_grid
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| GridCell {
            image: image_source(surface, store, Slot::Grid(i as u8)),
            link: item.link.clone(),
        })
        .collect();
    TileView::Grid {
        cells,
        see_all_link: surface.payload.weekly_grid.see_all_link.clone(),
    }
}

fn upcoming_tile(items: &[UpcomingItem], surface: &StoredSurface) -> TileView {
    TileView::Upcoming {
        rows: items
            .iter()
            .map(|i| UpcomingRow {
                title: i.title.clone(),
                starts_at_ms: i.starts_at_ms,
                venue: i.venue.clone(),
                link: i.link.clone(),
            })
            .collect(),
        see_all_link: surface.payload.upcoming.see_all_link.clone(),
    }
}
