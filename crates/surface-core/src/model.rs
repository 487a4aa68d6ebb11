use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed capacity of the weekly grid group.
pub const WEEKLY_GRID_CAPACITY: usize = 6;

/// Fixed capacity of the upcoming group.
pub const UPCOMING_CAPACITY: usize = 3;

/// One refresh cycle's content for the ambient surface.
///
/// Wire names are camelCase; the same JSON document crosses the process
/// boundary between the host app and the sandboxed surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurfacePayload {
    /// When the host app produced this payload (unix ms).
    #[serde(rename = "generatedAt")]
    pub generated_at_ms: i64,

    /// Optional single featured item.
    #[serde(default)]
    pub featured: Option<FeaturedItem>,

    /// Up to [`WEEKLY_GRID_CAPACITY`] grid items plus a see-all link.
    #[serde(default)]
    pub weekly_grid: WeeklyGrid,

    /// Up to [`UPCOMING_CAPACITY`] upcoming items plus a see-all link.
    #[serde(default)]
    pub upcoming: UpcomingList,

    /// Decorative environmental summary; never required for correctness.
    #[serde(default)]
    pub ambient_context: Option<AmbientContext>,
}

/// The featured item shown on its own tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Start time (unix ms).
    #[serde(default, rename = "startsAt")]
    pub starts_at_ms: i64,
    /// Venue name.
    #[serde(default)]
    pub venue: String,
    /// Venue locality (city / neighborhood).
    #[serde(default)]
    pub locality: String,
    /// Remote image reference, resolved by the cache manager.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the item is still in the future.
    #[serde(default)]
    pub is_upcoming: bool,
    /// Deep link into the host app.
    #[serde(default)]
    pub link: String,
}

/// The weekly grid group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGrid {
    /// Ordered grid items.
    #[serde(default)]
    pub items: Vec<GridItem>,
    /// Deep link for the grid as a whole.
    #[serde(default)]
    pub see_all_link: String,
}

/// One cell of the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    #[serde(default)]
    pub id: String,
    /// Remote image reference, resolved by the cache manager.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Deep link into the host app.
    #[serde(default)]
    pub link: String,
}

/// The upcoming list group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingList {
    /// Ordered upcoming items.
    #[serde(default)]
    pub items: Vec<UpcomingItem>,
    /// Deep link for the list as a whole.
    #[serde(default)]
    pub see_all_link: String,
}

/// One row of the upcoming list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Start time (unix ms).
    #[serde(default, rename = "startsAt")]
    pub starts_at_ms: i64,
    /// Venue name.
    #[serde(default)]
    pub venue: String,
    /// Deep link into the host app.
    #[serde(default)]
    pub link: String,
}

/// Decorative environmental summary (weather-style glyph + reading).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmbientContext {
    /// Icon class understood by the native renderer.
    #[serde(default)]
    pub icon: String,
    /// Numeric reading (temperature, AQI, ...).
    #[serde(default)]
    pub reading: f64,
    /// Short human label.
    #[serde(default)]
    pub label: String,
}

/// One rotation position the surface cycles through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// The featured item tile.
    Featured,
    /// The weekly grid tile.
    WeeklyGrid,
    /// The upcoming list tile.
    Upcoming,
    /// Explicit empty state when all groups are empty.
    Empty,
}

impl SurfacePayload {
    /// True when all three content groups are empty.
    pub fn is_empty(&self) -> bool {
        self.featured.is_none()
            && self.weekly_grid.items.is_empty()
            && self.upcoming.items.is_empty()
    }

    /// Tiles this payload can render, in rotation order.
    ///
    /// An all-empty payload yields the single [`TileKind::Empty`] tile, so
    /// the tile count is always at least 1.
    pub fn tiles(&self) -> Vec<TileKind> {
        let mut tiles = Vec::with_capacity(3);
        if self.featured.is_some() {
            tiles.push(TileKind::Featured);
        }
        if !self.weekly_grid.items.is_empty() {
            tiles.push(TileKind::WeeklyGrid);
        }
        if !self.upcoming.items.is_empty() {
            tiles.push(TileKind::Upcoming);
        }
        if tiles.is_empty() {
            tiles.push(TileKind::Empty);
        }
        tiles
    }

    /// Number of rotation positions for this payload. Always >= 1.
    pub fn tile_count(&self) -> u32 {
        self.tiles().len() as u32
    }

    /// Remote image references by logical slot, in slot order.
    pub fn image_slots(&self) -> Vec<(Slot, String)> {
        let mut slots = Vec::new();
        if let Some(url) = self.featured.as_ref().and_then(|f| f.image_url.clone()) {
            slots.push((Slot::Featured, url));
        }
        for (i, item) in self.weekly_grid.items.iter().enumerate() {
            if let Some(url) = item.image_url.clone() {
                slots.push((Slot::Grid(i as u8), url));
            }
        }
        slots
    }
}

/// Logical image slot inside the shared container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// The featured item's image.
    Featured,
    /// One weekly grid cell's image (0-based).
    Grid(u8),
}

impl Slot {
    /// Stable slot name: `featured`, `grid-0` .. `grid-5`.
    pub fn name(&self) -> String {
        match self {
            Slot::Featured => "featured".to_string(),
            Slot::Grid(i) => format!("grid-{i}"),
        }
    }

    /// Store key for this slot's image bytes.
    pub fn image_key(&self) -> String {
        format!("images/{}", self.name())
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// One validated binary image persisted in the shared container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CachedImage {
    /// Remote reference the image was resolved from.
    pub source_ref: String,
    /// Stable key inside the shared container.
    pub local_key: String,
    /// Size of the stored bytes.
    pub byte_size: u64,
    /// Whether decode-as-image succeeded. The surface never reads an image
    /// whose entry is not validated.
    pub validated: bool,
}

/// The payload as written into the shared container, augmented with the
/// resolved image manifest. This is the document the sandboxed surface
/// renders from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSurface {
    /// The validated payload.
    pub payload: SurfacePayload,
    /// Resolved images by slot name.
    #[serde(default)]
    pub images: BTreeMap<String, CachedImage>,
}
