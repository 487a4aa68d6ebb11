//! Well-known keys in the shared container.

/// The stored surface document (payload + resolved image manifest).
pub const SURFACE_DOC: &str = "surface.json";

/// The rotation index scalar.
pub const ROTATION_INDEX: &str = "rotation/index";

/// Prefix under which cached image bytes live, keyed by slot name.
pub const IMAGE_PREFIX: &str = "images/";
