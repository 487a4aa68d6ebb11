//! Cyclic rotation over the payload's tiles.
//!
//! The transition function is pure; persisting the resulting state into the
//! shared container is the caller's side effect, performed immediately after
//! every transition so a killed host process does not lose rotation position.

use serde::{Deserialize, Serialize};

use crate::SessionId;

/// The currently-displayed tile index. Shared by both processes; the
/// surface side is its steady-state writer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RotationState {
    /// Index in `[0, tile_count)`.
    pub current_index: u32,
}

impl RotationState {
    /// Clamps the index into `[0, tile_count)` after the payload shrank.
    pub fn clamped(self, tile_count: u32) -> Self {
        let max = tile_count.max(1) - 1;
        Self {
            current_index: self.current_index.min(max),
        }
    }
}

/// A discrete user interaction delivered from the ambient surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Advance to the next tile.
    Next,
    /// Go back to the previous tile.
    Prev,
    /// Dismiss the surface; ends the session.
    Dismiss,
}

/// An interaction event tagged with the session it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    /// Session the interaction targets.
    pub session_id: SessionId,
    /// What the user did.
    pub kind: InteractionKind,
}

/// Outcome of applying an interaction to the rotation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The index moved (or stayed, for a single tile); persist and re-render.
    Rotated(RotationState),
    /// Dismiss: index unchanged, the session should end.
    EndRequested,
}

/// Applies one interaction. Rotation is cyclic and indefinite; there is no
/// terminal index while the session is active.
pub fn apply(state: RotationState, kind: InteractionKind, tile_count: u32) -> Transition {
    let n = tile_count.max(1);
    match kind {
        InteractionKind::Next => Transition::Rotated(RotationState {
            current_index: (state.current_index + 1) % n,
        }),
        InteractionKind::Prev => Transition::Rotated(RotationState {
            current_index: (state.current_index + n - 1) % n,
        }),
        InteractionKind::Dismiss => Transition::EndRequested,
    }
}
