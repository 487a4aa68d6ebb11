//! The surface session entity.
//!
//! Owned exclusively by the session lifecycle component; platform adapters
//! never mutate it, they only report success or failure of native calls.

use serde::{Deserialize, Serialize};

use crate::{now_ms, SessionId};

/// Lifecycle state of the ambient surface instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No surface is presented.
    Inactive,
    /// A start is in flight (images resolving, native call pending).
    Starting,
    /// The surface is visible to the user.
    Active,
    /// Teardown requested; transitions to `Inactive` unconditionally.
    Ending,
}

/// Logical handle for "this ambient surface is currently visible".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSession {
    /// Stable id for the lifetime of one presentation.
    pub session_id: SessionId,
    /// When the session was started (unix ms).
    pub started_at_ms: i64,
    /// When content was last pushed (unix ms).
    pub last_updated_at_ms: i64,
    /// Current lifecycle state.
    pub state: SessionState,
}

impl SurfaceSession {
    /// A fresh inactive session placeholder.
    pub fn inactive() -> Self {
        Self {
            session_id: SessionId::new(),
            started_at_ms: 0,
            last_updated_at_ms: 0,
            state: SessionState::Inactive,
        }
    }

    /// Begins a new session in the `Starting` state with a fresh id.
    pub fn begin() -> Self {
        let now = now_ms();
        Self {
            session_id: SessionId::new(),
            started_at_ms: now,
            last_updated_at_ms: now,
            state: SessionState::Starting,
        }
    }

    /// True for states in which `start` must be refused.
    pub fn is_engaged(&self) -> bool {
        matches!(self.state, SessionState::Starting | SessionState::Active)
    }

    /// Marks a successful content push.
    pub fn touch(&mut self) {
        self.last_updated_at_ms = now_ms();
    }
}
