//! Recording adapter for lifecycle tests. Captures every call and can be
//! told to fail specific operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use surface_core::model::StoredSurface;
use surface_core::rotation::RotationState;
use surface_core::session::SurfaceSession;

use crate::traits::{AdapterError, PlatformAdapter};

/// One captured native call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    Present { session_id: String, tile_index: u32 },
    Refresh { session_id: String, tile_index: u32 },
    Dismiss { session_id: String },
}

/// Test double capturing calls with injectable failures.
pub struct RecordingAdapter {
    calls: Mutex<Vec<AdapterCall>>,
    available: AtomicBool,
    fail_present: AtomicBool,
    fail_refresh: AtomicBool,
    fail_dismiss: AtomicBool,
}

impl Default for RecordingAdapter {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            fail_present: AtomicBool::new(false),
            fail_refresh: AtomicBool::new(false),
            fail_dismiss: AtomicBool::new(false),
        }
    }
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_available(&self, v: bool) {
        self.available.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_present(&self, v: bool) {
        self.fail_present.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_refresh(&self, v: bool) {
        self.fail_refresh.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_dismiss(&self, v: bool) {
        self.fail_dismiss.store(v, Ordering::SeqCst);
    }
}

impl PlatformAdapter for RecordingAdapter {
    fn capability_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn present(
        &self,
        session: &SurfaceSession,
        _surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError> {
        if self.fail_present.load(Ordering::SeqCst) {
            return Err(AdapterError::Present("injected failure".into()));
        }
        self.calls.lock().unwrap().push(AdapterCall::Present {
            session_id: session.session_id.to_string(),
            tile_index: rotation.current_index,
        });
        Ok(())
    }

    fn refresh_content(
        &self,
        session: &SurfaceSession,
        _surface: &StoredSurface,
        rotation: RotationState,
    ) -> Result<(), AdapterError> {
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(AdapterError::Refresh("injected failure".into()));
        }
        self.calls.lock().unwrap().push(AdapterCall::Refresh {
            session_id: session.session_id.to_string(),
            tile_index: rotation.current_index,
        });
        Ok(())
    }

    fn dismiss(&self, session: &SurfaceSession) -> Result<(), AdapterError> {
        if self.fail_dismiss.load(Ordering::SeqCst) {
            return Err(AdapterError::Dismiss("injected failure".into()));
        }
        self.calls.lock().unwrap().push(AdapterCall::Dismiss {
            session_id: session.session_id.to_string(),
        });
        Ok(())
    }
}
