//! Cooperative cancellation of a pairing computation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared flag checked by the search between attempts.
///
/// Cloning shares the flag, so a caller can keep one handle and raise it from
/// another thread (e.g. when a request times out).
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
