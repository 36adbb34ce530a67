//! Caller-side cancellation of an optimization call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RouteError;

/// Shared stop flag. Clones observe the same flag, so the request handler
/// can keep one clone and cancel while the engine holds another.
///
/// The flag is polled before each sequencing step and each oracle lookup.
/// A lookup already in flight is not interrupted, so the worst-case latency
/// between `cancel` and `ComputationAborted` is one oracle timeout
/// (`osrm.timeout_secs` for the remote backend).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    is_cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.is_cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled.load(Ordering::Relaxed)
    }

    /// Errors with [`RouteError::ComputationAborted`] once cancelled.
    pub fn check(&self) -> Result<(), RouteError> {
        if self.is_cancelled() {
            Err(RouteError::ComputationAborted)
        } else {
            Ok(())
        }
    }
}
