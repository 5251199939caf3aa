use crate::error::ClientError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter of a participant. Advancing it invalidates every
/// guard handed out before.
#[derive(Debug, Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn guard(&self) -> EpochGuard {
        EpochGuard {
            epoch: self.clone(),
            issued: self.current(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EpochGuard {
    epoch: Epoch,
    issued: u64,
}

impl EpochGuard {
    pub fn is_current(&self) -> bool {
        self.epoch.current() == self.issued
    }

    pub fn check(&self) -> Result<(), ClientError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(ClientError::Cancelled)
        }
    }
}
