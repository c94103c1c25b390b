//! Device allocator.
//!
//! Owns the free-device pool for one run. The pool only ever shrinks: there
//! is no release within a run.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::DeviceAddress;
use crate::error::{ComponentError, Error, Result};

/// Fail unless the pool can satisfy the whole template.
///
/// Called once before any layer executes.
pub fn check_sufficient(required: usize, pool_size: usize) -> Result<()> {
    if pool_size < required {
        return Err(Error::InsufficientResources {
            required,
            available: pool_size,
        });
    }
    Ok(())
}

/// Hands out device addresses to containers under mutual exclusion.
pub struct DeviceAllocator {
    pool: Mutex<VecDeque<DeviceAddress>>,
    /// Number of locked allocation calls made.
    calls: AtomicUsize,
}

impl DeviceAllocator {
    /// Create an allocator over the discovered free devices, in order.
    #[must_use]
    pub fn new(pool: Vec<DeviceAddress>) -> Self {
        Self {
            pool: Mutex::new(pool.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Allocator with nothing to hand out, for templates that need no devices.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Take devices for each container of one component.
    ///
    /// Consumes exactly the sum of `demand` from the front of the pool in one
    /// locked step. Containers asking for zero devices get no entry. Values
    /// are space-joined addresses.
    pub fn allocate(
        &self,
        demand: &[(String, usize)],
    ) -> std::result::Result<BTreeMap<String, String>, ComponentError> {
        let requested: usize = demand.iter().map(|(_, n)| n).sum();
        self.calls.fetch_add(1, Ordering::Relaxed);

        let mut pool = self.pool.lock();
        if pool.len() < requested {
            return Err(ComponentError::DevicesExhausted {
                requested,
                remaining: pool.len(),
            });
        }

        let mut assigned = BTreeMap::new();
        for (container, count) in demand.iter().filter(|(_, n)| *n > 0) {
            let addresses: Vec<String> = pool
                .drain(..*count)
                .map(|a| a.as_str().to_string())
                .collect();
            assigned.insert(container.clone(), addresses.join(" "));
        }
        let remaining = pool.len();
        drop(pool);

        debug!(requested, remaining, "Devices allocated");
        Ok(assigned)
    }

    /// Devices still free.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.lock().len()
    }

    /// How many times [`allocate`](Self::allocate) was called.
    #[must_use]
    pub fn allocation_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}
