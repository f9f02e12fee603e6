//! Simulated environment with seeded randomness and a virtual clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use veilchat_server::Environment;

/// Default virtual start time (2023-11-14T22:13:20Z)
pub const DEFAULT_START_SECS: u64 = 1_700_000_000;

/// Deterministic environment for tests.
///
/// Clones share the RNG and clock, matching how a real environment is shared
/// between the service and the test driving it.
#[derive(Clone)]
pub struct SimEnv {
    inner: Arc<Mutex<SimEnvInner>>,
}

struct SimEnvInner {
    rng: ChaCha8Rng,
    clock_secs: u64,
}

impl SimEnv {
    /// Environment seeded with 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Environment with a specific RNG seed, clock at [`DEFAULT_START_SECS`].
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimEnvInner {
                rng: ChaCha8Rng::seed_from_u64(seed),
                clock_secs: DEFAULT_START_SECS,
            })),
        }
    }

    /// Move the virtual clock forward.
    pub fn advance_secs(&self, secs: u64) {
        let mut inner = self.lock();
        inner.clock_secs = inner.clock_secs.saturating_add(secs);
    }

    /// Current virtual time.
    pub fn now_secs(&self) -> u64 {
        self.lock().clock_secs
    }

    fn lock(&self) -> MutexGuard<'_, SimEnvInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }

    fn wall_clock_secs(&self) -> u64 {
        self.now_secs()
    }
}
