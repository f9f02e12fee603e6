//! Environment abstraction for deterministic testing.
//!
//! Decouples service logic from system resources (wall clock, randomness).
//! Production uses [`crate::SystemEnv`]; tests use a seeded simulation
//! environment with a settable clock.

/// Abstract environment providing time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Methods are infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes
    /// - Uses cryptographically secure RNG
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Current wall-clock time as Unix seconds.
    ///
    /// Used for session expiry and message timestamps.
    fn wall_clock_secs(&self) -> u64;

    /// Generates a random `u64`.
    ///
    /// Used for message identifiers.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
