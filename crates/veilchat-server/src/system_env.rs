//! Production Environment implementation using system time and RNG.
//!
//! `SystemEnv` reads the real system clock and draws from the OS
//! cryptographic RNG (getrandom). Production behavior is therefore
//! non-deterministic; tests use a seeded environment instead.

use crate::env::Environment;

/// Production environment using system time and cryptographic RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails or the system clock is before the Unix epoch.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - service cannot operate securely");
    }

    #[allow(clippy::disallowed_methods)]
    #[allow(clippy::expect_used)]
    fn wall_clock_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("invariant: system clock is after Unix epoch (1970-01-01)")
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1);
        env.random_bytes(&mut bytes2);

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_random_bytes_fills_buffer() {
        let env = SystemEnv::new();

        let mut bytes = [0u8; 64];
        env.random_bytes(&mut bytes);

        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "Most bytes should be non-zero");
    }

    #[test]
    fn system_env_wall_clock_is_recent() {
        // 2023-11-14, well before any plausible test run
        assert!(SystemEnv::new().wall_clock_secs() > 1_700_000_000);
    }
}
