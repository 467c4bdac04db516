//! Randomness sources for the RANDOM and FORMAT_PRESERVING strategies

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of replacement characters
///
/// Thread-safety is the implementation's responsibility: the engine shares a
/// single source across every concurrent call.
pub trait RandomSource: Send + Sync {
    /// `len` characters drawn from `[A-Za-z0-9]`
    fn alphanumeric(&self, len: usize) -> String;

    /// `len` characters drawn from `[0-9]`
    fn numeric(&self, len: usize) -> String;
}

/// Production source backed by the OS-seeded thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn alphanumeric(&self, len: usize) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    fn numeric(&self, len: usize) -> String {
        let mut rng = rand::rng();
        (0..len)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}

/// Deterministic source for tests and reproducible fixtures.
///
/// Never use a fixed seed in production.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable generator
        let mut guard = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl RandomSource for SeededRandom {
    fn alphanumeric(&self, len: usize) -> String {
        self.with_rng(|rng| {
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
    }

    fn numeric(&self, len: usize) -> String {
        self.with_rng(|rng| {
            (0..len)
                .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
                .collect()
        })
    }
}

impl<T: RandomSource + ?Sized> RandomSource for std::sync::Arc<T> {
    fn alphanumeric(&self, len: usize) -> String {
        (**self).alphanumeric(len)
    }

    fn numeric(&self, len: usize) -> String {
        (**self).numeric(len)
    }
}
