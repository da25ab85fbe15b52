//! Tokio sleeper and `rand` random sources.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ports::{RandomSource, Sleeper};

const ALPHANUMERIC_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn draw_chance<R: Rng + ?Sized>(rng: &mut R, percent: u8) -> bool {
    rng.gen_range(0..100_u8) < percent.min(100)
}

fn draw_alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(ALPHANUMERIC_UPPER[rng.gen_range(0..ALPHANUMERIC_UPPER.len())]))
        .collect()
}

/// Random source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn chance(&self, percent: u8) -> bool {
        draw_chance(&mut rand::thread_rng(), percent)
    }

    fn alphanumeric(&self, len: usize) -> String {
        draw_alphanumeric(&mut rand::thread_rng(), len)
    }
}

/// Reproducible random source seeded once.
#[derive(Debug)]
pub struct SeededRandomSource(Mutex<StdRng>);

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    fn with_rng<T>(&self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        draw(&mut rng)
    }
}

impl RandomSource for SeededRandomSource {
    fn chance(&self, percent: u8) -> bool {
        self.with_rng(|rng| draw_chance(rng, percent))
    }

    fn alphanumeric(&self, len: usize) -> String {
        self.with_rng(|rng| draw_alphanumeric(rng, len))
    }
}
