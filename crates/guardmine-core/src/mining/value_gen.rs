//! Seeded random value synthesis for mined guards.
//!
//! One [`SynthesisContext`] is created per run and threaded through the
//! scanner and the guard rules. The same seed replays the same values for the
//! same source; every call draws fresh randomness from the shared engine.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::SynthesisError;

/// Random engine state for one mining run.
pub struct SynthesisContext {
    rng: StdRng,
    seed: u64,
}

impl SynthesisContext {
    /// Create a context with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a context with a freshly drawn seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[threshold+1, threshold+span]` when `above`,
    /// otherwise in `[threshold-span, threshold-1]`. A span below 1 is
    /// treated as 1.
    pub fn boundary_integer(
        &mut self,
        threshold: i64,
        span: i64,
        above: bool,
    ) -> Result<i64, SynthesisError> {
        let span = span.max(1);
        let out_of_range = || SynthesisError::ThresholdOutOfRange {
            text: threshold.to_string(),
        };
        let (low, high) = if above {
            (
                threshold.checked_add(1).ok_or_else(out_of_range)?,
                threshold
                    .checked_add(span)
                    .ok_or_else(out_of_range)?,
            )
        } else {
            (
                threshold
                    .checked_sub(span)
                    .ok_or_else(out_of_range)?,
                threshold.checked_sub(1).ok_or_else(out_of_range)?,
            )
        };
        Ok(self.rng.gen_range(low..=high))
    }

    /// `n` decimal digits, each uniform over `0-9`.
    pub fn random_digits(&mut self, n: usize) -> String {
        (0..n)
            .map(|_| self.rng.gen_range(b'0'..=b'9') as char)
            .collect()
    }

    /// `n` ASCII alphanumeric characters. The alphabet never needs escaping
    /// inside a quoted literal.
    pub fn random_string_of_length(&mut self, n: usize) -> String {
        (0..n)
            .map(|_| self.rng.sample(Alphanumeric) as char)
            .collect()
    }

    /// `prefix` followed by enough random digits to reach `len` characters.
    /// A prefix already `len` long or longer is returned unchanged.
    pub fn phone_number_with_prefix(&mut self, prefix: &str, len: usize) -> String {
        let missing = len.saturating_sub(prefix.chars().count());
        let mut number = String::with_capacity(prefix.len() + missing);
        number.push_str(prefix);
        number.push_str(&self.random_digits(missing));
        number
    }
}
