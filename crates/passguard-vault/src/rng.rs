// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographically secure randomness for password generation and key
//! material.
//!
//! Everything is backed by the system CSPRNG via `ring`. There is
//! deliberately no seeding API: determinism here would be a security hole,
//! not a test convenience, so tests assert structural properties instead of
//! exact outputs.

use passguard_core::PassguardError;
use ring::rand::{SecureRandom, SystemRandom};

/// Secure randomness source.
pub struct SecretRng {
    rng: SystemRandom,
}

impl SecretRng {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Fill `buf` with random bytes from the system CSPRNG.
    pub fn fill(&self, buf: &mut [u8]) -> Result<(), PassguardError> {
        self.rng
            .fill(buf)
            .map_err(|_| PassguardError::Crypto("system CSPRNG failed".to_string()))
    }

    /// Uniform value in `[0, bound)` via rejection sampling.
    ///
    /// Rejection keeps the draw unbiased; a plain modulo would skew toward
    /// low values whenever `bound` does not divide 2^32.
    fn below(&self, bound: usize) -> Result<usize, PassguardError> {
        debug_assert!(bound > 0 && bound <= u32::MAX as usize);
        let bound = bound as u64;
        let zone = (u64::from(u32::MAX) + 1) - ((u64::from(u32::MAX) + 1) % bound);
        loop {
            let mut bytes = [0u8; 4];
            self.fill(&mut bytes)?;
            let value = u64::from(u32::from_le_bytes(bytes));
            if value < zone {
                return Ok((value % bound) as usize);
            }
        }
    }

    /// Uniform integer in the inclusive range `[low, high]`.
    pub fn range_inclusive(&self, low: usize, high: usize) -> Result<usize, PassguardError> {
        if low > high {
            return Err(PassguardError::Internal(format!(
                "invalid range [{low}, {high}]"
            )));
        }
        Ok(low + self.below(high - low + 1)?)
    }

    /// Pick one element of `items` uniformly at random.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Result<&'a T, PassguardError> {
        if items.is_empty() {
            return Err(PassguardError::Internal(
                "cannot choose from an empty slice".to_string(),
            ));
        }
        Ok(&items[self.below(items.len())?])
    }

    /// Uniform in-place permutation (Fisher-Yates) driven by the CSPRNG.
    pub fn shuffle<T>(&self, items: &mut [T]) -> Result<(), PassguardError> {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1)?;
            items.swap(i, j);
        }
        Ok(())
    }
}

impl Default for SecretRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let rng = SecretRng::new();
        for _ in 0..500 {
            let v = rng.range_inclusive(2, 4).unwrap();
            assert!((2..=4).contains(&v));
        }
    }

    #[test]
    fn range_inclusive_hits_every_value() {
        let rng = SecretRng::new();
        let mut seen = [false; 3];
        for _ in 0..500 {
            seen[rng.range_inclusive(0, 2).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn range_inclusive_rejects_inverted_bounds() {
        let rng = SecretRng::new();
        assert!(rng.range_inclusive(5, 2).is_err());
    }

    #[test]
    fn choose_returns_member_of_slice() {
        let rng = SecretRng::new();
        let items = ['a', 'b', 'c'];
        for _ in 0..100 {
            let c = rng.choose(&items).unwrap();
            assert!(items.contains(c));
        }
    }

    #[test]
    fn choose_on_empty_slice_errors() {
        let rng = SecretRng::new();
        let items: [u8; 0] = [];
        assert!(rng.choose(&items).is_err());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let rng = SecretRng::new();
        let mut items: Vec<u32> = (0..32).collect();
        rng.shuffle(&mut items).unwrap();

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<u32>>());
    }

    #[test]
    fn shuffle_moves_elements() {
        // 64 elements staying fixed across 5 shuffles is ~impossible; treat
        // any movement in any round as success.
        let rng = SecretRng::new();
        let original: Vec<u32> = (0..64).collect();
        let mut moved = false;
        for _ in 0..5 {
            let mut items = original.clone();
            rng.shuffle(&mut items).unwrap();
            if items != original {
                moved = true;
                break;
            }
        }
        assert!(moved);
    }
}
