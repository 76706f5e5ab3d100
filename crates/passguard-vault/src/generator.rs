// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation from constrained character classes.

use passguard_core::PassguardError;

use crate::rng::SecretRng;

const LETTERS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L',
    'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
const SYMBOLS: &[char] = &['!', '#', '$', '%', '&', '(', ')', '*', '+'];
const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Generate a random password: 8-10 letters, 2-4 symbols, 2-4 digits,
/// uniformly shuffled.
///
/// Output length is always in `[12, 18]` and contains at least one character
/// of each class by construction, never by post-validation.
pub fn generate(rng: &SecretRng) -> Result<String, PassguardError> {
    let mut chars = Vec::with_capacity(18);

    push_class(rng, &mut chars, LETTERS, 8, 10)?;
    push_class(rng, &mut chars, SYMBOLS, 2, 4)?;
    push_class(rng, &mut chars, DIGITS, 2, 4)?;

    rng.shuffle(&mut chars)?;
    Ok(chars.into_iter().collect())
}

/// Convenience wrapper creating its own RNG; the command surface for the
/// presentation layer.
pub fn generate_password() -> Result<String, PassguardError> {
    generate(&SecretRng::new())
}

fn push_class(
    rng: &SecretRng,
    out: &mut Vec<char>,
    class: &[char],
    min: usize,
    max: usize,
) -> Result<(), PassguardError> {
    let count = rng.range_inclusive(min, max)?;
    for _ in 0..count {
        out.push(*rng.choose(class)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_always_between_12_and_18() {
        let rng = SecretRng::new();
        for _ in 0..200 {
            let pw = generate(&rng).unwrap();
            assert!(
                (12..=18).contains(&pw.chars().count()),
                "unexpected length: {pw}"
            );
        }
    }

    #[test]
    fn contains_at_least_one_of_each_class() {
        let rng = SecretRng::new();
        for _ in 0..200 {
            let pw = generate(&rng).unwrap();
            assert!(pw.chars().any(|c| LETTERS.contains(&c)), "no letter: {pw}");
            assert!(pw.chars().any(|c| SYMBOLS.contains(&c)), "no symbol: {pw}");
            assert!(pw.chars().any(|c| DIGITS.contains(&c)), "no digit: {pw}");
        }
    }

    #[test]
    fn contains_no_characters_outside_the_three_classes() {
        let rng = SecretRng::new();
        for _ in 0..200 {
            let pw = generate(&rng).unwrap();
            for c in pw.chars() {
                assert!(
                    LETTERS.contains(&c) || SYMBOLS.contains(&c) || DIGITS.contains(&c),
                    "foreign character `{c}` in {pw}"
                );
            }
        }
    }

    #[test]
    fn class_counts_respect_segment_bounds() {
        let rng = SecretRng::new();
        for _ in 0..200 {
            let pw = generate(&rng).unwrap();
            let letters = pw.chars().filter(|c| LETTERS.contains(c)).count();
            let symbols = pw.chars().filter(|c| SYMBOLS.contains(c)).count();
            let digits = pw.chars().filter(|c| DIGITS.contains(c)).count();
            assert!((8..=10).contains(&letters), "letters {letters} in {pw}");
            assert!((2..=4).contains(&symbols), "symbols {symbols} in {pw}");
            assert!((2..=4).contains(&digits), "digits {digits} in {pw}");
        }
    }

    #[test]
    fn successive_passwords_differ() {
        // 62^12+ possibilities; a collision means the RNG is broken.
        let rng = SecretRng::new();
        let a = generate(&rng).unwrap();
        let b = generate(&rng).unwrap();
        assert_ne!(a, b);
    }
}
