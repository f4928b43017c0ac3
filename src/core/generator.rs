//! Random password generation under a character-class policy.

use rand::rngs::OsRng;
use rand::Rng;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::constants;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error(
        "password length must be between {} and {} characters",
        constants::MIN_PASSWORD_LENGTH,
        constants::MAX_PASSWORD_LENGTH
    )]
    InvalidLength,

    #[error("at least one character class must be enabled")]
    EmptyCharset,
}

/// Which character classes a generated password may draw from.
#[derive(Debug, Clone, Copy)]
pub struct GenerationPolicy {
    pub length: usize,
    pub use_lowercase: bool,
    pub use_uppercase: bool,
    pub use_digits: bool,
    pub use_special: bool,
}

impl GenerationPolicy {
    /// Policy with every character class enabled.
    pub fn all(length: usize) -> Self {
        Self {
            length,
            use_lowercase: true,
            use_uppercase: true,
            use_digits: true,
            use_special: true,
        }
    }

    /// The character pool, concatenated in canonical order:
    /// lowercase, uppercase, digits, special.
    pub fn charset(&self) -> String {
        let mut pool = String::new();
        if self.use_lowercase {
            pool.push_str(constants::LOWERCASE);
        }
        if self.use_uppercase {
            pool.push_str(constants::UPPERCASE);
        }
        if self.use_digits {
            pool.push_str(constants::DIGITS);
        }
        if self.use_special {
            pool.push_str(constants::SPECIAL);
        }
        pool
    }
}

/// Check that a requested length is within the accepted range.
pub fn is_valid_length(length: usize) -> bool {
    (constants::MIN_PASSWORD_LENGTH..=constants::MAX_PASSWORD_LENGTH).contains(&length)
}

/// Generate a password of exactly `policy.length` characters, each drawn
/// independently and uniformly from the enabled classes.
///
/// Validation happens before any randomness is consumed.
pub fn generate(policy: &GenerationPolicy) -> Result<Zeroizing<String>, GenerateError> {
    if !is_valid_length(policy.length) {
        return Err(GenerateError::InvalidLength);
    }

    let pool: Vec<char> = policy.charset().chars().collect();
    if pool.is_empty() {
        return Err(GenerateError::EmptyCharset);
    }

    let mut rng = OsRng;
    let password: String = (0..policy.length)
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect();
    Ok(Zeroizing::new(password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_length_bounds() {
        assert!(is_valid_length(8));
        assert!(is_valid_length(16));
        assert!(is_valid_length(128));
        assert!(!is_valid_length(0));
        assert!(!is_valid_length(7));
        assert!(!is_valid_length(129));
    }

    #[test]
    fn test_generate_exact_length() {
        for length in [8, 12, 64, 128] {
            let password = generate(&GenerationPolicy::all(length)).unwrap();
            assert_eq!(password.chars().count(), length);
        }
    }

    #[test]
    fn test_generate_invalid_length() {
        assert_eq!(
            generate(&GenerationPolicy::all(7)).unwrap_err(),
            GenerateError::InvalidLength
        );
        assert_eq!(
            generate(&GenerationPolicy::all(129)).unwrap_err(),
            GenerateError::InvalidLength
        );
    }

    #[test]
    fn test_generate_empty_charset() {
        let policy = GenerationPolicy {
            length: 16,
            use_lowercase: false,
            use_uppercase: false,
            use_digits: false,
            use_special: false,
        };
        assert_eq!(generate(&policy).unwrap_err(), GenerateError::EmptyCharset);
    }

    #[test]
    fn test_length_checked_before_charset() {
        let policy = GenerationPolicy {
            length: 3,
            use_lowercase: false,
            use_uppercase: false,
            use_digits: false,
            use_special: false,
        };
        assert_eq!(generate(&policy).unwrap_err(), GenerateError::InvalidLength);
    }

    #[test]
    fn test_generate_uses_only_enabled_classes() {
        let policy = GenerationPolicy {
            length: 100,
            use_lowercase: true,
            use_uppercase: false,
            use_digits: true,
            use_special: false,
        };
        let password = generate(&policy).unwrap();
        assert!(password
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_special_only() {
        let policy = GenerationPolicy {
            length: 100,
            use_lowercase: false,
            use_uppercase: false,
            use_digits: false,
            use_special: true,
        };
        let password = generate(&policy).unwrap();
        assert!(password.chars().all(|c| constants::SPECIAL.contains(c)));
    }

    #[test]
    fn test_charset_canonical_order() {
        let policy = GenerationPolicy::all(16);
        let pool = policy.charset();
        let expected = format!(
            "{}{}{}{}",
            constants::LOWERCASE,
            constants::UPPERCASE,
            constants::DIGITS,
            constants::SPECIAL
        );
        assert_eq!(pool, expected);
    }
}
