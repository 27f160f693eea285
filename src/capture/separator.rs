//! Separator tokens delimiting transactions inside a capture file.

use crate::utils::config::{SEPARATOR_PREFIX, SEPARATOR_RANDOM_LEN};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Generate a fresh separator from the thread-local RNG
pub fn generate_separator() -> String {
    generate_separator_with(&mut rand::rng())
}

/// Generate a separator from a caller-supplied RNG
///
/// Produces `separator--` followed by 32 characters from `[a-zA-Z0-9]`.
pub fn generate_separator_with<R: Rng>(rng: &mut R) -> String {
    let token: String = (0..SEPARATOR_RANDOM_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();

    format!("{}{}", SEPARATOR_PREFIX, token)
}

/// Check that `candidate` has the separator shape
pub fn is_separator(candidate: &str) -> bool {
    match candidate.strip_prefix(SEPARATOR_PREFIX) {
        Some(token) => {
            token.len() == SEPARATOR_RANDOM_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}
