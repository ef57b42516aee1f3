use crate::composer::errors::{ComposerError, ComposerResult};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

/// Lowercase letters and digits keep tokens valid in every Docker object name.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const TOKEN_LENGTH: usize = 8;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").unwrap();
}

/// Generates a fresh disambiguation token from the thread-local RNG.
pub fn generate_token() -> String {
    generate_token_with(&mut rand::thread_rng())
}

/// Generates a token from the given entropy source.
pub fn generate_token_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Checks a caller-supplied token before it is spliced into names.
pub fn validate_token(token: &str) -> ComposerResult<()> {
    if TOKEN_PATTERN.is_match(token) {
        Ok(())
    } else {
        Err(ComposerError::invalid_token(token))
    }
}
