//! Access key generation and validation.

use crate::constants::ACCESS_KEY_ALPHABET;
use rand::Rng;

/// Draw `len` characters uniformly and independently from [`ACCESS_KEY_ALPHABET`].
pub fn generate_access_key<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(ACCESS_KEY_ALPHABET[rng.gen_range(0..ACCESS_KEY_ALPHABET.len())]))
        .collect()
}

/// Whether `key` could have been produced from the access key alphabet.
pub fn is_valid_access_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|byte| ACCESS_KEY_ALPHABET.contains(&byte))
}
