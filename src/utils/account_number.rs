//! Account number generation.
//!
//! An account number is a 10-digit decimal string derived from a random
//! 128-bit token: the token is hashed with SHA-256, the first eight digest
//! bytes are read as a little-endian `u64`, reduced modulo 10^10 and
//! left-padded with zeros.
//!
//! Uniqueness is not checked here. The `accounts_account_number_key`
//! constraint rejects duplicates and the account service regenerates on
//! conflict.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of decimal digits in an account number.
pub const ACCOUNT_NUMBER_LENGTH: usize = 10;

const MODULUS: u64 = 10_000_000_000;

/// Source of fresh account numbers.
///
/// # Implementations
///
/// - [`Sha256AccountNumberGenerator`] - production generator
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait AccountNumberGenerator: Send + Sync {
    /// Returns a new 10-digit account number. Never fails.
    fn generate(&self) -> String;
}

/// Generator backed by random UUIDs and SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256AccountNumberGenerator;

impl AccountNumberGenerator for Sha256AccountNumberGenerator {
    fn generate(&self) -> String {
        generate_account_number()
    }
}

/// Generates an account number from a fresh random token.
///
/// # Examples
///
/// ```ignore
/// let number = generate_account_number();
/// assert_eq!(number.len(), 10);
/// assert!(number.bytes().all(|b| b.is_ascii_digit()));
/// ```
pub fn generate_account_number() -> String {
    account_number_from_token(Uuid::new_v4().as_bytes())
}

/// Derives the account number for a given seed token.
pub fn account_number_from_token(token: &[u8]) -> String {
    let digest = Sha256::digest(token);
    account_number_from_digest(&digest)
}

fn account_number_from_digest(digest: &[u8]) -> String {
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);

    format_account_number(u64::from_le_bytes(head))
}

fn format_account_number(value: u64) -> String {
    format!("{:0width$}", value % MODULUS, width = ACCOUNT_NUMBER_LENGTH)
}

/// Returns `true` if `value` has the shape of an account number.
pub fn is_account_number(value: &str) -> bool {
    value.len() == ACCOUNT_NUMBER_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}
