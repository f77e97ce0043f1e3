//! Tracking-code generation and normalization
//!
//! Tokens are the codes customers carry between check-in and check-out.
//! They are drawn from a restricted alphabet that avoids the 0/O and 1/I
//! confusions, since they get read over counters, typed by hand, and
//! pasted out of shared URLs.

use rand::Rng;
use rand::rngs::OsRng;

use crate::error::{ConsignaError, Result};

/// Symbols a token may contain: digits 2-9 plus uppercase letters
/// excluding I and O. 32 symbols; at the default length of 8 that is
/// 32^8 ≈ 1.1×10^12 combinations.
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default token length
pub const TOKEN_LENGTH: usize = 8;

/// Shortest normalized token accepted on lookup. Tokens are issued at
/// [`TOKEN_LENGTH`]; lookups tolerate anything plausibly token-shaped.
pub const TOKEN_MIN_LOOKUP_LEN: usize = 4;

/// Generate a fresh tracking code of `len` symbols.
///
/// Each symbol is an independent uniform draw from [`TOKEN_ALPHABET`]
/// using the operating system's CSPRNG. A predictable source would let
/// one customer guess another's token and view or claim their item.
///
/// This does NOT guarantee global uniqueness; the repository enforces
/// that via a unique key, and the lifecycle manager retries on a
/// reported collision.
#[must_use]
pub fn generate_token(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}

/// Normalize a raw token as entered, scanned, or parsed from a URL:
/// trim surrounding whitespace and uppercase.
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize and shape-check a token for lookup.
///
/// Rejects tokens that are too short or contain symbols outside the
/// alphabet; both indicate a typo or a truncated scan, and neither can
/// ever match an issued token.
pub fn parse_token(raw: &str) -> Result<String> {
    let token = normalize_token(raw);
    if token.len() < TOKEN_MIN_LOOKUP_LEN
        || !token.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
    {
        return Err(ConsignaError::MalformedToken { token });
    }
    Ok(token)
}
