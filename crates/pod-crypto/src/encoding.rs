//! # Fixed-Length Byte Encoding
//!
//! Public keys, signatures and private keys travel as text. Either
//! lowercase/uppercase hex or standard-alphabet Base64 is accepted on input;
//! output is always unpadded Base64.
//!
//! Decoding checks the text shape against a regex first and only then the
//! decoded length, so a malformed string is always reported as an encoding
//! error rather than a length error.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use regex::Regex;

use crate::error::CryptoError;

// Literal patterns: `expect` can only fire on an edit to the pattern, which
// `test_static_patterns_compile` catches.
fn hex_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]*$").expect("static regex"))
}

fn base64_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("static regex"))
}

/// Encode bytes as unpadded standard Base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Decode `N` bytes from hex (exactly `2N` chars) or Base64 (padding optional).
///
/// `type_name` names the thing being decoded in error messages.
pub fn decode_fixed<const N: usize>(text: &str, type_name: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode_auto(text, N, type_name)?;
    if bytes.len() != N {
        return Err(CryptoError::InvalidLength {
            type_name: type_name.to_string(),
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn decode_auto(text: &str, expected: usize, type_name: &str) -> Result<Vec<u8>, CryptoError> {
    let invalid = |reason: String| CryptoError::InvalidEncoding {
        type_name: type_name.to_string(),
        reason,
    };

    if text.len() == expected * 2 && hex_regex().is_match(text) {
        return hex::decode(text).map_err(|e| invalid(e.to_string()));
    }
    if !text.is_empty() && base64_regex().is_match(text) {
        return STANDARD_NO_PAD
            .decode(text.trim_end_matches('='))
            .map_err(|e| invalid(e.to_string()));
    }
    Err(invalid("text is neither hex nor base64".to_string()))
}
