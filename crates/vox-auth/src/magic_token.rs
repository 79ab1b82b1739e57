//! Magic-link token codec.
//!
//! Symmetric, reversible obfuscation of a small JSON payload into a URL-safe
//! string: JSON → percent-encode → XOR against a repeating keystream derived
//! from a fixed passphrase → URL-safe base64 (no padding).
//!
//! # Known limitation
//!
//! This is **not** cryptographic security. The keystream passphrase ships
//! inside the distributed binary, so any holder of the client can decode any
//! token. The scheme only keeps credentials out of casual sight in a shared
//! URL; treat the link itself as the secret.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Fixed keystream passphrase. Changing it invalidates every link in flight.
const KEYSTREAM_PASSPHRASE: &str = "voxboard-link-v1";

/// Current payload format version.
pub const TOKEN_VERSION: u32 = 1;

/// The payload carried by a magic link. Never persisted; exists only for
/// the lifetime of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Target organization id.
    pub id: String,
    /// Target organization name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Unix millis at mint time.
    pub timestamp: i64,
    pub version: u32,
}

/// Encode a payload into a URL-safe token string.
#[must_use]
pub fn encode(payload: &TokenPayload) -> String {
    let json = serde_json::to_string(payload).unwrap_or_default();
    let percent = urlencoding::encode(&json);
    let xored = xor_keystream(percent.as_bytes());
    URL_SAFE_NO_PAD.encode(xored)
}

/// Decode a token string back into its payload.
///
/// Any failure along the way — malformed base64, invalid UTF-8, invalid
/// percent-encoding, invalid JSON — yields `None`. Callers must treat
/// `None` as "no valid token", not as an error to propagate.
#[must_use]
pub fn decode(token: &str) -> Option<TokenPayload> {
    let xored = URL_SAFE_NO_PAD.decode(token.trim()).ok()?;
    let percent_bytes = xor_keystream(&xored);
    let percent = String::from_utf8(percent_bytes).ok()?;
    let json = urlencoding::decode(&percent).ok()?;
    serde_json::from_str(&json).ok()
}

/// XOR `input` against the repeating passphrase keystream. Involution:
/// applying it twice restores the input.
fn xor_keystream(input: &[u8]) -> Vec<u8> {
    let key = KEYSTREAM_PASSPHRASE.as_bytes();
    input
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}
