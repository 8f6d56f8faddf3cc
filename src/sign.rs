//! Request signing.
//!
//! The service authenticates each request by an MD5 digest over the
//! canonicalized parameter set:
//!
//! 1. drop any existing `sign` entry,
//! 2. order the remaining keys byte-wise,
//! 3. form-encode them as `key=value&key=value`,
//! 4. append `&app_key=<app_key>`,
//! 5. MD5 the bytes and upper-case the hex digest.
//!
//! The digest is inserted back into the map under `sign`.

use md5::{Digest, Md5};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the parameter that carries the signature.
pub const SIGN_KEY: &str = "sign";

/// Longest nonce the service accepts.
pub const MAX_NONCE_LEN: usize = 32;

/// Request parameters, ordered by key.
///
/// `String` ordering is byte-wise, which is exactly the order the signature
/// scheme requires, so iteration order is the canonical order.
pub type ParameterMap = BTreeMap<String, String>;

/// Per-request replay protection: a random nonce and the unix time it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub nonce: String,
    pub timestamp: u64,
}

impl RequestContext {
    /// Fresh context with a nonce of `nonce_len` characters (clamped to 1..=32).
    pub fn generate(nonce_len: usize) -> Self {
        Self {
            nonce: nonce(nonce_len),
            timestamp: unix_now(),
        }
    }

    /// Fixed context, for reproducible requests.
    pub fn fixed(nonce: impl Into<String>, timestamp: u64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }
}

/// Random string drawn uniformly, with replacement, from `[A-Za-z0-9]`.
pub fn nonce(len: usize) -> String {
    let len = len.clamp(1, MAX_NONCE_LEN);
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The string that gets hashed: sorted, form-encoded parameters plus the app key.
pub fn canonical_string(params: &ParameterMap, app_key: &str) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(k, _)| k.as_str() != SIGN_KEY) {
        serializer.append_pair(key, value);
    }
    // `form_urlencoded` leaves `*` bare; the service's encoder escapes it.
    let mut out = serializer.finish().replace('*', "%2A");
    out.push_str("&app_key=");
    out.push_str(app_key);
    out
}

/// Compute the signature of `params` without touching the map.
pub fn signature(params: &ParameterMap, app_key: &str) -> String {
    let digest = Md5::digest(canonical_string(params, app_key).as_bytes());
    hex::encode_upper(digest)
}

/// Sign `params` in place and return the signature.
pub fn sign(params: &mut ParameterMap, app_key: &str) -> String {
    let sig = signature(params, app_key);
    params.insert(SIGN_KEY.to_string(), sig.clone());
    sig
}
