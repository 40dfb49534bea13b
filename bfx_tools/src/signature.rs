use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha384;

type HmacSha384 = Hmac<Sha384>;

/// Produce the `bfx-signature` header value for an authenticated request.
///
/// The signing string is `"/api/" + path + nonce + body_json`, and the signature is the lowercase hex encoding of
/// its HMAC-SHA384 digest under the merchant's API secret. Pure function; the caller signs the exact body bytes it
/// is going to send.
pub fn sign_request(path: &str, nonce: &str, body_json: &str, secret: &str) -> String {
    let payload = format!("/api/{path}{nonce}{body_json}");
    let mut mac = HmacSha384::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// A strictly increasing nonce source for one credential pair.
///
/// The remote API rejects a request whose nonce repeats or decreases, so every signed call sharing a credential must
/// draw from the same source. Nonces are microsecond epoch timestamps, bumped by one when two calls land in the same
/// microsecond (the webhook handler and the poll sweeper run concurrently against the same key).
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_micros() as u64).unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.last.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => return next.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}
