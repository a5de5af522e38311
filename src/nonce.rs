//! Nonce generation and per-request caching.
//!
//! A CSP nonce is referenced from two independent places: the
//! `Content-Security-Policy` response header, and the inline `<script>` /
//! `<style>` tags in the rendered markup. Those two call sites do not know
//! about each other, so the one invariant that matters here is that both see
//! the *same* token: [`get_or_create_nonce`] generates on first use and every
//! later lookup within the request returns the identical value.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::trace;

use crate::context::PageContext;
use crate::error::Result;

/// Default nonce strength, in bits of OS entropy per token.
pub const DEFAULT_NONCE_BITS: u16 = 128;

/// A per-request CSP nonce token (base64 over raw entropy bytes).
///
/// Only the generation primitive constructs one; two equal tokens mean two
/// reads of the same request's slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Nonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw generation primitive: `bits` worth of OS entropy, base64-encoded.
///
/// Most callers want [`get_or_create_nonce`] instead — this function returns
/// a fresh token every time and caches nothing. An entropy-source failure is
/// returned as [`Error::Generation`](crate::Error::Generation); there is no
/// fallback token.
pub fn generate_nonce(bits: u16) -> Result<Nonce> {
    let mut bytes = vec![0u8; usize::from(bits).div_ceil(8)];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(Nonce(BASE64.encode(&bytes)))
}

/// Returns the nonce for `ctx`, generating and caching it on first call.
///
/// Idempotent: within one request, every call — from any clone of the
/// context, in any order — returns the same token. The first caller wins;
/// the context's once-slot provides the only synchronisation needed.
pub fn get_or_create_nonce(ctx: &PageContext) -> Result<Nonce> {
    let nonce = ctx.nonce_slot().get_or_try_init(|| -> Result<Nonce> {
        let nonce = generate_nonce(ctx.nonce_bits())?;
        trace!(bits = ctx.nonce_bits(), "generated request nonce");
        Ok(nonce)
    })?;
    Ok(nonce.clone())
}

/// Read-only lookup: the nonce for `ctx`, or `None` if no call site has
/// created one yet.
pub fn get_nonce(ctx: &PageContext) -> Option<Nonce> {
    ctx.nonce_slot().get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let ctx = PageContext::builder().build();
        let first = get_or_create_nonce(&ctx).unwrap();
        let second = get_or_create_nonce(&ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn clones_observe_the_same_nonce() {
        let ctx = PageContext::builder().build();
        let other = ctx.clone();

        assert_eq!(get_nonce(&other), None);
        let created = get_or_create_nonce(&ctx).unwrap();
        assert_eq!(get_nonce(&other), Some(created));
    }

    #[test]
    fn distinct_requests_get_distinct_nonces() {
        let a = get_or_create_nonce(&PageContext::builder().build()).unwrap();
        let b = get_or_create_nonce(&PageContext::builder().build()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_length_tracks_bits() {
        // 128 bits → 16 bytes → 24 base64 chars (with padding).
        let nonce = generate_nonce(128).unwrap();
        assert_eq!(nonce.as_str().len(), 24);

        let short = generate_nonce(8).unwrap();
        assert_eq!(short.as_str().len(), 4);
    }

    #[test]
    fn context_bits_drive_cached_nonce_length() {
        let ctx = PageContext::builder().nonce_bits(256).build();
        let nonce = get_or_create_nonce(&ctx).unwrap();
        assert_eq!(nonce.as_str().len(), 44);
    }
}
