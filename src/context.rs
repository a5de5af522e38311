//! Per-request page context.
//!
//! A [`PageContext`] stands for one in-flight request/response cycle. The
//! surrounding framework adapter builds one per request and hands it to every
//! call site involved in rendering that page — the data-fetch function, the
//! CSP header emitter, diagnostics. This crate itself never creates one
//! outside of tests.
//!
//! The handle is a cheap `Clone` over shared state: every clone refers to the
//! *same* request. That is what makes the nonce idempotent across unrelated
//! call sites — the token lives in a slot owned by the shared allocation, so
//! whoever asks first creates it and everyone else reads it. The slot dies
//! with the last clone; nothing persists across requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use http::{HeaderMap, HeaderName, HeaderValue};
use once_cell::sync::OnceCell;

use crate::nonce::{DEFAULT_NONCE_BITS, Nonce};

/// One request/response cycle, shared across call sites.
#[derive(Clone)]
pub struct PageContext {
    inner: Arc<Inner>,
}

struct Inner {
    headers: HeaderMap,
    query: HashMap<String, String>,
    response_headers: Mutex<HeaderMap>,
    nonce: OnceCell<Nonce>,
    nonce_bits: u16,
}

impl PageContext {
    /// Builder for a context. Called by the framework adapter, once per request.
    ///
    /// ```rust
    /// use csp_nonce::PageContext;
    ///
    /// let ctx = PageContext::builder()
    ///     .header("accept", "text/html")
    ///     .query("tab", "settings")
    ///     .build();
    /// ```
    pub fn builder() -> PageContextBuilder {
        PageContextBuilder {
            headers: HeaderMap::new(),
            query: HashMap::new(),
            nonce_bits: DEFAULT_NONCE_BITS,
        }
    }

    /// Case-insensitive request-header lookup. Non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Returns a query parameter by name.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.inner.query.get(key).map(String::as_str)
    }

    /// Sets a header on the response under construction, replacing any
    /// previous value for that name.
    ///
    /// # Panics
    ///
    /// Panics if `name` or `value` is not a valid HTTP header string.
    pub fn set_response_header(&self, name: &str, value: &str) {
        let name: HeaderName = name.parse().expect("invalid header name");
        let value: HeaderValue = value.parse().expect("invalid header value");
        self.response(|headers| headers.insert(name, value));
    }

    /// Removes a header from the response under construction.
    pub fn remove_response_header(&self, name: &str) {
        self.response(|headers| headers.remove(name));
    }

    /// Case-insensitive response-header lookup. Clones the value out — the
    /// response map sits behind a lock shared by every clone of the context.
    pub fn response_header(&self, name: &str) -> Option<String> {
        self.lock()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    /// Snapshot of the response headers set so far.
    pub fn response_headers(&self) -> HeaderMap {
        self.lock().clone()
    }

    /// Nonce strength this request was configured with, in bits.
    pub fn nonce_bits(&self) -> u16 {
        self.inner.nonce_bits
    }

    pub(crate) fn nonce_slot(&self) -> &OnceCell<Nonce> {
        &self.inner.nonce
    }

    fn response<R>(&self, f: impl FnOnce(&mut HeaderMap) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, HeaderMap> {
        // Header writes never panic, so the lock cannot be poisoned.
        self.inner
            .response_headers
            .lock()
            .expect("response header lock poisoned")
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("headers", &self.inner.headers)
            .field("query", &self.inner.query)
            .field("nonce_bits", &self.inner.nonce_bits)
            .field("nonce", &self.inner.nonce.get())
            .finish_non_exhaustive()
    }
}

// ── PageContextBuilder ────────────────────────────────────────────────────────

/// Fluent builder for [`PageContext`]. Obtain via [`PageContext::builder()`].
pub struct PageContextBuilder {
    headers: HeaderMap,
    query: HashMap<String, String>,
    nonce_bits: u16,
}

impl PageContextBuilder {
    /// Adds a request header.
    ///
    /// # Panics
    ///
    /// Panics if `name` or `value` is not a valid HTTP header string.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("invalid header name");
        let value: HeaderValue = value.parse().expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Overrides the nonce strength for this request. Values below 8 bits
    /// are clamped up — an empty token authorises nothing.
    pub fn nonce_bits(mut self, bits: u16) -> Self {
        self.nonce_bits = bits.max(8);
        self
    }

    pub fn build(self) -> PageContext {
        PageContext {
            inner: Arc::new(Inner {
                headers: self.headers,
                query: self.query,
                response_headers: Mutex::new(HeaderMap::new()),
                nonce: OnceCell::new(),
                nonce_bits: self.nonce_bits,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_response_headers() {
        let ctx = PageContext::builder().build();
        let other = ctx.clone();

        other.set_response_header("x-frame-options", "DENY");
        assert_eq!(ctx.response_header("x-frame-options").as_deref(), Some("DENY"));

        ctx.remove_response_header("x-frame-options");
        assert_eq!(other.response_header("x-frame-options"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let ctx = PageContext::builder().header("X-Request-Id", "abc123").build();
        assert_eq!(ctx.header("x-request-id"), Some("abc123"));
    }

    #[test]
    fn nonce_bits_clamp() {
        let ctx = PageContext::builder().nonce_bits(0).build();
        assert_eq!(ctx.nonce_bits(), 8);
    }
}
