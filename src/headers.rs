//! Header diagnostics.

use tracing::debug;

use crate::context::PageContext;

/// Logs every request and response header currently visible on `ctx`, one
/// debug event each. Useful when chasing which middleware set (or clobbered)
/// a CSP header; does nothing unless debug logging is enabled.
pub fn log_headers(ctx: &PageContext) {
    for (name, value) in ctx.headers() {
        debug!(header = %name, value = ?value, "request header");
    }
    for (name, value) in ctx.response_headers().iter() {
        debug!(header = %name, value = ?value, "response header");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_without_panicking() {
        let ctx = PageContext::builder().header("accept", "text/html").build();
        ctx.set_response_header("content-security-policy", "default-src 'self'");
        log_headers(&ctx);
    }
}
