//! CSP header accessors on the page context.
//!
//! Thin read/write helpers over the context's headers. Building the policy
//! string itself is the caller's business — the value is opaque here. A
//! policy is either enforcing (`content-security-policy`) or report-only
//! (`content-security-policy-report-only`), never both at once.

use crate::context::PageContext;

/// Header name of the enforcing policy form.
pub const CSP_HEADER: &str = "content-security-policy";

/// Header name of the report-only policy form.
pub const CSP_REPORT_ONLY_HEADER: &str = "content-security-policy-report-only";

/// A CSP policy value together with which header form carries it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CspHeader {
    pub value: String,
    pub report_only: bool,
}

impl CspHeader {
    /// An enforcing policy.
    pub fn enforce(value: impl Into<String>) -> Self {
        Self { value: value.into(), report_only: false }
    }

    /// A report-only policy.
    pub fn report_only(value: impl Into<String>) -> Self {
        Self { value: value.into(), report_only: true }
    }
}

/// Installs `csp` on the response under construction, replacing any policy
/// set earlier in the request and clearing the other header form.
pub fn set_csp(ctx: &PageContext, csp: &CspHeader) {
    let (set, clear) = if csp.report_only {
        (CSP_REPORT_ONLY_HEADER, CSP_HEADER)
    } else {
        (CSP_HEADER, CSP_REPORT_ONLY_HEADER)
    };
    ctx.set_response_header(set, &csp.value);
    ctx.remove_response_header(clear);
}

/// Reads the policy currently in effect for this request.
///
/// The response headers are consulted first — a middleware earlier in the
/// chain may have installed the policy there — then the request headers,
/// which is where an upstream proxy would have recorded it. The enforcing
/// form wins over report-only on either side.
pub fn get_csp(ctx: &PageContext) -> Option<CspHeader> {
    if let Some(value) = ctx.response_header(CSP_HEADER) {
        return Some(CspHeader::enforce(value));
    }
    if let Some(value) = ctx.response_header(CSP_REPORT_ONLY_HEADER) {
        return Some(CspHeader::report_only(value));
    }
    if let Some(value) = ctx.header(CSP_HEADER) {
        return Some(CspHeader::enforce(value));
    }
    if let Some(value) = ctx.header(CSP_REPORT_ONLY_HEADER) {
        return Some(CspHeader::report_only(value));
    }
    None
}
