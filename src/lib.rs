//! # csp-nonce
//!
//! Per-request Content-Security-Policy nonces for server-rendered page data.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! A nonce-based CSP only works if two places that never talk to each other
//! quote the *same* token: the `Content-Security-Policy` response header, and
//! the inline `<script>`/`<style>` tags in the rendered markup. The header is
//! typically set by middleware; the markup comes out of the page's data-fetch
//! function. csp-nonce owns exactly that coordination problem — a token
//! generated once per request, readable from every call site, attached to
//! whatever the data-fetch produced without changing the outcome.
//!
//! What the surrounding stack already owns — csp-nonce intentionally ignores:
//!
//! - **Policy construction** — directive strings are opaque values here
//! - **Header emission** — the framework writes the response to the client
//! - **Request lifecycle** — contexts are built by the framework adapter,
//!   one per request, and die with it
//!
//! What's left for csp-nonce — the only part that changes between pages:
//!
//! - Idempotent nonce derivation — [`get_or_create_nonce`], first caller wins
//! - Outcome-preserving wrapping — [`with_nonce`] keeps props as props,
//!   redirects as redirects, 404s as 404s
//! - Thin CSP accessors and header diagnostics on the context
//!
//! ## Quick start
//!
//! ```rust
//! use csp_nonce::{with_nonce, CspHeader, Error, PageContext, PageData, Props};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Error> {
//! // Wrap the page's data-fetch once, at registration time.
//! let fetch_page = with_nonce(|ctx: PageContext| async move {
//!     let mut props = Props::new();
//!     props.insert("tab".into(), ctx.query("tab").unwrap_or("home").into());
//!     Ok::<_, Error>(PageData::props(props))
//! });
//!
//! // Per request: the framework builds a context and calls the wrapped fetch.
//! let ctx = PageContext::builder().query("tab", "settings").build();
//! let data = fetch_page(ctx.clone()).await?;
//!
//! // The token in the result's props is the token for the header.
//! let nonce = csp_nonce::get_nonce(&ctx).expect("created during the fetch");
//! csp_nonce::set_csp(
//!     &ctx,
//!     &CspHeader::enforce(format!("script-src 'nonce-{nonce}'")),
//! );
//! assert_eq!(data.nonce(), Some(nonce.as_str()));
//! # Ok(())
//! # }
//! ```

mod context;
mod csp;
mod error;
mod headers;
mod nonce;
mod result;
mod wrap;

pub use context::{PageContext, PageContextBuilder};
pub use csp::{CSP_HEADER, CSP_REPORT_ONLY_HEADER, CspHeader, get_csp, set_csp};
pub use error::{Error, Result};
pub use headers::log_headers;
pub use nonce::{DEFAULT_NONCE_BITS, Nonce, generate_nonce, get_nonce, get_or_create_nonce};
pub use result::{AugmentedData, BoxFuture, Deferred, PageData, Props, Redirect};
pub use wrap::{
    initial_props_with_csp_nonce, initial_props_with_nonce, with_csp_nonce, with_nonce,
};
