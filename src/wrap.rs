//! Fetch-function wrapping.
//!
//! # How the wrapping works
//!
//! [`with_nonce`] takes the page's data-fetch function and returns a new
//! function of the same shape. At request time the chain is:
//!
//! ```text
//! async fn fetch(ctx) -> Result<PageData>        ← the page author writes this
//!        ↓ with_nonce(fetch)
//! wrapped(ctx)                                    ← the framework calls this
//!        ↓
//! fetch(ctx).await                                ← outcome decided first
//!        ↓
//! get_or_create_nonce(&ctx)                       ← reuses any token already
//!        ↓                                          created for this request
//! resolve the (possibly pending) payload, attach the nonce
//! ```
//!
//! The nonce is attached without changing which outcome the fetch function
//! produced: props stay props, a redirect stays a redirect, a 404 stays a
//! 404. Errors from the fetch function pass through untouched — no retries,
//! no suppression.

use std::future::Future;

use serde_json::Value;

use crate::context::PageContext;
use crate::error::{Error, Result};
use crate::nonce::{Nonce, get_or_create_nonce};
use crate::result::{AugmentedData, BoxFuture, PageData, Props};

/// Wraps a page-data fetch function so its result carries the request nonce.
///
/// The returned function has the same calling shape as the input and can be
/// registered with the framework in its place. `E` is the fetch function's
/// own error type; it only has to absorb this crate's [`Error`] for the
/// nonce-generation failure path.
///
/// ```rust
/// use csp_nonce::{with_nonce, Error, PageContext, PageData, Props};
///
/// let wrapped = with_nonce(|ctx: PageContext| async move {
///     let mut props = Props::new();
///     props.insert("tab".into(), ctx.query("tab").unwrap_or("home").into());
///     Ok::<_, Error>(PageData::props(props))
/// });
/// ```
pub fn with_nonce<F, Fut, E>(
    fetch: F,
) -> impl Fn(PageContext) -> BoxFuture<Result<AugmentedData, E>> + Clone + Send + Sync + 'static
where
    F: Fn(PageContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<PageData, E>> + Send + 'static,
    E: From<Error> + Send + 'static,
{
    move |ctx: PageContext| {
        let fetch = fetch.clone();
        Box::pin(async move {
            let data = fetch(ctx.clone()).await?;
            let nonce = get_or_create_nonce(&ctx).map_err(E::from)?;
            let augmented = match data {
                PageData::NotFound(not_found) => AugmentedData::NotFound {
                    props: nonce_props(&nonce),
                    not_found: not_found.resolve().await,
                },
                PageData::Redirect(redirect) => AugmentedData::Redirect {
                    props: nonce_props(&nonce),
                    redirect: redirect.resolve().await,
                },
                PageData::Props(props) => {
                    let mut props = props.resolve().await;
                    // Inserted last: a stale "nonce" left in the mapping by
                    // the fetch function must not survive.
                    props.insert("nonce".to_owned(), Value::String(nonce.to_string()));
                    AugmentedData::Props { props }
                }
            };
            Ok(augmented)
        })
    }
}

/// Wraps an initial-props fetch function (the client-navigable data-fetch
/// convention: the function yields the props mapping directly, with no
/// redirect or not-found outcome) so the mapping carries the request nonce.
pub fn initial_props_with_nonce<F, Fut, E>(
    fetch: F,
) -> impl Fn(PageContext) -> BoxFuture<Result<Props, E>> + Clone + Send + Sync + 'static
where
    F: Fn(PageContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Props, E>> + Send + 'static,
    E: From<Error> + Send + 'static,
{
    move |ctx: PageContext| {
        let fetch = fetch.clone();
        Box::pin(async move {
            let mut props = fetch(ctx.clone()).await?;
            let nonce = get_or_create_nonce(&ctx).map_err(E::from)?;
            props.insert("nonce".to_owned(), Value::String(nonce.to_string()));
            Ok(props)
        })
    }
}

/// Alias of [`with_nonce`], for call sites that read better naming the CSP
/// pairing explicitly. Same function value, no separate logic.
pub use self::with_nonce as with_csp_nonce;

/// Alias of [`initial_props_with_nonce`]. Same function value, no separate
/// logic.
pub use self::initial_props_with_nonce as initial_props_with_csp_nonce;

fn nonce_props(nonce: &Nonce) -> Props {
    let mut props = Props::new();
    props.insert("nonce".to_owned(), Value::String(nonce.to_string()));
    props
}
