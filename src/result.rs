//! Page-data result shapes.
//!
//! A data-fetch function settles a page in exactly one of three ways: render
//! with props, redirect, or 404. [`PageData`] makes that a real sum type
//! instead of the loosely-keyed object convention most SSR frameworks use on
//! the wire — [`PageData::from_value`] converts in at the boundary and
//! rejects values that match none of the shapes, and
//! [`AugmentedData::into_value`] converts back out.
//!
//! Any of the three payloads may itself still be in flight when the fetch
//! function returns; [`Deferred`] carries that "value or pending value"
//! distinction without forcing an early await.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// A heap-allocated, type-erased future, as returned by the wrapping
/// functions such as [`with_nonce`](crate::with_nonce). `Send + 'static` so
/// wrapped fetch functions can run on multi-threaded executors.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// The page-props mapping handed to the renderer.
pub type Props = serde_json::Map<String, Value>;

/// Where to send the client instead of rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub destination: String,
    pub permanent: bool,
}

// ── Deferred ─────────────────────────────────────────────────────────────────

/// A value that is either already here or still being produced.
pub struct Deferred<T>(Repr<T>);

enum Repr<T> {
    Now(T),
    Later(BoxFuture<T>),
}

impl<T> Deferred<T> {
    /// An immediately-available value.
    pub fn now(value: T) -> Self {
        Self(Repr::Now(value))
    }

    /// A value still being produced.
    pub fn later(fut: impl Future<Output = T> + Send + 'static) -> Self {
        Self(Repr::Later(Box::pin(fut)))
    }

    /// Awaits the value if pending, returns it directly otherwise.
    pub async fn resolve(self) -> T {
        match self.0 {
            Repr::Now(value) => value,
            Repr::Later(fut) => fut.await,
        }
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Self::now(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Now(value) => f.debug_tuple("Deferred").field(value).finish(),
            Repr::Later(_) => f.write_str("Deferred(<pending>)"),
        }
    }
}

// ── PageData ─────────────────────────────────────────────────────────────────

/// What a data-fetch function decided for the page: exactly one of the three.
#[derive(Debug)]
pub enum PageData {
    /// Render the page with these props.
    Props(Deferred<Props>),
    /// Send the client elsewhere.
    Redirect(Deferred<Redirect>),
    /// The page does not exist (`true` means 404).
    NotFound(Deferred<bool>),
}

impl PageData {
    /// Render with immediately-available props.
    pub fn props(props: Props) -> Self {
        Self::Props(Deferred::now(props))
    }

    /// Redirect with an immediately-available target.
    pub fn redirect(redirect: Redirect) -> Self {
        Self::Redirect(Deferred::now(redirect))
    }

    /// A definite 404.
    pub fn not_found() -> Self {
        Self::NotFound(Deferred::now(true))
    }

    /// Converts the loosely-typed object an external framework hands in.
    ///
    /// Tag recognition order matches the framework convention: `notFound`,
    /// then `redirect`, then `props`. A value carrying none of the three
    /// fails with [`Error::UnrecognizedShape`] — a fetch function that
    /// produced it is broken, and guessing a default shape here would only
    /// push the breakage into the rendered page.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::UnrecognizedShape);
        };
        if let Some(not_found) = map.remove("notFound") {
            return Ok(Self::NotFound(Deferred::now(serde_json::from_value(not_found)?)));
        }
        if let Some(redirect) = map.remove("redirect") {
            return Ok(Self::Redirect(Deferred::now(serde_json::from_value(redirect)?)));
        }
        if let Some(props) = map.remove("props") {
            return Ok(Self::Props(Deferred::now(serde_json::from_value(props)?)));
        }
        Err(Error::UnrecognizedShape)
    }
}

// ── AugmentedData ────────────────────────────────────────────────────────────

/// [`PageData`] after wrapping: the same outcome, now carrying the request
/// nonce under `props["nonce"]`.
///
/// The `Redirect` and `NotFound` variants keep a `props` sibling holding just
/// the nonce — frameworks that require a `props` key to exist alongside the
/// outcome tag get one.
#[derive(Clone, Debug, PartialEq)]
pub enum AugmentedData {
    Props { props: Props },
    Redirect { props: Props, redirect: Redirect },
    NotFound { props: Props, not_found: bool },
}

impl AugmentedData {
    /// The props mapping, whichever variant this is.
    pub fn props(&self) -> &Props {
        match self {
            Self::Props { props }
            | Self::Redirect { props, .. }
            | Self::NotFound { props, .. } => props,
        }
    }

    /// The nonce that was attached, straight out of the props mapping.
    pub fn nonce(&self) -> Option<&str> {
        self.props().get("nonce").and_then(Value::as_str)
    }

    /// Converts back to the framework wire shape.
    pub fn into_value(self) -> Value {
        match self {
            Self::Props { props } => json!({ "props": props }),
            Self::Redirect { props, redirect } => {
                json!({ "props": props, "redirect": redirect })
            }
            Self::NotFound { props, not_found } => {
                json!({ "props": props, "notFound": not_found })
            }
        }
    }
}
