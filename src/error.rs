//! Unified error type.

/// The error type returned by csp-nonce's fallible operations.
///
/// Failures inside a wrapped fetch function are not expressed here — they
/// belong to the caller's own error type and pass through the wrapper
/// untouched. This type surfaces the two ways *this* crate can fail: the
/// entropy source refusing to produce a token, and a loosely-typed page-data
/// value that matches none of the recognised shapes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The OS entropy source could not produce nonce bytes.
    ///
    /// Fatal for the request: a predictable token would authorise scripts the
    /// policy is supposed to block, so no fallback value is ever substituted.
    #[error("nonce generation failed: {0}")]
    Generation(#[from] rand::Error),

    /// A page-data value carried none of `props`, `redirect`, `notFound`.
    ///
    /// This is a contract violation in the fetch function, not an input to
    /// tolerate. The wrapper refuses to guess a default shape.
    #[error("page data carries none of `props`, `redirect`, `notFound`")]
    UnrecognizedShape,

    /// A recognised tag carried a payload of the wrong type
    /// (e.g. a non-boolean `notFound`).
    #[error("malformed page data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Alias used across the crate. The second parameter lets wrapped fetch
/// functions keep their own error type: `Result<PageData, E>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
