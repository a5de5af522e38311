//! End-to-end request flows over the public API.

use csp_nonce::{
    AugmentedData, CspHeader, Deferred, Error, PageContext, PageData, Props, Redirect, get_csp,
    get_nonce, get_or_create_nonce, set_csp, with_nonce,
};
use serde_json::json;

/// The property the crate exists for: a fetch function that needs the token
/// inline, and the header emitter running afterwards, both observe the one
/// token that ends up in the result's props.
#[tokio::test]
async fn header_and_markup_see_one_token() {
    let wrapped = with_nonce(|ctx: PageContext| async move {
        let seen = get_or_create_nonce(&ctx)?;
        let mut props = Props::new();
        props.insert("inline".into(), json!(seen.as_str()));
        Ok::<_, Error>(PageData::props(props))
    });

    let ctx = PageContext::builder().build();
    let out = wrapped(ctx.clone()).await.unwrap();

    let nonce = get_nonce(&ctx).unwrap();
    assert_eq!(out.props().get("inline"), Some(&json!(nonce.as_str())));
    assert_eq!(out.nonce(), Some(nonce.as_str()));

    set_csp(&ctx, &CspHeader::enforce(format!("script-src 'nonce-{nonce}'")));
    let policy = get_csp(&ctx).unwrap();
    assert!(policy.value.contains(nonce.as_str()));
    assert!(!policy.report_only);
}

#[tokio::test]
async fn pending_payloads_resolve_before_augmentation() {
    let wrapped = with_nonce(|_ctx| async {
        Ok::<_, Error>(PageData::Props(Deferred::later(async {
            let mut props = Props::new();
            props.insert("user".into(), json!("alice"));
            props
        })))
    });
    let out = wrapped(PageContext::builder().build()).await.unwrap();
    assert_eq!(out.props().get("user"), Some(&json!("alice")));
    assert!(out.nonce().is_some());

    let wrapped = with_nonce(|_ctx| async {
        Ok::<_, Error>(PageData::Redirect(Deferred::later(async {
            Redirect { destination: "/login".into(), permanent: false }
        })))
    });
    let out = wrapped(PageContext::builder().build()).await.unwrap();
    match out {
        AugmentedData::Redirect { redirect, .. } => assert_eq!(redirect.destination, "/login"),
        other => panic!("expected Redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn a_false_not_found_stays_false() {
    let wrapped =
        with_nonce(|_ctx| async { Ok::<_, Error>(PageData::NotFound(Deferred::now(false))) });
    let out = wrapped(PageContext::builder().build()).await.unwrap();
    assert!(matches!(out, AugmentedData::NotFound { not_found: false, .. }));
}

#[derive(Debug, PartialEq)]
enum PageError {
    Backend,
    Nonce,
}

impl From<Error> for PageError {
    fn from(_: Error) -> Self {
        Self::Nonce
    }
}

#[tokio::test]
async fn fetch_errors_pass_through_unmodified() {
    let wrapped = with_nonce(|_ctx| async { Err::<PageData, _>(PageError::Backend) });

    let ctx = PageContext::builder().build();
    let err = wrapped(ctx.clone()).await.unwrap_err();

    assert_eq!(err, PageError::Backend);
    // The call aborted before augmentation: no nonce exists for the request.
    assert!(get_nonce(&ctx).is_none());
}

#[tokio::test]
async fn loose_values_cross_the_boundary_and_back() {
    let wrapped = with_nonce(|_ctx| async {
        // As handed in by a framework shim that only speaks JSON.
        let raw = json!({ "redirect": { "destination": "/login", "permanent": true } });
        Ok::<_, Error>(PageData::from_value(raw)?)
    });

    let ctx = PageContext::builder().build();
    let out = wrapped(ctx.clone()).await.unwrap().into_value();

    let nonce = get_nonce(&ctx).unwrap();
    assert_eq!(
        out,
        json!({
            "props": { "nonce": nonce.as_str() },
            "redirect": { "destination": "/login", "permanent": true }
        })
    );
}
