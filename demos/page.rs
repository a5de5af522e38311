//! Minimal csp-nonce example — one simulated page request, start to finish.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example page

use csp_nonce::{
    CspHeader, Error, PageContext, PageData, Props, get_nonce, log_headers, set_csp, with_nonce,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    // Registration time: wrap the page's data-fetch once.
    let fetch_profile = with_nonce(profile_data);

    // Request time: the framework adapter builds one context per request.
    let ctx = PageContext::builder()
        .header("accept", "text/html")
        .query("tab", "settings")
        .build();

    let data = fetch_profile(ctx.clone()).await?;

    // The middleware side quotes the same token in the policy header.
    let nonce = get_nonce(&ctx).expect("fetch created the nonce");
    set_csp(
        &ctx,
        &CspHeader::enforce(format!("default-src 'self'; script-src 'nonce-{nonce}'")),
    );
    log_headers(&ctx);

    let wire = data.into_value();
    println!("{}", serde_json::to_string_pretty(&wire).expect("valid json"));
    Ok(())
}

// The page author writes this — no nonce handling in sight.
async fn profile_data(ctx: PageContext) -> Result<PageData, Error> {
    let mut props = Props::new();
    props.insert("user".into(), "alice".into());
    props.insert("tab".into(), ctx.query("tab").unwrap_or("profile").into());
    Ok(PageData::props(props))
}
