//! The login route.

use airlock_auth::{
    Airlock, AuthOutcome, AuthRejection, DEFAULT_REDIRECT, RedirectTarget, RouteSettings,
};
use axum::extract::{Query, Request, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use http::header;

/// Where login sends the user once signed in.
///
/// A missing, blank or bare `/` value goes to `login_redirect_route`.
/// Anything else is sanitized with the same fallback.
pub fn login_target(next: Option<&str>, routes: &RouteSettings) -> RedirectTarget {
    let fallback = routes.login_redirect_route.as_str();
    match next.map(str::trim) {
        None | Some("") | Some("/") => RedirectTarget::parse(fallback, DEFAULT_REDIRECT),
        Some(candidate) => RedirectTarget::parse(candidate, fallback),
    }
}

/// `GET <login_route>?next=...`
///
/// Signed in: 303 to the target. Signed out: the provider's sign-in page.
pub(crate) async fn login(
    State(airlock): State<Airlock>,
    Query(params): Query<Vec<(String, String)>>,
    request: Request,
) -> Result<Response, AuthRejection> {
    let next = params
        .iter()
        .find(|(key, _)| key == "next")
        .map(|(_, value)| value.as_str());
    let target = login_target(next, airlock.routes());

    let normalized = airlock.normalize_request(request).await?;
    match airlock.resolver().resolve(&normalized).await? {
        AuthOutcome::SignedIn(identity) => {
            log::debug!("{} already signed in, redirecting to {target}", identity.id);
            Ok(Redirect::to(target.as_str()).into_response())
        }
        AuthOutcome::SignedOut => {
            let page = sign_in_page(airlock.widget().sign_in(&target).as_str());
            Ok(([(header::CACHE_CONTROL, "no-store")], Html(page)).into_response())
        }
    }
}

fn sign_in_page(widget: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Sign in</title>\n</head>\n<body>\n{widget}\n</body>\n</html>\n"
    )
}
