//! The logout route.

use airlock_auth::{Airlock, AuthRejection, RequireAuth};
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookies holding the provider's browser session; expired on logout.
pub const SESSION_COOKIES: [&str; 2] = ["__session", "__client_uat"];

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .path("/")
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// `POST <logout_route>`
///
/// Revokes the current session when its id is known, then 303s to
/// `logout_redirect_route` with the session cookies expired.
pub(crate) async fn logout(
    State(airlock): State<Airlock>,
    jar: CookieJar,
    RequireAuth(identity): RequireAuth,
) -> Result<Response, AuthRejection> {
    if let Some(session_id) = identity.session_id.as_deref() {
        airlock
            .verifier()
            .revoke_session(session_id)
            .await
            .inspect_err(|e| log::warn!("Failed to revoke session {session_id}: {e}"))?;
        log::info!("Revoked session {session_id} for {}", identity.id);
    }

    let jar = SESSION_COOKIES
        .into_iter()
        .fold(jar, |jar, name| jar.add(expired_cookie(name)));
    Ok((jar, Redirect::to(&airlock.routes().logout_redirect_route)).into_response())
}
