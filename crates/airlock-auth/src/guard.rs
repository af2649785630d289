//! Request guards built on the [`Resolver`](crate::Resolver).
//!
//! Two flavours, both re-verifying on every call:
//! - [`require_auth`] / [`RequireAuth`]: signed-out requests are sent to login
//! - [`optional_user`] / [`OptionalUser`]: signed-out requests get `None`
//!
//! The login redirect is a value ([`Guarded::RedirectRequired`]) rather than
//! an early exit, so callers see it in the type.

use axum::body::Bytes;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Redirect, Response};
use http::StatusCode;
use http::request::Parts;

use crate::redirect::{DEFAULT_REDIRECT, sanitize_next};
use crate::{Airlock, AuthError, AuthOutcome, Identity, NormalizedRequest, RouteSettings};

/// A 303 to the login route carrying the post-login destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    location: String,
}

impl LoginRedirect {
    /// Redirect to login, returning to `path_and_query` afterwards.
    ///
    /// The destination is sanitized here too, even though it comes from the
    /// request line rather than a query parameter.
    pub fn to_login(routes: &RouteSettings, path_and_query: &str) -> Self {
        let next = sanitize_next(path_and_query, DEFAULT_REDIRECT);
        Self {
            location: format!("{}?next={}", routes.login_route, urlencoding::encode(&next)),
        }
    }

    /// Value of the `Location` header.
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

/// Outcome of [`require_auth`].
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded {
    Authenticated(Identity),
    RedirectRequired(LoginRedirect),
}

/// Resolve `request`, turning a signed-out outcome into a login redirect.
pub async fn require_auth(
    airlock: &Airlock,
    request: &NormalizedRequest,
) -> Result<Guarded, AuthError> {
    match airlock.resolver().resolve(request).await? {
        AuthOutcome::SignedIn(identity) => Ok(Guarded::Authenticated(identity)),
        AuthOutcome::SignedOut => {
            let redirect = LoginRedirect::to_login(airlock.routes(), request.path_and_query());
            log::debug!("Redirecting to {}", redirect.location());
            Ok(Guarded::RedirectRequired(redirect))
        }
    }
}

/// Resolve `request`, yielding `None` when signed out.
pub async fn optional_user(
    airlock: &Airlock,
    request: &NormalizedRequest,
) -> Result<Option<Identity>, AuthError> {
    Ok(airlock.resolver().resolve(request).await?.into_identity())
}

/// Why a guard refused to hand over an identity.
#[derive(Debug)]
pub enum AuthRejection {
    /// Signed out; the client should go to login.
    Redirect(LoginRedirect),
    /// Resolution failed. Fatal for the request.
    Fault(AuthError),
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        AuthRejection::Fault(err)
    }
}

impl AuthRejection {
    /// Status the rejection answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::Redirect(_) => StatusCode::SEE_OTHER,
            AuthRejection::Fault(err) => err.status(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Redirect(redirect) => redirect.into_response(),
            AuthRejection::Fault(err) => fault_response(&err),
        }
    }
}

/// Build the response for a resolution fault.
///
/// The body carries only the public message; details go to the log.
pub(crate) fn fault_response(err: &AuthError) -> Response {
    log::error!("Authentication fault: {err}");

    let body = serde_json::json!({
        "error": {
            "category": "authentication",
            "message": err.public_message(),
        }
    });

    (
        err.status(),
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}

/// Extractor yielding the signed-in [`Identity`], or redirecting to login.
///
/// Leaves the body untouched for the handler.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

impl<S> FromRequestParts<S> for RequireAuth
where
    Airlock: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let airlock = Airlock::from_ref(state);
        let request = airlock.normalize_parts(parts, Bytes::new())?;
        match require_auth(&airlock, &request).await? {
            Guarded::Authenticated(identity) => Ok(RequireAuth(identity)),
            Guarded::RedirectRequired(redirect) => Err(AuthRejection::Redirect(redirect)),
        }
    }
}

/// Extractor yielding the [`Identity`] when signed in, `None` otherwise.
///
/// Only rejects on resolution faults.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalUser
where
    Airlock: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let airlock = Airlock::from_ref(state);
        let request = airlock.normalize_parts(parts, Bytes::new())?;
        Ok(OptionalUser(optional_user(&airlock, &request).await?))
    }
}
