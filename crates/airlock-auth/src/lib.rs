//! Provider-neutral authentication guards for axum.
//!
//! Provides:
//! - [`sanitize_next`] / [`RedirectTarget`]: open-redirect-safe post-login targets
//! - [`NormalizedRequest`]: the request shape handed to identity verifiers
//! - [`IdentityVerifier`]: trait for identity providers (implement per provider)
//! - [`Resolver`]: signed-in vs signed-out resolution
//! - [`RequireAuth`] / [`OptionalUser`]: request guards as axum extractors
//! - [`RequireAuthLayer`] / [`RequireAuthService`]: the same guard as Tower middleware
//! - [`SignInWidget`]: the provider's browser-side sign-in fragments
//! - [`AuthError`] / [`ConfigError`]: error types

use std::sync::Arc;

use axum::body::{Body, Bytes};
use http::Request;
use http::request::Parts;

mod error;
pub mod guard;
mod identity;
mod middleware;
pub mod redirect;
mod request;
mod resolver;
mod settings;
mod verifier;
pub mod widget;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{AuthError, ConfigError};
pub use guard::{AuthRejection, Guarded, LoginRedirect, OptionalUser, RequireAuth};
pub use guard::{optional_user, require_auth};
pub use identity::{EmailAddress, Identity, identity_from_parts};
pub use middleware::{RequireAuthLayer, RequireAuthService};
pub use redirect::{DEFAULT_REDIRECT, RedirectTarget, sanitize_next};
pub use request::{DEFAULT_BODY_LIMIT, NormalizedRequest, SchemeSource};
pub use resolver::{AuthOutcome, Resolver};
pub use settings::RouteSettings;
pub use verifier::{IdentityVerifier, RequestState, SignedOutReason, VerifierFuture, VerifyOptions};
pub use widget::SignInWidget;

/// Everything the guards and routes need, shared across requests.
///
/// Cheap to clone. Expose it to extractors by implementing
/// `FromRef<YourState> for Airlock`.
#[derive(Clone)]
pub struct Airlock {
    inner: Arc<AirlockInner>,
}

struct AirlockInner {
    resolver: Resolver,
    routes: RouteSettings,
    widget: Arc<dyn SignInWidget>,
}

impl Airlock {
    /// Assemble from a verifier, a widget and validated route settings.
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        widget: Arc<dyn SignInWidget>,
        routes: RouteSettings,
    ) -> Result<Self, ConfigError> {
        routes.validate()?;
        log::debug!(
            "Airlock ready: verifier={}, login={}, logout={}",
            verifier.name(),
            routes.login_route,
            routes.logout_route
        );
        Ok(Self {
            inner: Arc::new(AirlockInner {
                resolver: Resolver::new(verifier),
                routes,
                widget,
            }),
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.inner.resolver
    }

    pub fn verifier(&self) -> &dyn IdentityVerifier {
        self.inner.resolver.verifier()
    }

    pub fn routes(&self) -> &RouteSettings {
        &self.inner.routes
    }

    pub fn widget(&self) -> &dyn SignInWidget {
        self.inner.widget.as_ref()
    }

    /// Normalize request parts using the configured [`SchemeSource`].
    pub fn normalize_parts(
        &self,
        parts: &Parts,
        body: Bytes,
    ) -> Result<NormalizedRequest, AuthError> {
        NormalizedRequest::from_parts_with(parts, body, self.routes().scheme)
    }

    /// Normalize a full request, reading at most [`DEFAULT_BODY_LIMIT`] bytes of body.
    pub async fn normalize_request(
        &self,
        request: Request<Body>,
    ) -> Result<NormalizedRequest, AuthError> {
        NormalizedRequest::from_request_with(request, DEFAULT_BODY_LIMIT, self.routes().scheme)
            .await
    }
}
