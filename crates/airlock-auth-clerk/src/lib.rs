//! Clerk provider for airlock-auth.
//!
//! Implements [`airlock_auth::IdentityVerifier`] for Clerk:
//! - Session JWT verification (RS256) via a configured PEM or the JWKS endpoint
//! - JWKS key caching with TTL-based refresh
//! - Backend API user lookup and session revocation
//!
//! Also provides [`ClerkJs`], the ClerkJS [`airlock_auth::SignInWidget`], and
//! [`ClerkSettings`], the `CLERK_*` configuration.

use std::sync::Arc;

use airlock_auth::{Airlock, ConfigError};

mod settings;
mod user;
mod verifier;
mod widget;

pub use settings::{ClerkSettings, DEFAULT_API_URL, DEFAULT_JS_SRC};
pub use verifier::{ClerkVerifier, Jwk, SESSION_COOKIE};
pub use widget::ClerkJs;

/// Build an [`Airlock`] wired to Clerk from validated settings.
pub fn airlock(settings: &ClerkSettings) -> Result<Airlock, ConfigError> {
    settings.validate()?;
    let verifier = ClerkVerifier::new(settings)?;
    Airlock::new(
        Arc::new(verifier),
        Arc::new(ClerkJs::from_settings(settings)),
        settings.route_settings(),
    )
}
